//! The fixed set of per-target models.

use std::fmt;

use crate::domain::PriceTarget;
use crate::models::Regressor;

/// Exactly one regressor per price target. Immutable after construction.
pub struct ModelBundle {
    min_price: Box<dyn Regressor>,
    max_price: Box<dyn Regressor>,
    modal_price: Box<dyn Regressor>,
}

impl ModelBundle {
    pub fn new(min_price: Box<dyn Regressor>, max_price: Box<dyn Regressor>, modal_price: Box<dyn Regressor>) -> Self {
        Self {
            min_price,
            max_price,
            modal_price,
        }
    }

    pub fn get(&self, target: PriceTarget) -> &dyn Regressor {
        match target {
            PriceTarget::MinPrice => self.min_price.as_ref(),
            PriceTarget::MaxPrice => self.max_price.as_ref(),
            PriceTarget::ModalPrice => self.modal_price.as_ref(),
        }
    }

    /// Models in response order.
    pub fn iter(&self) -> impl Iterator<Item = (PriceTarget, &dyn Regressor)> {
        PriceTarget::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ModelBundle");
        for (target, model) in self.iter() {
            s.field(target.as_str(), &model.describe());
        }
        s.finish()
    }
}
