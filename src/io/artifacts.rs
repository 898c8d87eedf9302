//! Model-store loading.
//!
//! A model store is a directory holding:
//!
//! - `label_encoders.json`: `{ "<column>": ["label0", "label1", ...] }`
//! - `xgboost_model_<target>.json` for each of `min_price`, `max_price`, `modal_price`
//!
//! Loading is all-or-nothing: any missing, corrupt or incompatible artifact
//! fails the whole load and no partial bundle is returned.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::domain::{CategoricalField, PriceTarget};
use crate::encode::{EncoderBundle, LabelEncoder};
use crate::error::LoadError;
use crate::io::xgboost::XgbModel;
use crate::models::{BoostedRegressor, ModelBundle};

/// Artifact name of the encoder bundle.
pub const LABEL_ENCODERS: &str = "label_encoders";

/// File extension shared by all artifacts.
pub const ARTIFACT_EXT: &str = "json";

/// Everything a request needs, loaded once and then read-only.
#[derive(Debug)]
pub struct Artifacts {
    pub encoders: EncoderBundle,
    pub models: ModelBundle,
}

pub fn artifact_path(model_dir: &Path, name: &str) -> PathBuf {
    model_dir.join(format!("{name}.{ARTIFACT_EXT}"))
}

/// Load the encoder bundle and all three models from `model_dir`.
pub fn load(model_dir: &Path) -> Result<Artifacts, LoadError> {
    let encoders = load_encoders(&artifact_path(model_dir, LABEL_ENCODERS))?;

    let min_price = load_model(&artifact_path(model_dir, &PriceTarget::MinPrice.artifact_name()))?;
    let max_price = load_model(&artifact_path(model_dir, &PriceTarget::MaxPrice.artifact_name()))?;
    let modal_price = load_model(&artifact_path(model_dir, &PriceTarget::ModalPrice.artifact_name()))?;

    let models = ModelBundle::new(Box::new(min_price), Box::new(max_price), Box::new(modal_price));
    info!("Loaded model store '{}': {models:?}", model_dir.display());

    Ok(Artifacts { encoders, models })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the label encoder file.
///
/// Columns other than the three categorical fields are ignored; a categorical
/// field without an entry makes every value of that field fall back.
pub fn load_encoders(path: &Path) -> Result<EncoderBundle, LoadError> {
    let raw: BTreeMap<String, Vec<String>> = read_json(path)?;

    let mut encoders = HashMap::new();
    for (column, classes) in raw {
        let Some(field) = CategoricalField::from_column(&column) else {
            warn!("Ignoring encoder for unknown column '{column}' in '{}'", path.display());
            continue;
        };
        let encoder = LabelEncoder::new(classes).map_err(|label| {
            LoadError::incompatible(path, format!("encoder '{column}' lists '{label}' more than once"))
        })?;
        debug!("Encoder '{column}': {} known labels", encoder.len());
        encoders.insert(field, encoder);
    }

    let bundle = EncoderBundle::new(encoders);
    for field in bundle.missing_fields() {
        warn!("No encoder for '{field}' in '{}'; all values will use the fallback code", path.display());
    }
    Ok(bundle)
}

/// Load and validate one XGBoost JSON model.
pub fn load_model(path: &Path) -> Result<BoostedRegressor, LoadError> {
    let model: XgbModel = read_json(path)?;
    debug!("Read '{}' (xgboost {:?})", path.display(), model.version);
    model.into_regressor(path)
}
