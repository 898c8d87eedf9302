//! Shared fixtures for unit tests.
//!
//! The fixture store mirrors a real model directory: a label encoder file and
//! three XGBoost JSON models whose outputs are easy to compute by hand.
//!
//! | target      | booster  | output for (Pune, Onion, Local, March) |
//! |-------------|----------|----------------------------------------|
//! | min_price   | gbtree   | 1200 (Nashik → -500, floored to 100)   |
//! | max_price   | gbtree   | 2600.5 (month < 6.5)                   |
//! | modal_price | gblinear | 1810                                   |

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::domain::{CategoricalField, PredictionRequest, PriceTarget};
use crate::encode::{EncoderBundle, LabelEncoder};
use crate::error::PredictError;
use crate::io::artifacts::{Artifacts, LABEL_ENCODERS, artifact_path};
use crate::models::{ModelBundle, Regressor};

pub fn encoders_json() -> Value {
    json!({
        "district_name": ["Nashik", "Pune"],
        "commodity_name": ["Onion", "Tomato"],
        "variety": ["Local", "Red"]
    })
}

pub fn fixture_encoders() -> EncoderBundle {
    let mut map = HashMap::new();
    map.insert(
        CategoricalField::DistrictName,
        LabelEncoder::new(vec!["Nashik".into(), "Pune".into()]).unwrap(),
    );
    map.insert(
        CategoricalField::CommodityName,
        LabelEncoder::new(vec!["Onion".into(), "Tomato".into()]).unwrap(),
    );
    map.insert(
        CategoricalField::Variety,
        LabelEncoder::new(vec!["Local".into(), "Red".into()]).unwrap(),
    );
    EncoderBundle::new(map)
}

/// A depth-1 tree splitting `feature < threshold`.
pub fn stump_json(feature: i64, threshold: f64, left: f64, right: f64) -> Value {
    json!({
        "tree_param": {"num_nodes": "3", "size_leaf_vector": "1", "num_feature": "4", "num_deleted": "0"},
        "id": 0,
        "left_children": [1, -1, -1],
        "right_children": [2, -1, -1],
        "parents": [2147483647, 0, 0],
        "split_indices": [feature, 0, 0],
        "split_conditions": [threshold, left, right],
        "split_type": [0, 0, 0],
        "default_left": [1, 0, 0],
        "base_weights": [0.0, left, right],
        "loss_changes": [1.0, 0.0, 0.0],
        "sum_hessian": [10.0, 5.0, 5.0],
        "categories": [],
        "categories_nodes": [],
        "categories_segments": [],
        "categories_sizes": []
    })
}

/// Wrap a gradient booster section into a full XGBoost JSON document.
pub fn model_json(gradient_booster: Value, objective: &str, base_score: Value) -> Value {
    json!({
        "version": [2, 0, 3],
        "learner": {
            "attributes": {},
            "feature_names": ["district_name", "commodity_name", "variety", "month"],
            "feature_types": ["int", "int", "int", "int"],
            "gradient_booster": gradient_booster,
            "objective": {"name": objective, "reg_loss_param": {"scale_pos_weight": "1"}},
            "learner_model_param": {
                "base_score": base_score,
                "boost_from_average": "1",
                "num_class": "0",
                "num_feature": "4",
                "num_target": "1"
            }
        }
    })
}

pub fn gbtree_json(trees: Vec<Value>) -> Value {
    let n = trees.len();
    let indptr: Vec<usize> = (0..=n).collect();
    let tree_info = vec![0; n];
    json!({
        "name": "gbtree",
        "model": {
            "gbtree_model_param": {"num_parallel_tree": "1", "num_trees": n.to_string()},
            "iteration_indptr": indptr,
            "tree_info": tree_info,
            "trees": trees
        }
    })
}

pub fn fixture_model_json(target: PriceTarget) -> Value {
    match target {
        PriceTarget::MinPrice => model_json(
            gbtree_json(vec![stump_json(0, 0.5, -500.0, 1200.0)]),
            "reg:squarederror",
            json!("0E0"),
        ),
        PriceTarget::MaxPrice => model_json(
            gbtree_json(vec![stump_json(3, 6.5, 2600.0, 3400.0)]),
            "reg:squarederror",
            json!("[5E-1]"),
        ),
        PriceTarget::ModalPrice => model_json(
            json!({
                "name": "gblinear",
                "model": {"weights": [10.0, 20.0, 0.0, 100.0, 1500.0]}
            }),
            "reg:squarederror",
            json!(0.0),
        ),
    }
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Write the full fixture store into a fresh temporary directory.
pub fn fixture_store() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_json(&artifact_path(dir.path(), LABEL_ENCODERS), &encoders_json());
    for target in PriceTarget::ALL {
        write_json(
            &artifact_path(dir.path(), &target.artifact_name()),
            &fixture_model_json(target),
        );
    }
    dir
}

pub fn fixture_artifacts() -> Artifacts {
    let dir = fixture_store();
    crate::io::artifacts::load(dir.path()).unwrap()
}

/// A model whose every invocation fails.
pub struct FailingModel;

impl Regressor for FailingModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, PredictError> {
        Err(PredictError::Model("injected failure".into()))
    }

    fn describe(&self) -> String {
        "failing".into()
    }
}

/// A model that always returns the same value.
pub struct ConstantModel(pub f64);

impl Regressor for ConstantModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, PredictError> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("constant {}", self.0)
    }
}

/// A model that panics, standing in for an unexpected bug.
pub struct PanickingModel;

impl Regressor for PanickingModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, PredictError> {
        panic!("model bug")
    }

    fn describe(&self) -> String {
        "panicking".into()
    }
}

pub fn constant_bundle(min: f64, max: f64, modal: f64) -> ModelBundle {
    ModelBundle::new(
        Box::new(ConstantModel(min)),
        Box::new(ConstantModel(max)),
        Box::new(ConstantModel(modal)),
    )
}

pub fn pune_onion_march() -> PredictionRequest {
    PredictionRequest::new("Pune", "Onion", "Local", "March")
}
