//! XGBoost JSON model reader.
//!
//! Parses the subset of XGBoost's native JSON format (`save_model("*.json")`)
//! needed to evaluate single-output regression models, then converts it into a
//! [`BoostedRegressor`]. Every compatibility check happens here so that a
//! converted model can only fail at predict time on bad inputs, never on bad
//! structure.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::EncodedFeatureRow;
use crate::error::LoadError;
use crate::models::{BoostedRegressor, Booster, Link, LinearBooster, Node, Tree, TreeEnsemble};

// XGBoost writes most scalar parameters as strings ("5E-1", "[5E-1]", "4").

fn scalar_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            let t = t
                .strip_prefix('[')
                .and_then(|inner| inner.strip_suffix(']'))
                .unwrap_or(t);
            t.trim().parse().ok()
        }
        Value::Array(items) if items.len() == 1 => scalar_f64(&items[0]),
        _ => None,
    }
}

// Models are evaluated in single precision, like XGBoost itself.
fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = Value::deserialize(deserializer)?;
    scalar_f64(&value)
        .map(|f| f as f32)
        .ok_or_else(|| D::Error::custom(format!("expected a scalar number, got {value}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flags<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flags = Vec::<Flag>::deserialize(deserializer)?;
    Ok(flags
        .into_iter()
        .map(|f| match f {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        })
        .collect())
}

fn default_one() -> i64 {
    1
}

/// One tree in XGBoost's parallel-array layout.
#[derive(Debug, Clone, Deserialize)]
pub struct XgbTree {
    pub left_children: Vec<i64>,
    pub right_children: Vec<i64>,
    pub split_indices: Vec<i64>,
    pub split_conditions: Vec<f32>,
    #[serde(default, deserialize_with = "deserialize_flags")]
    pub default_left: Vec<bool>,
    #[serde(default)]
    pub split_type: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbTreeModel {
    pub trees: Vec<XgbTree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbTreeDefinition {
    pub model: XgbTreeModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbLinearModel {
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum XgbGradientBooster {
    Gbtree { model: XgbTreeModel },
    Gblinear { model: XgbLinearModel },
    Dart { gbtree: XgbTreeDefinition, weight_drop: Vec<f32> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbObjective {
    pub name: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct XgbLearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f32,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub num_class: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub num_feature: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_one")]
    pub num_target: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgbLearner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: XgbGradientBooster,
    pub objective: XgbObjective,
    pub learner_model_param: XgbLearnerModelParam,
}

/// Top-level XGBoost JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct XgbModel {
    #[serde(default)]
    pub version: Vec<u32>,
    pub learner: XgbLearner,
}

/// Output link for a regression objective, `None` for anything else.
pub fn objective_link(name: &str) -> Option<Link> {
    match name {
        "reg:squarederror" | "reg:linear" | "reg:squaredlogerror" | "reg:absoluteerror"
        | "reg:pseudohubererror" | "reg:quantileerror" => Some(Link::Identity),
        "reg:gamma" | "reg:tweedie" | "count:poisson" => Some(Link::Exp),
        _ => None,
    }
}

impl XgbModel {
    /// Validate against the training schema and convert to a native model.
    ///
    /// `path` is only used to label errors.
    pub fn into_regressor(self, path: &Path) -> Result<BoostedRegressor, LoadError> {
        let learner = self.learner;
        let objective = learner.objective.name;
        let link = objective_link(&objective)
            .ok_or_else(|| LoadError::incompatible(path, format!("'{objective}' is not a regression objective")))?;

        let param = learner.learner_model_param;
        if param.num_class > 1 || param.num_target > 1 {
            return Err(LoadError::incompatible(
                path,
                format!(
                    "expected a single-output model, found num_class={} num_target={}",
                    param.num_class, param.num_target
                ),
            ));
        }

        let columns = EncodedFeatureRow::COLUMNS;
        if !learner.feature_names.is_empty() && learner.feature_names != columns {
            return Err(LoadError::incompatible(
                path,
                format!(
                    "feature names {:?} do not match training columns {:?}",
                    learner.feature_names, columns
                ),
            ));
        }
        if param.num_feature != 0 && param.num_feature != columns.len() as i64 {
            return Err(LoadError::incompatible(
                path,
                format!("model has {} features, expected {}", param.num_feature, columns.len()),
            ));
        }

        let booster = match learner.gradient_booster {
            XgbGradientBooster::Gbtree { model } => {
                let trees = convert_trees(&model.trees, path)?;
                let weights = vec![1.0; trees.len()];
                Booster::Trees(TreeEnsemble::new(trees, weights))
            }
            XgbGradientBooster::Dart { gbtree, weight_drop } => {
                let trees = convert_trees(&gbtree.model.trees, path)?;
                if weight_drop.len() != trees.len() {
                    return Err(LoadError::incompatible(
                        path,
                        format!("dart has {} trees but {} drop weights", trees.len(), weight_drop.len()),
                    ));
                }
                Booster::Trees(TreeEnsemble::new(trees, weight_drop))
            }
            XgbGradientBooster::Gblinear { model } => Booster::Linear(convert_linear(&model.weights, path)?),
        };

        Ok(BoostedRegressor {
            booster,
            base_margin: link.to_margin(param.base_score),
            link,
            objective,
        })
    }
}

// Single output group: one coefficient per feature, then the bias.
fn convert_linear(weights: &[f32], path: &Path) -> Result<LinearBooster, LoadError> {
    let width = EncodedFeatureRow::WIDTH;
    match weights.split_last() {
        Some((bias, coefs)) if coefs.len() == width => Ok(LinearBooster::new(coefs.to_vec(), *bias)),
        _ => Err(LoadError::incompatible(
            path,
            format!("gblinear expects {} weights, found {}", width + 1, weights.len()),
        )),
    }
}

fn convert_trees(trees: &[XgbTree], path: &Path) -> Result<Vec<Tree>, LoadError> {
    trees
        .iter()
        .enumerate()
        .map(|(i, tree)| convert_tree(tree).map_err(|reason| LoadError::incompatible(path, format!("tree {i}: {reason}"))))
        .collect()
}

fn convert_tree(tree: &XgbTree) -> Result<Tree, String> {
    let n = tree.left_children.len();
    if n == 0 {
        return Err("tree has no nodes".to_string());
    }
    let lengths = [
        ("right_children", tree.right_children.len()),
        ("split_indices", tree.split_indices.len()),
        ("split_conditions", tree.split_conditions.len()),
    ];
    for (name, len) in lengths {
        if len != n {
            return Err(format!("{name} has {len} entries, expected {n}"));
        }
    }
    if !tree.default_left.is_empty() && tree.default_left.len() != n {
        return Err(format!("default_left has {} entries, expected {n}", tree.default_left.len()));
    }
    if tree.split_type.iter().any(|&t| t != 0) {
        return Err("categorical splits are not supported".to_string());
    }

    let child = |raw: i64, parent: usize| -> Result<usize, String> {
        usize::try_from(raw)
            .ok()
            .filter(|&c| c > parent && c < n)
            .ok_or_else(|| format!("node {parent} has invalid child {raw}"))
    };

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        if tree.left_children[i] == -1 {
            nodes.push(Node::Leaf {
                value: tree.split_conditions[i],
            });
            continue;
        }
        let feature = usize::try_from(tree.split_indices[i])
            .ok()
            .filter(|&f| f < EncodedFeatureRow::WIDTH)
            .ok_or_else(|| format!("node {i} splits on unknown feature {}", tree.split_indices[i]))?;
        nodes.push(Node::Split {
            feature,
            threshold: tree.split_conditions[i],
            left: child(tree.left_children[i], i)?,
            right: child(tree.right_children[i], i)?,
            default_left: tree.default_left.get(i).copied().unwrap_or(true),
        });
    }
    Ok(Tree::new(nodes))
}
