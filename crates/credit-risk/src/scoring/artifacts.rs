//! Pre-fitted model artifacts exported by the training pipeline.
//!
//! Both artifacts are plain JSON so the service carries no runtime dependency on the training
//! stack. Loading validates shapes and the column contract up front; once loaded an artifact is
//! immutable and shared by every request.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::features::{
    RawFeatures, ScoredFeatureVector, MODEL_FEATURES, NUMERIC_COLUMNS, NUMERIC_FEATURES,
};

/// Fitted transform from raw numeric columns to normalized columns.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &RawFeatures) -> [f64; NUMERIC_FEATURES];
}

/// Fitted binary model returning the probability of the high-risk class.
pub trait Classifier: Send + Sync {
    fn positive_class_probability(&self, features: &ScoredFeatureVector) -> f64;
}

/// Standardization parameters: `(x - mean) / scale` per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerArtifact {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScalerArtifact {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_reader(reader).map_err(ArtifactError::Parse)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        for (field, len) in [
            ("feature_names", self.feature_names.len()),
            ("mean", self.mean.len()),
            ("scale", self.scale.len()),
        ] {
            if len != NUMERIC_FEATURES {
                return Err(ArtifactError::Shape {
                    field,
                    expected: NUMERIC_FEATURES,
                    actual: len,
                });
            }
        }

        for (position, (found, expected)) in self
            .feature_names
            .iter()
            .zip(NUMERIC_COLUMNS)
            .enumerate()
        {
            if found != expected {
                return Err(ArtifactError::ColumnOrder {
                    position,
                    expected,
                    found: found.clone(),
                });
            }
        }

        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|value| !value.is_finite())
        {
            return Err(ArtifactError::NonFinite("scaler"));
        }

        Ok(())
    }
}

impl Scaler for StandardScalerArtifact {
    fn transform(&self, features: &RawFeatures) -> [f64; NUMERIC_FEATURES] {
        let mut scaled = [0.0; NUMERIC_FEATURES];
        for (index, value) in features.as_slice().iter().enumerate() {
            // constant columns are fitted with a zero scale and left unscaled
            let scale = if self.scale[index] == 0.0 {
                1.0
            } else {
                self.scale[index]
            };
            scaled[index] = (value - self.mean[index]) / scale;
        }
        scaled
    }
}

/// Serialized classifier, tagged by model family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        trees: Vec<DecisionTree>,
    },
}

impl ClassifierArtifact {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_reader(reader).map_err(ArtifactError::Parse)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::LogisticRegression { .. } => "logistic_regression",
            ClassifierArtifact::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ClassifierArtifact::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != MODEL_FEATURES {
                    return Err(ArtifactError::Shape {
                        field: "coefficients",
                        expected: MODEL_FEATURES,
                        actual: coefficients.len(),
                    });
                }
                if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
                    return Err(ArtifactError::NonFinite("logistic regression"));
                }
                Ok(())
            }
            ClassifierArtifact::TreeEnsemble { trees } => {
                if trees.is_empty() {
                    return Err(ArtifactError::InvalidTree {
                        tree: 0,
                        reason: "ensemble contains no trees".to_string(),
                    });
                }
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate()
                        .map_err(|reason| ArtifactError::InvalidTree {
                            tree: index,
                            reason,
                        })?;
                }
                Ok(())
            }
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn positive_class_probability(&self, features: &ScoredFeatureVector) -> f64 {
        match self {
            ClassifierArtifact::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let logit = coefficients
                    .iter()
                    .zip(features.as_slice())
                    .fold(*intercept, |acc, (weight, value)| acc + weight * value);
                sigmoid(logit)
            }
            ClassifierArtifact::TreeEnsemble { trees } => {
                let total: f64 = trees
                    .iter()
                    .map(|tree| tree.leaf_probability(features.as_slice()))
                    .sum();
                total / trees.len() as f64
            }
        }
    }
}

fn sigmoid(logit: f64) -> f64 {
    if logit >= 0.0 {
        1.0 / (1.0 + (-logit).exp())
    } else {
        let exp = logit.exp();
        exp / (1.0 + exp)
    }
}

/// Binary decision tree stored as parallel node arrays.
///
/// Node 0 is the root. A node whose left child is `-1` is a leaf; `value` holds the
/// positive-class probability observed at each node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

const LEAF: i64 = -1;

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self) -> Result<(), String> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != nodes)
        {
            return Err("node arrays differ in length".to_string());
        }

        for node in 0..nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF {
                let value = self.value[node];
                if !(0.0..=1.0).contains(&value) {
                    return Err(format!("leaf {node} probability {value} outside [0, 1]"));
                }
                continue;
            }

            let in_range = |child: i64| child > node as i64 && (child as usize) < nodes;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {node} has out-of-range children"));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= MODEL_FEATURES {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }

        Ok(())
    }

    /// Children always index past their parent (checked at load), so the walk terminates.
    fn leaf_probability(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

pub fn load_scaler(path: impl AsRef<Path>) -> Result<StandardScalerArtifact, ArtifactError> {
    let path = path.as_ref();
    StandardScalerArtifact::from_reader(open(path)?).map_err(|err| err.at(path))
}

pub fn load_classifier(path: impl AsRef<Path>) -> Result<ClassifierArtifact, ArtifactError> {
    let path = path.as_ref();
    ClassifierArtifact::from_reader(open(path)?).map_err(|err| err.at(path))
}

fn open(path: &Path) -> Result<BufReader<File>, ArtifactError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Failure to read or validate a model artifact. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("unable to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("artifact is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("artifact field `{field}` has {actual} entries, expected {expected}")]
    Shape {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("scaler column {position} is `{found}`, expected `{expected}`")]
    ColumnOrder {
        position: usize,
        expected: &'static str,
        found: String,
    },
    #[error("{0} artifact contains non-finite parameters")]
    NonFinite(&'static str),
    #[error("tree {tree} is malformed: {reason}")]
    InvalidTree { tree: usize, reason: String },
    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<ArtifactError>,
    },
}

impl ArtifactError {
    fn at(self, path: &Path) -> Self {
        match self {
            ArtifactError::Io { .. } | ArtifactError::Invalid { .. } => self,
            other => ArtifactError::Invalid {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}
