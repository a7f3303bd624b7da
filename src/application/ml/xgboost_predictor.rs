//! Gradient-boosted tree ensemble evaluated from an XGBoost JSON dump.
//!
//! The artifact holds `base_score` plus the trees produced by
//! `Booster.get_dump(dump_format="json")`. Each split node sends a row to
//! `yes` when `x < split_condition`, to `missing` when `x` is NaN and to
//! `no` otherwise; the margin is `base_score + Σ leaf`.

use super::predictor::Regressor;
use super::read_json_artifact;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::feature_index;
use crate::domain::ml::{FEATURE_COUNT, ScaledFeatures};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const ARTIFACT: &str = "xgboost";

/// Intercept assumed when the dump does not record one (pre-2.0 default).
const DEFAULT_BASE_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
struct BoosterArtifact {
    #[serde(default)]
    base_score: Option<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    trees: Vec<DumpNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DumpNode {
    Leaf {
        nodeid: usize,
        leaf: f64,
    },
    Split {
        nodeid: usize,
        split: String,
        split_condition: f64,
        yes: usize,
        no: usize,
        missing: usize,
        #[serde(default)]
        children: Vec<DumpNode>,
    },
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
}

/// One tree flattened into a node table indexed by `nodeid`.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Option<Node>>,
}

impl Tree {
    fn compile(root: &DumpNode, feature_names: Option<&[String]>) -> Result<Self, String> {
        let mut nodes: Vec<Option<Node>> = Vec::new();
        let mut stack = vec![root];

        while let Some(dump) = stack.pop() {
            let (id, node) = match dump {
                DumpNode::Leaf { nodeid, leaf } => (*nodeid, Node::Leaf(*leaf)),
                DumpNode::Split {
                    nodeid,
                    split,
                    split_condition,
                    yes,
                    no,
                    missing,
                    children,
                } => {
                    stack.extend(children.iter());
                    let feature = resolve_feature(split, feature_names)?;
                    (
                        *nodeid,
                        Node::Split {
                            feature,
                            threshold: *split_condition as f32,
                            yes: *yes,
                            no: *no,
                            missing: *missing,
                        },
                    )
                }
            };

            if nodes.len() <= id {
                nodes.resize(id + 1, None);
            }
            if nodes[id].replace(node).is_some() {
                return Err(format!("duplicate node id {}", id));
            }
        }

        let tree = Self { nodes };
        tree.check_links()?;
        Ok(tree)
    }

    fn check_links(&self) -> Result<(), String> {
        if self.nodes.first().copied().flatten().is_none() {
            return Err("tree has no root node".to_string());
        }
        for node in self.nodes.iter().flatten() {
            if let Node::Split { yes, no, missing, .. } = node {
                for child in [*yes, *no, *missing] {
                    if self.nodes.get(child).copied().flatten().is_none() {
                        return Err(format!("dangling child reference {}", child));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, features: &ScaledFeatures) -> Result<f64, String> {
        let mut id = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(id).copied().flatten() {
                Some(Node::Leaf(value)) => return Ok(value),
                Some(Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                }) => {
                    let x = features
                        .get(feature)
                        .ok_or_else(|| format!("feature {} out of range", feature))?;
                    // xgboost evaluates splits in single precision
                    id = if x.is_nan() {
                        missing
                    } else if (x as f32) < threshold {
                        yes
                    } else {
                        no
                    };
                }
                None => return Err(format!("node {} missing", id)),
            }
        }
        Err("cycle detected while walking tree".to_string())
    }
}

fn resolve_feature(split: &str, feature_names: Option<&[String]>) -> Result<usize, String> {
    let index = feature_names
        .and_then(|names| names.iter().position(|n| n == split))
        .or_else(|| split.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()))
        .or_else(|| feature_index(split))
        .ok_or_else(|| format!("unknown split feature '{}'", split))?;

    if index >= FEATURE_COUNT {
        return Err(format!(
            "split on feature {} but feature registry has {}",
            index, FEATURE_COUNT
        ));
    }
    Ok(index)
}

/// Boosted regression trees loaded from an XGBoost dump.
#[derive(Debug, Clone)]
pub struct XgBoostPredictor {
    base_score: f64,
    trees: Vec<Tree>,
}

impl XgBoostPredictor {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: BoosterArtifact =
            serde_json::from_str(json).map_err(|e| ModelError::ContractViolation {
                artifact: ARTIFACT.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_artifact(artifact)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact: BoosterArtifact = read_json_artifact(ARTIFACT, path)?;
        let model = Self::from_artifact(artifact)?;
        info!(
            "Successfully loaded xgboost model ({} trees) from {:?}",
            model.trees.len(),
            path
        );
        Ok(model)
    }

    fn from_artifact(artifact: BoosterArtifact) -> Result<Self, ModelError> {
        let names = artifact.feature_names.as_deref();
        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, root)| {
                Tree::compile(root, names).map_err(|reason| ModelError::ContractViolation {
                    artifact: ARTIFACT.to_string(),
                    reason: format!("tree {}: {}", i, reason),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let base_score = artifact.base_score.unwrap_or_else(|| {
            warn!(
                "XgBoostPredictor: artifact has no base_score, assuming {}; export it with the dump",
                DEFAULT_BASE_SCORE
            );
            DEFAULT_BASE_SCORE
        });

        Ok(Self { base_score, trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for XgBoostPredictor {
    fn predict(&self, features: &ScaledFeatures) -> Result<f64, ModelError> {
        let mut margin = self.base_score;
        for (i, tree) in self.trees.iter().enumerate() {
            margin += tree
                .leaf_value(features)
                .map_err(|reason| ModelError::InferenceFailed {
                    model: ARTIFACT.to_string(),
                    reason: format!("tree {}: {}", i, reason),
                })?;
        }
        Ok(margin)
    }

    fn name(&self) -> &str {
        "XGBoost"
    }
}
