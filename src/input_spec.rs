//! Plain-data descriptions of probabilistic input models.
//!
//! These records are what a catalog entry or a configuration file holds;
//! [`ProbabilisticInput::from_spec`](crate::ProbabilisticInput::from_spec)
//! turns one into a live model with validated marginals and fresh streams.
//!
//! ```
//! use uqtestfuns::ProbInputSpec;
//!
//! let json = r#"{
//!     "name": "demo",
//!     "marginals": [
//!         { "name": "x", "distribution": "uniform", "parameters": [0.0, 1.0] },
//!         { "distribution": "truncated-normal", "parameters": [0.0, 1.0, -2.0, 2.0] }
//!     ]
//! }"#;
//! let spec: ProbInputSpec = serde_json::from_str(json).unwrap();
//! assert_eq!(spec.dimension(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::distributions::DistributionKind;

/// One marginal: distribution kind and parameter vector, with optional labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distribution: DistributionKind,
    pub parameters: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MarginalSpec {
    pub fn new(distribution: DistributionKind, parameters: impl Into<Vec<f64>>) -> Self {
        Self {
            name: None,
            distribution,
            parameters: parameters.into(),
            description: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered list of independent marginals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbInputSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub marginals: Vec<MarginalSpec>,
}

impl ProbInputSpec {
    pub fn new(marginals: Vec<MarginalSpec>) -> Self {
        Self {
            name: None,
            description: None,
            marginals,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `dimension` copies of `marginal`, named `X1`, `X2`, ….
    ///
    /// Used by variable-dimension test functions.
    pub fn replicated(
        name: impl Into<String>,
        description: impl Into<String>,
        marginal: MarginalSpec,
        dimension: usize,
    ) -> Self {
        let marginals = (1..=dimension)
            .map(|i| MarginalSpec {
                name: Some(format!("X{i}")),
                ..marginal.clone()
            })
            .collect();
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            marginals,
        }
    }

    pub fn dimension(&self) -> usize {
        self.marginals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicated_names() {
        let spec = ProbInputSpec::replicated(
            "Sobol-G",
            "unit hypercube",
            MarginalSpec::new(DistributionKind::Uniform, [0.0, 1.0]),
            4,
        );
        assert_eq!(spec.dimension(), 4);
        let names: Vec<_> = spec
            .marginals
            .iter()
            .map(|m| m.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["X1", "X2", "X3", "X4"]);
        assert!(spec
            .marginals
            .iter()
            .all(|m| m.parameters == [0.0, 1.0]));
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"[
            {"distribution": "gumbel-max", "parameters": [0.0, 1.0]},
            {"distribution": "logit-normal", "parameters": [0.0, 1.0]},
            {"distribution": "truncnormal", "parameters": [0.0, 1.0, -1.0, 1.0]},
            {"distribution": "trunc-gumbel", "parameters": [0.0, 1.0, -1.0, 1.0]}
        ]"#;
        let specs: Vec<MarginalSpec> = serde_json::from_str(json).unwrap();
        let kinds: Vec<_> = specs.iter().map(|m| m.distribution).collect();
        assert_eq!(
            kinds,
            [
                DistributionKind::Gumbel,
                DistributionKind::Logitnormal,
                DistributionKind::TruncNormal,
                DistributionKind::TruncGumbel,
            ]
        );
    }

    #[test]
    fn test_unknown_distribution_rejected() {
        let json = r#"{"distribution": "cauchy", "parameters": [0.0, 1.0]}"#;
        assert!(serde_json::from_str::<MarginalSpec>(json).is_err());
    }

    #[test]
    fn test_serialize_skips_missing_labels() {
        let spec = MarginalSpec::new(DistributionKind::Exponential, [2.0]);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"distribution":"exponential","parameters":[2.0]}"#);
    }
}
