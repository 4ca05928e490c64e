//! JSON interchange for proofs with string conclusions and axioms
//!
//! ```json
//! {
//!   "goal": "G",
//!   "inferences": [
//!     {"name": "r1", "conclusion": "G", "premises": ["x"], "axioms": ["ax1"]},
//!     {"name": "r2", "conclusion": "x", "axioms": ["ax2"]}
//!   ]
//! }
//! ```
//!
//! `premises` and `axioms` may be omitted; `goal` is optional.

use crate::error::{PinpointError, Result};
use crate::proof::{Inference, InferenceSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceJson {
    pub name: String,
    pub conclusion: String,
    #[serde(default)]
    pub premises: Vec<String>,
    #[serde(default)]
    pub axioms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub inferences: Vec<InferenceJson>,
}

impl ProofJson {
    /// Parse a proof; conclusions and premises must be non-empty strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let proof: ProofJson = serde_json::from_str(json)?;
        proof.validate()?;
        Ok(proof)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if let Some(goal) = &self.goal {
            if goal.is_empty() {
                return Err(PinpointError::InvalidProof("empty goal".to_string()));
            }
        }
        for inference in &self.inferences {
            if inference.conclusion.is_empty() {
                return Err(PinpointError::InvalidProof(format!(
                    "inference '{}' has an empty conclusion",
                    inference.name
                )));
            }
            if inference.premises.iter().any(String::is_empty) {
                return Err(PinpointError::InvalidProof(format!(
                    "inference '{}' has an empty premise",
                    inference.name
                )));
            }
        }
        Ok(())
    }

    /// Record every inference of the set, in insertion order.
    pub fn from_set(set: &InferenceSet<String, String>, goal: Option<&str>) -> Self {
        let inferences = set
            .iter()
            .map(|(inference, axioms)| InferenceJson {
                name: inference.name.clone(),
                conclusion: inference.conclusion.clone(),
                premises: inference.premises.clone(),
                axioms: axioms.to_vec(),
            })
            .collect();
        ProofJson {
            goal: goal.map(str::to_string),
            inferences,
        }
    }

    pub fn to_set(&self) -> InferenceSet<String, String> {
        let mut set = InferenceSet::new();
        for inference in &self.inferences {
            set.add(
                Inference::new(
                    inference.name.clone(),
                    inference.conclusion.clone(),
                    inference.premises.clone(),
                ),
                inference.axioms.iter().cloned(),
            );
        }
        set
    }
}

/// Parse a proof and return it with its goal, if one is given.
pub fn load_proof(json: &str) -> Result<(InferenceSet<String, String>, Option<String>)> {
    let proof = ProofJson::from_json(json)?;
    Ok((proof.to_set(), proof.goal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::Proof;

    const EXAMPLE: &str = r#"{
        "goal": "G",
        "inferences": [
            {"name": "r1", "conclusion": "G", "premises": ["x"], "axioms": ["ax1"]},
            {"name": "r2", "conclusion": "G", "axioms": ["ax2", "ax3"]},
            {"name": "r3", "conclusion": "x", "axioms": ["ax4"]}
        ]
    }"#;

    #[test]
    fn test_load_proof() {
        let (set, goal) = load_proof(EXAMPLE).unwrap();
        assert_eq!(goal.as_deref(), Some("G"));
        assert_eq!(set.len(), 3);
        let inferences = set.inferences(&"G".to_string());
        assert_eq!(inferences.len(), 2);
        assert_eq!(inferences[1].premises, Vec::<String>::new());
    }

    #[test]
    fn test_set_survives_serialization() {
        let proof = ProofJson::from_json(EXAMPLE).unwrap();
        let json = ProofJson::from_set(&proof.to_set(), Some("G")).to_json().unwrap();
        assert_eq!(ProofJson::from_json(&json).unwrap(), proof);
    }

    #[test]
    fn test_goal_is_optional() {
        let (set, goal) = load_proof(r#"{"inferences": [{"name": "r", "conclusion": "a"}]}"#).unwrap();
        assert!(goal.is_none());
        assert_eq!(set.len(), 1);
        let json = ProofJson::from_set(&set, None).to_json().unwrap();
        assert!(!json.contains("goal"));
    }

    #[test]
    fn test_invalid_proofs_are_rejected() {
        let empty_conclusion = r#"{"inferences": [{"name": "r", "conclusion": ""}]}"#;
        assert!(matches!(ProofJson::from_json(empty_conclusion), Err(PinpointError::InvalidProof(_))));
        let empty_premise = r#"{"inferences": [{"name": "r", "conclusion": "a", "premises": [""]}]}"#;
        assert!(matches!(ProofJson::from_json(empty_premise), Err(PinpointError::InvalidProof(_))));
        assert!(matches!(ProofJson::from_json("{"), Err(PinpointError::Json(_))));
    }
}
