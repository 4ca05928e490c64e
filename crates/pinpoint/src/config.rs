//! Enumeration configuration types.

use crate::error::{PinpointError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold used when `threshold` is given without a value
pub const DEFAULT_THRESHOLD: usize = 2;

/// Configuration for justification enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Algorithm used for justifications (repairs always use the repair search)
    pub strategy: EnumerationStrategy,
    /// Enable structured profiling (zero overhead when false)
    pub enable_profiling: bool,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig {
            strategy: EnumerationStrategy::Resolution(SelectionStrategy::Threshold(DEFAULT_THRESHOLD)),
            enable_profiling: false,
        }
    }
}

impl EnumerationConfig {
    pub fn validate(&self) -> Result<()> {
        if let EnumerationStrategy::Resolution(SelectionStrategy::Threshold(0)) = self.strategy {
            return Err(PinpointError::InvalidConfig(
                "selection threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EnumerationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Algorithms enumerating justifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumerationStrategy {
    /// Propagate families of justifications from axioms toward the goal
    BottomUp,
    /// Expand open conclusions from the goal toward axioms
    TopDown,
    /// Resolve inferences under a selection function
    Resolution(SelectionStrategy),
}

/// Selection functions for the resolution enumerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Resolve on the premise with the fewest inferences
    BottomUp,
    /// Resolve on the conclusion unless it is the goal
    TopDown,
    /// Like bottom-up, but premises with more inferences than the threshold
    /// are only selected for the goal
    Threshold(usize),
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::BottomUp => write!(f, "bottom-up"),
            SelectionStrategy::TopDown => write!(f, "top-down"),
            SelectionStrategy::Threshold(threshold) => write!(f, "threshold:{}", threshold),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = PinpointError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom-up" | "bottomup" => Ok(SelectionStrategy::BottomUp),
            "top-down" | "topdown" => Ok(SelectionStrategy::TopDown),
            "threshold" => Ok(SelectionStrategy::Threshold(DEFAULT_THRESHOLD)),
            other => {
                let value = other
                    .strip_prefix("threshold:")
                    .ok_or_else(|| PinpointError::UnknownSelection(s.to_string()))?;
                let threshold: usize = value
                    .parse()
                    .map_err(|_| PinpointError::UnknownSelection(s.to_string()))?;
                if threshold == 0 {
                    return Err(PinpointError::InvalidConfig(
                        "selection threshold must be at least 1".to_string(),
                    ));
                }
                Ok(SelectionStrategy::Threshold(threshold))
            }
        }
    }
}

impl fmt::Display for EnumerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationStrategy::BottomUp => write!(f, "bottom-up"),
            EnumerationStrategy::TopDown => write!(f, "top-down"),
            EnumerationStrategy::Resolution(selection) => write!(f, "resolution/{}", selection),
        }
    }
}

impl FromStr for EnumerationStrategy {
    type Err = PinpointError;

    /// Accepts `bottom-up`, `top-down`, `resolution` and `resolution/<selection>`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bottom-up" | "bottomup" => Ok(EnumerationStrategy::BottomUp),
            "top-down" | "topdown" => Ok(EnumerationStrategy::TopDown),
            "resolution" => Ok(EnumerationStrategy::Resolution(SelectionStrategy::Threshold(
                DEFAULT_THRESHOLD,
            ))),
            other => match other.strip_prefix("resolution/") {
                Some(selection) => Ok(EnumerationStrategy::Resolution(selection.parse()?)),
                None => Err(PinpointError::UnknownStrategy(s.to_string())),
            },
        }
    }
}
