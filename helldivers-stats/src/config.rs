//! Analysis configuration: validation policy, subject names, comparison and
//! chart settings. Every section falls back to its defaults when omitted.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{
    ACCURACY, DEATHS_PER_MISSION, EfficiencyMetrics, KILLS_PER_MISSION, OBJECTIVES_PER_MISSION,
    SAMPLES_PER_MISSION,
};

/// How strictly raw counters are checked before derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Derive whatever the counters say, impossible states included.
    #[default]
    Lenient,
    /// Reject counters that describe impossible states.
    Strict,
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub validation: ValidationPolicy,
    pub subjects: SubjectNames,
    pub comparison: ComparisonCfg,
    pub charts: ChartCfg,
}

/// Display names used when the input does not name its subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectNames {
    pub first: String,
    pub second: String,
}

impl Default for SubjectNames {
    fn default() -> Self {
        Self {
            first: "Player 1".to_string(),
            second: "Player 2".to_string(),
        }
    }
}

impl SubjectNames {
    /// Default name for the subject at `index`.
    #[must_use]
    pub fn for_index(&self, index: usize) -> String {
        match index {
            0 => self.first.clone(),
            1 => self.second.clone(),
            n => format!("Player {}", n + 1),
        }
    }
}

/// Which efficiency metrics appear in side-by-side comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonCfg {
    pub efficiency_metrics: Vec<String>,
}

impl Default for ComparisonCfg {
    fn default() -> Self {
        Self {
            efficiency_metrics: [
                KILLS_PER_MISSION,
                ACCURACY,
                DEATHS_PER_MISSION,
                OBJECTIVES_PER_MISSION,
                SAMPLES_PER_MISSION,
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

/// Chart data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartCfg {
    /// Divisor applied to XP per mission so it shares an axis with samples.
    pub xp_scale: f64,
    /// Drop the kill distribution panels when no kills were recorded.
    pub hide_empty_kill_panels: bool,
    /// Width in cells of the longest bar in terminal renderings.
    pub bar_width: usize,
}

impl Default for ChartCfg {
    fn default() -> Self {
        Self {
            xp_scale: 100.0,
            hide_empty_kill_panels: true,
            bar_width: 40,
        }
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("comparison.efficiency_metrics names unknown metric {0:?}")]
    UnknownMetric(String),
    #[error("charts.xp_scale must be a positive number (got {0})")]
    XpScale(f64),
    #[error("charts.bar_width must be at least 1")]
    BarWidth,
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants and canonicalize metric names.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for name in &mut self.comparison.efficiency_metrics {
            let canonical = EfficiencyMetrics::canonical_name(name)
                .ok_or_else(|| ConfigError::UnknownMetric(name.clone()))?;
            canonical.clone_into(name);
        }
        if !self.charts.xp_scale.is_finite() || self.charts.xp_scale <= 0.0 {
            return Err(ConfigError::XpScale(self.charts.xp_scale));
        }
        if self.charts.bar_width == 0 {
            return Err(ConfigError::BarWidth);
        }
        Ok(())
    }
}
