//! Side-by-side comparison of two subjects.
//!
//! Each subject is derived on its own and the results are paired by display
//! name; no value is ever computed across subjects.
use serde::{Deserialize, Serialize};

use crate::counters::RawCounters;
use crate::engine::MetricDerivationEngine;
use crate::error::InvalidInput;
use crate::kills::EnemyKillBreakdown;
use crate::metrics::{DerivedMetrics, EXTRACTION_RATE, MISSION_SUCCESS_RATE, XP_PER_MISSION};
use crate::numbers::{i64_to_f64, u64_to_f64};

/// One subject's counters together with everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMetrics {
    pub name: String,
    pub counters: RawCounters,
    pub metrics: DerivedMetrics,
    pub kills: EnemyKillBreakdown,
}

impl SubjectMetrics {
    /// Derive a named subject.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from `engine`.
    pub fn derive(
        engine: &MetricDerivationEngine,
        name: impl Into<String>,
        counters: RawCounters,
    ) -> Result<Self, InvalidInput> {
        let metrics = engine.derive(&counters)?;
        Ok(Self {
            name: name.into(),
            counters,
            metrics,
            kills: EnemyKillBreakdown::from_counters(&counters),
        })
    }
}

/// A metric shown for both subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: String,
    pub values: [f64; 2],
}

impl ComparisonRow {
    fn new(metric: impl Into<String>, left: f64, right: f64) -> Self {
        Self {
            metric: metric.into(),
            values: [left, right],
        }
    }
}

/// Two independently derived subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub subjects: [SubjectMetrics; 2],
}

impl Comparison {
    /// Derive both subjects and pair them.
    ///
    /// # Errors
    ///
    /// Fails if either subject fails validation.
    pub fn derive(
        engine: &MetricDerivationEngine,
        first: (impl Into<String>, RawCounters),
        second: (impl Into<String>, RawCounters),
    ) -> Result<Self, InvalidInput> {
        let left = SubjectMetrics::derive(engine, first.0, first.1)?;
        let right = SubjectMetrics::derive(engine, second.0, second.1)?;
        Ok(Self::pair(left, right))
    }

    #[must_use]
    pub const fn pair(left: SubjectMetrics, right: SubjectMetrics) -> Self {
        Self {
            subjects: [left, right],
        }
    }

    #[must_use]
    pub fn names(&self) -> [&str; 2] {
        [
            self.subjects[0].name.as_str(),
            self.subjects[1].name.as_str(),
        ]
    }

    /// Look up a subject by display name.
    #[must_use]
    pub fn subject(&self, name: &str) -> Option<&SubjectMetrics> {
        self.subjects.iter().find(|subject| subject.name == name)
    }

    /// Selected efficiency metrics; names that match nothing are skipped.
    #[must_use]
    pub fn efficiency_rows(&self, metrics: &[String]) -> Vec<ComparisonRow> {
        let [left, right] = &self.subjects;
        metrics
            .iter()
            .filter_map(|name| {
                let a = left.metrics.efficiency.get(name)?;
                let b = right.metrics.efficiency.get(name)?;
                Some(ComparisonRow::new(name.clone(), a, b))
            })
            .collect()
    }

    #[must_use]
    pub fn combat_rows(&self) -> Vec<ComparisonRow> {
        let [left, right] = &self.subjects;
        left.metrics
            .combat_style
            .entries()
            .into_iter()
            .zip(right.metrics.combat_style.entries())
            .map(|((name, a), (_, b))| ComparisonRow::new(name, i64_to_f64(a), i64_to_f64(b)))
            .collect()
    }

    /// Success rate, extraction rate and XP per mission divided by `xp_scale`.
    #[must_use]
    pub fn success_rows(&self, xp_scale: f64) -> Vec<ComparisonRow> {
        let [left, right] = &self.subjects;
        vec![
            ComparisonRow::new(
                MISSION_SUCCESS_RATE,
                left.metrics.mission_success_rate,
                right.metrics.mission_success_rate,
            ),
            ComparisonRow::new(
                EXTRACTION_RATE,
                left.metrics.extraction_rate,
                right.metrics.extraction_rate,
            ),
            ComparisonRow::new(
                XP_PER_MISSION,
                left.metrics.xp_per_mission / xp_scale,
                right.metrics.xp_per_mission / xp_scale,
            ),
        ]
    }

    #[must_use]
    pub fn kill_rows(&self) -> Vec<ComparisonRow> {
        let [left, right] = &self.subjects;
        left.kills
            .entries()
            .into_iter()
            .zip(right.kills.entries())
            .map(|((name, a), (_, b))| ComparisonRow::new(name, u64_to_f64(a), u64_to_f64(b)))
            .collect()
    }

    #[must_use]
    pub fn kill_share_rows(&self) -> Vec<ComparisonRow> {
        let [left, right] = &self.subjects;
        left.kills
            .shares()
            .into_iter()
            .zip(right.kills.shares())
            .map(|((name, a), (_, b))| ComparisonRow::new(name, a, b))
            .collect()
    }
}
