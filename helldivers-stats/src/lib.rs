//! Helldivers Stats Engine
//!
//! Platform-agnostic derivation of mission statistics: raw career counters go
//! in, per-mission rates, kill breakdowns, comparisons and chart data come
//! out. This crate performs no logging and no I/O beyond reading the inputs
//! handed to it.

pub mod charts;
pub mod compare;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod kills;
pub mod metrics;
pub mod numbers;
pub mod playtime;

// Re-export commonly used types
pub use charts::{
    DataPoint, Figure, Panel, PanelKind, Series, ValueFormat, analysis_figures,
    comparison_kills_figure, comparison_metrics_figure, kill_distribution_figure,
    performance_figure, rewards_figure,
};
pub use compare::{Comparison, ComparisonRow, SubjectMetrics};
pub use config::{AnalysisConfig, ChartCfg, ComparisonCfg, ConfigError, SubjectNames, ValidationPolicy};
pub use counters::{CounterField, RawCounters};
pub use engine::{MetricDerivationEngine, derive_metrics, validate_strict};
pub use error::{InvalidInput, SourceError};
pub use ingest::{
    CounterSource, JsonSource, NumberStyle, PairSource, Subject, TabularSource,
    counters_from_pairs, parse_assignment, parse_counter_value,
};
pub use kills::EnemyKillBreakdown;
pub use metrics::{CombatStyle, DerivedMetrics, EfficiencyMetrics, StratagemEfficiency};
pub use playtime::PlayTime;

/// Analysis driver pairing a subject source with a derivation engine.
pub struct StatsEngine<S>
where
    S: CounterSource,
{
    source: S,
    engine: MetricDerivationEngine,
    names: SubjectNames,
}

impl<S> StatsEngine<S>
where
    S: CounterSource,
{
    /// Create a stats engine reading from `source` under `config`.
    pub fn new(source: S, config: &AnalysisConfig) -> Self {
        Self {
            source,
            engine: MetricDerivationEngine::from_config(config),
            names: config.subjects.clone(),
        }
    }

    fn named(&self, index: usize, subject: Subject) -> (String, RawCounters) {
        let name = subject
            .name
            .unwrap_or_else(|| self.names.for_index(index));
        (name, subject.counters)
    }

    fn take_subjects(&mut self, expected: usize) -> Result<Vec<Subject>, S::Error> {
        let subjects = self.source.subjects()?;
        if subjects.len() < expected {
            return Err(InvalidInput::MissingSubject {
                expected,
                found: subjects.len(),
            }
            .into());
        }
        Ok(subjects)
    }

    /// Derive every subject the source holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails, is empty, or a subject fails
    /// validation.
    pub fn analyze_all(&mut self) -> Result<Vec<SubjectMetrics>, S::Error> {
        let subjects = self.take_subjects(1)?;
        subjects
            .into_iter()
            .enumerate()
            .map(|(index, subject)| {
                let (name, counters) = self.named(index, subject);
                Ok(SubjectMetrics::derive(&self.engine, name, counters)?)
            })
            .collect()
    }

    /// Derive the first subject only.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails, is empty, or the subject fails
    /// validation.
    pub fn analyze_first(&mut self) -> Result<SubjectMetrics, S::Error> {
        let subject = self
            .take_subjects(1)?
            .into_iter()
            .next()
            .ok_or(InvalidInput::MissingSubject {
                expected: 1,
                found: 0,
            })?;
        let (name, counters) = self.named(0, subject);
        Ok(SubjectMetrics::derive(&self.engine, name, counters)?)
    }

    /// Compare the first two subjects.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails, holds fewer than two subjects,
    /// or either subject fails validation.
    pub fn compare_first_two(&mut self) -> Result<Comparison, S::Error> {
        let mut subjects = self.take_subjects(2)?.into_iter();
        let (Some(first), Some(second)) = (subjects.next(), subjects.next()) else {
            return Err(InvalidInput::MissingSubject {
                expected: 2,
                found: 0,
            }
            .into());
        };
        let first = self.named(0, first);
        let second = self.named(1, second);
        Ok(Comparison::derive(&self.engine, first, second)?)
    }

    #[must_use]
    pub const fn engine(&self) -> &MetricDerivationEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error(transparent)]
    struct FixtureError(#[from] InvalidInput);

    struct FixtureSource(Vec<Subject>);

    impl CounterSource for FixtureSource {
        type Error = FixtureError;

        fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error> {
            Ok(self.0.clone())
        }
    }

    fn subject(name: Option<&str>, missions: u64) -> Subject {
        Subject::new(
            name.map(str::to_string),
            RawCounters {
                missions_played: missions,
                missions_won: missions,
                ..RawCounters::default()
            },
        )
    }

    #[test]
    fn unnamed_subjects_take_configured_names() {
        let source = FixtureSource(vec![subject(None, 2), subject(Some("Bravo"), 4)]);
        let mut stats = StatsEngine::new(source, &AnalysisConfig::default());
        let comparison = stats.compare_first_two().unwrap();
        assert_eq!(comparison.names(), ["Player 1", "Bravo"]);
    }

    #[test]
    fn comparison_needs_two_subjects() {
        let source = FixtureSource(vec![subject(None, 2)]);
        let mut stats = StatsEngine::new(source, &AnalysisConfig::default());
        let err = stats.compare_first_two().unwrap_err();
        assert!(matches!(
            err.0,
            InvalidInput::MissingSubject {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn analyze_all_derives_each_row() {
        let source = FixtureSource(vec![subject(None, 2), subject(None, 0), subject(None, 5)]);
        let mut stats = StatsEngine::new(source, &AnalysisConfig::default());
        let all = stats.analyze_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].name, "Player 3");
        assert!((all[1].metrics.mission_success_rate).abs() < f64::EPSILON);
        assert!((all[2].metrics.mission_success_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn strict_config_flows_into_engine() {
        let config = AnalysisConfig {
            validation: ValidationPolicy::Strict,
            ..AnalysisConfig::default()
        };
        let bad = Subject::new(
            None,
            RawCounters {
                missions_won: 1,
                ..RawCounters::default()
            },
        );
        let mut stats = StatsEngine::new(FixtureSource(vec![bad]), &config);
        assert_eq!(stats.engine().policy(), ValidationPolicy::Strict);
        assert!(stats.analyze_first().is_err());
    }
}
