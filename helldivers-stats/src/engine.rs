//! Metric derivation: raw counters in, named rates and breakdowns out.
//!
//! Every quotient over `missions_played` or `shots_fired` is guarded, so a
//! subject with no missions derives to zeros rather than NaN or infinity.

use crate::config::{AnalysisConfig, ValidationPolicy};
use crate::counters::{CounterField, RawCounters};
use crate::error::InvalidInput;
use crate::metrics::{CombatStyle, DerivedMetrics, EfficiencyMetrics, StratagemEfficiency};
use crate::numbers::{per, percent, u64_to_i64};

/// Derive every metric from `raw`. Pure; never fails.
#[must_use]
pub fn derive_metrics(raw: &RawCounters) -> DerivedMetrics {
    let missions = raw.missions_played;
    DerivedMetrics {
        total_kills: raw.total_kills(),
        efficiency: efficiency_metrics(raw),
        combat_style: combat_style(raw),
        stratagem_efficiency: stratagem_efficiency(raw),
        mission_success_rate: percent(raw.missions_won, missions),
        extraction_rate: percent(raw.successful_extractions, missions),
        objective_completion_rate: per(raw.objectives_completed, missions),
        samples_per_mission: per(raw.samples_collected, missions),
        xp_per_mission: per(raw.total_xp, missions),
    }
}

fn efficiency_metrics(raw: &RawCounters) -> EfficiencyMetrics {
    let missions = raw.missions_played;
    if missions == 0 {
        return EfficiencyMetrics::default();
    }
    EfficiencyMetrics {
        kills_per_mission: per(raw.total_kills(), missions),
        stratagems_per_mission: per(raw.total_stratagems_used, missions),
        objectives_per_mission: per(raw.objectives_completed, missions),
        deaths_per_mission: per(raw.deaths, missions),
        accuracy_pct: percent(raw.shots_hit, raw.shots_fired),
        samples_per_mission: per(raw.samples_collected, missions),
        xp_per_mission: per(raw.total_xp, missions),
    }
}

fn combat_style(raw: &RawCounters) -> CombatStyle {
    let grenade = u64_to_i64(raw.grenade_kills);
    let melee = u64_to_i64(raw.melee_kills);
    let eagle = u64_to_i64(raw.eagle_kills);
    CombatStyle {
        regular_kills: u64_to_i64(raw.total_kills())
            .saturating_sub(grenade)
            .saturating_sub(melee)
            .saturating_sub(eagle),
        grenade_kills: grenade,
        melee_kills: melee,
        eagle_kills: eagle,
    }
}

fn stratagem_efficiency(raw: &RawCounters) -> StratagemEfficiency {
    let missions = raw.missions_played;
    StratagemEfficiency {
        orbital_strikes: per(raw.orbitals_used, missions),
        defensive_tools: per(raw.defensive_stratagems_used, missions),
        eagle_support: per(raw.eagles_used, missions),
    }
}

/// Reject counters that describe states the game cannot produce.
///
/// # Errors
///
/// Returns [`InvalidInput::ImpossibleState`] for the first violated bound.
pub fn validate_strict(raw: &RawCounters) -> Result<(), InvalidInput> {
    let bounded = [
        (CounterField::MissionsWon, CounterField::MissionsPlayed),
        (CounterField::SuccessfulExtractions, CounterField::MissionsPlayed),
        (CounterField::ShotsHit, CounterField::ShotsFired),
    ];
    for (field, limit_field) in bounded {
        check_bound(raw.get(field), field.key(), raw.get(limit_field), limit_field.key())?;
    }

    let method_kills = raw
        .grenade_kills
        .saturating_add(raw.melee_kills)
        .saturating_add(raw.eagle_kills);
    check_bound(
        method_kills,
        "grenade_kills + melee_kills + eagle_kills",
        raw.total_kills(),
        "total_kills",
    )
}

const fn check_bound(
    value: u64,
    field: &'static str,
    limit: u64,
    limit_field: &'static str,
) -> Result<(), InvalidInput> {
    if value > limit {
        return Err(InvalidInput::ImpossibleState {
            field,
            value,
            limit_field,
            limit,
        });
    }
    Ok(())
}

/// Derivation with a configured validation policy applied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricDerivationEngine {
    policy: ValidationPolicy,
}

impl MetricDerivationEngine {
    #[must_use]
    pub const fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.validation)
    }

    #[must_use]
    pub const fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Derive metrics for one subject.
    ///
    /// # Errors
    ///
    /// Under [`ValidationPolicy::Strict`], returns an error when the counters
    /// describe an impossible state. Lenient derivation never fails.
    pub fn derive(&self, raw: &RawCounters) -> Result<DerivedMetrics, InvalidInput> {
        if matches!(self.policy, ValidationPolicy::Strict) {
            validate_strict(raw)?;
        }
        Ok(derive_metrics(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawCounters {
        RawCounters {
            missions_played: 10,
            missions_won: 8,
            successful_extractions: 7,
            objectives_completed: 15,
            terminid_kills: 50,
            automaton_kills: 30,
            friendly_kills: 2,
            grenade_kills: 10,
            melee_kills: 5,
            eagle_kills: 5,
            shots_fired: 1000,
            shots_hit: 700,
            deaths: 12,
            samples_collected: 40,
            total_xp: 50_000,
            total_stratagems_used: 20,
            orbitals_used: 8,
            defensive_stratagems_used: 6,
            eagles_used: 6,
            ..RawCounters::default()
        }
    }

    #[test]
    fn stratagem_rates_divide_by_missions() {
        let metrics = derive_metrics(&sample());
        assert!((metrics.stratagem_efficiency.orbital_strikes - 0.8).abs() < 1e-12);
        assert!((metrics.stratagem_efficiency.defensive_tools - 0.6).abs() < 1e-12);
        assert!((metrics.stratagem_efficiency.eagle_support - 0.6).abs() < 1e-12);
        assert!((metrics.efficiency.stratagems_per_mission - 2.0).abs() < 1e-12);
    }

    #[test]
    fn objective_rate_is_a_ratio_not_a_percentage() {
        let metrics = derive_metrics(&sample());
        assert!((metrics.objective_completion_rate - 1.5).abs() < 1e-12);
    }

    #[test]
    fn regular_kills_go_negative_without_clamping() {
        let raw = RawCounters {
            terminid_kills: 3,
            grenade_kills: 5,
            melee_kills: 1,
            ..RawCounters::default()
        };
        let style = derive_metrics(&raw).combat_style;
        assert_eq!(style.regular_kills, -3);
        assert_eq!(style.total(), 3);
    }

    #[test]
    fn lenient_engine_accepts_impossible_states() {
        let raw = RawCounters {
            missions_played: 2,
            missions_won: 5,
            ..RawCounters::default()
        };
        let metrics = MetricDerivationEngine::default().derive(&raw).unwrap();
        assert!((metrics.mission_success_rate - 250.0).abs() < 1e-9);
    }

    #[test]
    fn strict_engine_rejects_impossible_states() {
        let engine = MetricDerivationEngine::new(ValidationPolicy::Strict);
        assert!(engine.derive(&sample()).is_ok());

        let won = RawCounters {
            missions_won: 11,
            ..sample()
        };
        assert_eq!(
            engine.derive(&won).unwrap_err(),
            InvalidInput::ImpossibleState {
                field: "missions_won",
                value: 11,
                limit_field: "missions_played",
                limit: 10,
            }
        );

        let extracted = RawCounters {
            successful_extractions: 12,
            ..sample()
        };
        assert!(engine.derive(&extracted).is_err());

        let hits = RawCounters {
            shots_hit: 1001,
            ..sample()
        };
        assert!(engine.derive(&hits).is_err());

        let methods = RawCounters {
            eagle_kills: 70,
            ..sample()
        };
        assert!(matches!(
            engine.derive(&methods),
            Err(InvalidInput::ImpossibleState {
                limit_field: "total_kills",
                ..
            })
        ));
    }
}
