//! Derived metric groups produced by the derivation engine.
//!
//! Every group keeps a fixed display order and serializes as an ordered
//! `name -> value` map keyed by the display names below.
use serde::{Deserialize, Serialize};

pub const KILLS_PER_MISSION: &str = "Kills per mission";
pub const STRATAGEMS_PER_MISSION: &str = "Stratagems per Mission";
pub const OBJECTIVES_PER_MISSION: &str = "Objectives Per Mission";
pub const DEATHS_PER_MISSION: &str = "Deaths per Mission";
pub const ACCURACY: &str = "Accuracy(%)";
pub const SAMPLES_PER_MISSION: &str = "Samples per Mission";
pub const XP_PER_MISSION: &str = "XP per Mission";

pub const REGULAR_KILLS: &str = "Regular Kills";
pub const GRENADE_KILLS: &str = "Grenade Kills";
pub const MELEE_KILLS: &str = "Melee Kills";
pub const EAGLE_KILLS: &str = "Eagle Kills";

pub const ORBITAL_STRIKES: &str = "Orbital Strikes";
pub const DEFENSIVE_TOOLS: &str = "Defensive Tools";
pub const EAGLE_SUPPORT: &str = "Eagle Support";

pub const TOTAL_KILLS: &str = "Total Kills";
pub const MISSION_SUCCESS_RATE: &str = "Mission Success Rate(%)";
pub const EXTRACTION_RATE: &str = "Extraction Rate(%)";
pub const OBJECTIVE_COMPLETION_RATE: &str = "Objectives Completed per Mission";
pub const SAMPLES_COLLECTED_PER_MISSION: &str = "Samples Collected per Mission";
pub const XP_EARNED_PER_MISSION: &str = "XP Earned per Mission";

/// Per-mission efficiency rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    #[serde(rename = "Kills per mission")]
    pub kills_per_mission: f64,
    #[serde(rename = "Stratagems per Mission")]
    pub stratagems_per_mission: f64,
    #[serde(rename = "Objectives Per Mission")]
    pub objectives_per_mission: f64,
    #[serde(rename = "Deaths per Mission")]
    pub deaths_per_mission: f64,
    #[serde(rename = "Accuracy(%)")]
    pub accuracy_pct: f64,
    #[serde(rename = "Samples per Mission")]
    pub samples_per_mission: f64,
    #[serde(rename = "XP per Mission")]
    pub xp_per_mission: f64,
}

impl EfficiencyMetrics {
    /// Display names in chart order.
    pub const NAMES: [&'static str; 7] = [
        KILLS_PER_MISSION,
        STRATAGEMS_PER_MISSION,
        OBJECTIVES_PER_MISSION,
        DEATHS_PER_MISSION,
        ACCURACY,
        SAMPLES_PER_MISSION,
        XP_PER_MISSION,
    ];

    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 7] {
        [
            (KILLS_PER_MISSION, self.kills_per_mission),
            (STRATAGEMS_PER_MISSION, self.stratagems_per_mission),
            (OBJECTIVES_PER_MISSION, self.objectives_per_mission),
            (DEATHS_PER_MISSION, self.deaths_per_mission),
            (ACCURACY, self.accuracy_pct),
            (SAMPLES_PER_MISSION, self.samples_per_mission),
            (XP_PER_MISSION, self.xp_per_mission),
        ]
    }

    /// Look up a metric by display name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, value)| value)
    }

    /// Canonical display name for `name`, ignoring ASCII case.
    #[must_use]
    pub fn canonical_name(name: &str) -> Option<&'static str> {
        Self::NAMES
            .into_iter()
            .find(|key| key.eq_ignore_ascii_case(name.trim()))
    }
}

/// Kill counts by method. `regular_kills` is whatever remains of the enemy
/// total once grenade, melee and eagle kills are taken out, and goes
/// negative when those exceed the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStyle {
    #[serde(rename = "Regular Kills")]
    pub regular_kills: i64,
    #[serde(rename = "Grenade Kills")]
    pub grenade_kills: i64,
    #[serde(rename = "Melee Kills")]
    pub melee_kills: i64,
    #[serde(rename = "Eagle Kills")]
    pub eagle_kills: i64,
}

impl CombatStyle {
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, i64); 4] {
        [
            (REGULAR_KILLS, self.regular_kills),
            (GRENADE_KILLS, self.grenade_kills),
            (MELEE_KILLS, self.melee_kills),
            (EAGLE_KILLS, self.eagle_kills),
        ]
    }

    /// Sum of all four buckets; equals the enemy kill total.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.regular_kills
            .saturating_add(self.grenade_kills)
            .saturating_add(self.melee_kills)
            .saturating_add(self.eagle_kills)
    }
}

/// Per-mission stratagem usage by category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StratagemEfficiency {
    #[serde(rename = "Orbital Strikes")]
    pub orbital_strikes: f64,
    #[serde(rename = "Defensive Tools")]
    pub defensive_tools: f64,
    #[serde(rename = "Eagle Support")]
    pub eagle_support: f64,
}

impl StratagemEfficiency {
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 3] {
        [
            (ORBITAL_STRIKES, self.orbital_strikes),
            (DEFENSIVE_TOOLS, self.defensive_tools),
            (EAGLE_SUPPORT, self.eagle_support),
        ]
    }
}

/// Complete derived view of one subject's counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub total_kills: u64,
    pub efficiency: EfficiencyMetrics,
    pub combat_style: CombatStyle,
    pub stratagem_efficiency: StratagemEfficiency,
    /// Percentage of missions won.
    pub mission_success_rate: f64,
    /// Percentage of missions extracted from.
    pub extraction_rate: f64,
    /// Objectives per mission as a plain ratio, not a percentage.
    pub objective_completion_rate: f64,
    pub samples_per_mission: f64,
    pub xp_per_mission: f64,
}

impl DerivedMetrics {
    /// Every derived value under a unique display name, groups first.
    #[must_use]
    pub fn flatten(&self) -> Vec<(&'static str, f64)> {
        let mut values = Vec::with_capacity(20);
        values.push((TOTAL_KILLS, crate::numbers::u64_to_f64(self.total_kills)));
        values.extend(self.efficiency.entries());
        values.extend(
            self.combat_style
                .entries()
                .into_iter()
                .map(|(name, kills)| (name, crate::numbers::i64_to_f64(kills))),
        );
        values.extend(self.stratagem_efficiency.entries());
        values.extend([
            (MISSION_SUCCESS_RATE, self.mission_success_rate),
            (EXTRACTION_RATE, self.extraction_rate),
            (OBJECTIVE_COMPLETION_RATE, self.objective_completion_rate),
            (SAMPLES_COLLECTED_PER_MISSION, self.samples_per_mission),
            (XP_EARNED_PER_MISSION, self.xp_per_mission),
        ]);
        values
    }
}
