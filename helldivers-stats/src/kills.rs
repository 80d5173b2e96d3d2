//! Enemy kill distribution by faction.
use serde::{Deserialize, Serialize};

use crate::counters::RawCounters;
use crate::numbers::per;

pub const TERMINID_KILLS: &str = "Terminid Kills";
pub const AUTOMATON_KILLS: &str = "Automaton Kills";
pub const ILLUMINATE_KILLS: &str = "Illuminate Kills";
pub const FRIENDLY_KILLS: &str = "Friendly Kills";

/// Kill counts per faction, with friendly fire tracked alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyKillBreakdown {
    #[serde(rename = "Terminid Kills")]
    pub terminid: u64,
    #[serde(rename = "Automaton Kills")]
    pub automaton: u64,
    #[serde(rename = "Illuminate Kills")]
    pub illuminate: u64,
    #[serde(rename = "Friendly Kills")]
    pub friendly: u64,
}

impl EnemyKillBreakdown {
    #[must_use]
    pub const fn from_counters(counters: &RawCounters) -> Self {
        Self {
            terminid: counters.terminid_kills,
            automaton: counters.automaton_kills,
            illuminate: counters.illuminate_kills,
            friendly: counters.friendly_kills,
        }
    }

    /// Enemy kills only; friendly kills never count.
    #[must_use]
    pub const fn total_kills(&self) -> u64 {
        self.terminid
            .saturating_add(self.automaton)
            .saturating_add(self.illuminate)
    }

    /// Sum of all four counts, friendly included. Used to decide whether
    /// there is anything to chart.
    #[must_use]
    pub const fn charted_total(&self) -> u64 {
        self.total_kills().saturating_add(self.friendly)
    }

    #[must_use]
    pub const fn entries(&self) -> [(&'static str, u64); 4] {
        [
            (TERMINID_KILLS, self.terminid),
            (AUTOMATON_KILLS, self.automaton),
            (ILLUMINATE_KILLS, self.illuminate),
            (FRIENDLY_KILLS, self.friendly),
        ]
    }

    /// Entries with a positive count, for pie slices.
    #[must_use]
    pub fn nonzero_entries(&self) -> Vec<(&'static str, u64)> {
        self.entries()
            .into_iter()
            .filter(|(_, kills)| *kills > 0)
            .collect()
    }

    /// Each count as a fraction of enemy kills. Zero when there are none;
    /// the friendly share can exceed 1.
    #[must_use]
    pub fn shares(&self) -> [(&'static str, f64); 4] {
        let total = self.total_kills();
        self.entries().map(|(name, kills)| (name, per(kills, total)))
    }
}

impl From<&RawCounters> for EnemyKillBreakdown {
    fn from(counters: &RawCounters) -> Self {
        Self::from_counters(counters)
    }
}
