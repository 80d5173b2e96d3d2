//! Raw mission counters and the catalogue of counter fields.
use serde::{Deserialize, Serialize};

/// Cumulative counters for one subject (a player or a spreadsheet row).
///
/// Serialized with the web form keys, so `total_stratagems_used` appears as
/// `total_stratagems` and `defensive_stratagems_used` as `defensive_stratagems`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCounters {
    pub missions_played: u64,
    pub missions_won: u64,
    pub successful_extractions: u64,
    pub objectives_completed: u64,
    pub terminid_kills: u64,
    pub automaton_kills: u64,
    pub illuminate_kills: u64,
    pub friendly_kills: u64,
    pub grenade_kills: u64,
    pub melee_kills: u64,
    pub eagle_kills: u64,
    pub shots_fired: u64,
    pub shots_hit: u64,
    pub deaths: u64,
    pub samples_collected: u64,
    pub total_xp: u64,
    #[serde(rename = "total_stratagems", alias = "total_stratagems_used")]
    pub total_stratagems_used: u64,
    pub orbitals_used: u64,
    #[serde(rename = "defensive_stratagems", alias = "defensive_stratagems_used")]
    pub defensive_stratagems_used: u64,
    pub eagles_used: u64,
}

/// One named counter in [`RawCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    MissionsPlayed,
    MissionsWon,
    SuccessfulExtractions,
    ObjectivesCompleted,
    TerminidKills,
    AutomatonKills,
    IlluminateKills,
    FriendlyKills,
    GrenadeKills,
    MeleeKills,
    EagleKills,
    ShotsFired,
    ShotsHit,
    Deaths,
    SamplesCollected,
    TotalXp,
    TotalStratagemsUsed,
    OrbitalsUsed,
    DefensiveStratagemsUsed,
    EaglesUsed,
}

impl CounterField {
    /// Every field in form order.
    pub const ALL: [Self; 20] = [
        Self::MissionsPlayed,
        Self::MissionsWon,
        Self::SuccessfulExtractions,
        Self::ObjectivesCompleted,
        Self::TerminidKills,
        Self::AutomatonKills,
        Self::IlluminateKills,
        Self::FriendlyKills,
        Self::GrenadeKills,
        Self::MeleeKills,
        Self::EagleKills,
        Self::ShotsFired,
        Self::ShotsHit,
        Self::Deaths,
        Self::SamplesCollected,
        Self::TotalXp,
        Self::TotalStratagemsUsed,
        Self::OrbitalsUsed,
        Self::DefensiveStratagemsUsed,
        Self::EaglesUsed,
    ];

    /// Form key as submitted by the stats form.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MissionsPlayed => "missions_played",
            Self::MissionsWon => "missions_won",
            Self::SuccessfulExtractions => "successful_extractions",
            Self::ObjectivesCompleted => "objectives_completed",
            Self::TerminidKills => "terminid_kills",
            Self::AutomatonKills => "automaton_kills",
            Self::IlluminateKills => "illuminate_kills",
            Self::FriendlyKills => "friendly_kills",
            Self::GrenadeKills => "grenade_kills",
            Self::MeleeKills => "melee_kills",
            Self::EagleKills => "eagle_kills",
            Self::ShotsFired => "shots_fired",
            Self::ShotsHit => "shots_hit",
            Self::Deaths => "deaths",
            Self::SamplesCollected => "samples_collected",
            Self::TotalXp => "total_xp",
            Self::TotalStratagemsUsed => "total_stratagems",
            Self::OrbitalsUsed => "orbitals_used",
            Self::DefensiveStratagemsUsed => "defensive_stratagems",
            Self::EaglesUsed => "eagles_used",
        }
    }

    /// Column header used by the stats spreadsheet.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::MissionsPlayed => "Missions Played",
            Self::MissionsWon => "Mission Won",
            Self::SuccessfulExtractions => "Successful Extractions",
            Self::ObjectivesCompleted => "Obj Completed",
            Self::TerminidKills => "Terminid Kills",
            Self::AutomatonKills => "Automaton Kills",
            Self::IlluminateKills => "Illuminate Kills",
            Self::FriendlyKills => "Friendly Kills",
            Self::GrenadeKills => "Grenade Kills",
            Self::MeleeKills => "Melee Kills",
            Self::EagleKills => "Eagle Kills",
            Self::ShotsFired => "Shots Fired",
            Self::ShotsHit => "Shots Hit",
            Self::Deaths => "Deaths",
            Self::SamplesCollected => "Samples Collected",
            Self::TotalXp => "Total XP Earned",
            Self::TotalStratagemsUsed => "Total Strats Used",
            Self::OrbitalsUsed => "Orbitals Used",
            Self::DefensiveStratagemsUsed => "Defensive Stratagems Used",
            Self::EaglesUsed => "Eagles Used",
        }
    }

    /// Resolve a form key, spreadsheet column or struct field name.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|field| {
            field.key().eq_ignore_ascii_case(name)
                || field.column().eq_ignore_ascii_case(name)
                || field.struct_name().eq_ignore_ascii_case(name)
        })
    }

    const fn struct_name(self) -> &'static str {
        match self {
            Self::TotalStratagemsUsed => "total_stratagems_used",
            Self::DefensiveStratagemsUsed => "defensive_stratagems_used",
            other => other.key(),
        }
    }
}

impl std::fmt::Display for CounterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl RawCounters {
    /// Read one counter by field.
    #[must_use]
    pub const fn get(&self, field: CounterField) -> u64 {
        match field {
            CounterField::MissionsPlayed => self.missions_played,
            CounterField::MissionsWon => self.missions_won,
            CounterField::SuccessfulExtractions => self.successful_extractions,
            CounterField::ObjectivesCompleted => self.objectives_completed,
            CounterField::TerminidKills => self.terminid_kills,
            CounterField::AutomatonKills => self.automaton_kills,
            CounterField::IlluminateKills => self.illuminate_kills,
            CounterField::FriendlyKills => self.friendly_kills,
            CounterField::GrenadeKills => self.grenade_kills,
            CounterField::MeleeKills => self.melee_kills,
            CounterField::EagleKills => self.eagle_kills,
            CounterField::ShotsFired => self.shots_fired,
            CounterField::ShotsHit => self.shots_hit,
            CounterField::Deaths => self.deaths,
            CounterField::SamplesCollected => self.samples_collected,
            CounterField::TotalXp => self.total_xp,
            CounterField::TotalStratagemsUsed => self.total_stratagems_used,
            CounterField::OrbitalsUsed => self.orbitals_used,
            CounterField::DefensiveStratagemsUsed => self.defensive_stratagems_used,
            CounterField::EaglesUsed => self.eagles_used,
        }
    }

    /// Overwrite one counter by field.
    pub const fn set(&mut self, field: CounterField, value: u64) {
        let slot = match field {
            CounterField::MissionsPlayed => &mut self.missions_played,
            CounterField::MissionsWon => &mut self.missions_won,
            CounterField::SuccessfulExtractions => &mut self.successful_extractions,
            CounterField::ObjectivesCompleted => &mut self.objectives_completed,
            CounterField::TerminidKills => &mut self.terminid_kills,
            CounterField::AutomatonKills => &mut self.automaton_kills,
            CounterField::IlluminateKills => &mut self.illuminate_kills,
            CounterField::FriendlyKills => &mut self.friendly_kills,
            CounterField::GrenadeKills => &mut self.grenade_kills,
            CounterField::MeleeKills => &mut self.melee_kills,
            CounterField::EagleKills => &mut self.eagle_kills,
            CounterField::ShotsFired => &mut self.shots_fired,
            CounterField::ShotsHit => &mut self.shots_hit,
            CounterField::Deaths => &mut self.deaths,
            CounterField::SamplesCollected => &mut self.samples_collected,
            CounterField::TotalXp => &mut self.total_xp,
            CounterField::TotalStratagemsUsed => &mut self.total_stratagems_used,
            CounterField::OrbitalsUsed => &mut self.orbitals_used,
            CounterField::DefensiveStratagemsUsed => &mut self.defensive_stratagems_used,
            CounterField::EaglesUsed => &mut self.eagles_used,
        };
        *slot = value;
    }

    /// Builder-style [`RawCounters::set`].
    #[must_use]
    pub const fn with(mut self, field: CounterField, value: u64) -> Self {
        self.set(field, value);
        self
    }

    /// Enemy kills across the three factions. Friendly kills are not enemies.
    #[must_use]
    pub const fn total_kills(&self) -> u64 {
        self.terminid_kills
            .saturating_add(self.automaton_kills)
            .saturating_add(self.illuminate_kills)
    }

    /// Missions not won, saturating at zero.
    #[must_use]
    pub const fn missions_failed(&self) -> u64 {
        self.missions_played.saturating_sub(self.missions_won)
    }
}
