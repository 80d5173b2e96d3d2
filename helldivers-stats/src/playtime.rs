//! Play time as shown in the career screen (`4d 19h 54m 42s`), converted to
//! an `HH:MM:SS` clock where whole days fold into the hours.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl PlayTime {
    #[must_use]
    pub const fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Hours including folded-in days.
    #[must_use]
    pub const fn total_hours(&self) -> u64 {
        self.days.saturating_mul(24).saturating_add(self.hours)
    }

    /// `HH:MM:SS`, each part zero-padded to two digits. Minutes and seconds
    /// are printed as given, without carrying into the next unit.
    #[must_use]
    pub fn to_clock(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.total_hours(),
            self.minutes,
            self.seconds
        )
    }
}

impl std::fmt::Display for PlayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_clock())
    }
}

fn play_time_error(input: &str, reason: &'static str) -> InvalidInput {
    InvalidInput::PlayTime {
        input: input.to_string(),
        reason,
    }
}

impl FromStr for PlayTime {
    type Err = InvalidInput;

    /// Parse `4d 19h 54m 42s`. Units may appear in any order, at most once
    /// each, with or without spaces between them.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parsed = Self::default();
        let mut seen = [false; 4];
        let mut digits = String::new();

        for ch in input.trim().chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            if ch.is_whitespace() {
                if digits.is_empty() {
                    continue;
                }
                return Err(play_time_error(input, "number without a unit"));
            }
            let (slot, target) = match ch.to_ascii_lowercase() {
                'd' => (0, &mut parsed.days),
                'h' => (1, &mut parsed.hours),
                'm' => (2, &mut parsed.minutes),
                's' => (3, &mut parsed.seconds),
                _ => return Err(play_time_error(input, "unknown unit")),
            };
            if digits.is_empty() {
                return Err(play_time_error(input, "unit without a number"));
            }
            if seen[slot] {
                return Err(play_time_error(input, "repeated unit"));
            }
            seen[slot] = true;
            *target = digits
                .parse()
                .map_err(|_| play_time_error(input, "number out of range"))?;
            digits.clear();
        }

        if !digits.is_empty() {
            return Err(play_time_error(input, "number without a unit"));
        }
        if !seen.contains(&true) {
            return Err(play_time_error(input, "empty play time"));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_days_into_hours() {
        assert_eq!(PlayTime::new(4, 19, 54, 42).to_clock(), "115:54:42");
        assert_eq!(PlayTime::new(0, 1, 2, 3).to_string(), "01:02:03");
    }

    #[test]
    fn parses_career_screen_format() {
        let parsed: PlayTime = "4d 19h 54m 42s".parse().unwrap();
        assert_eq!(parsed, PlayTime::new(4, 19, 54, 42));

        let compact: PlayTime = "42S3H".parse().unwrap();
        assert_eq!(compact, PlayTime::new(0, 3, 0, 42));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "12", "4d 19", "d", "4x", "1h 2h", "4 d"] {
            assert!(bad.parse::<PlayTime>().is_err(), "{bad:?} should fail");
        }
    }
}
