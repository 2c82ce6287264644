use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// A wall-clock time in the canonical zone, 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidTimeOfDayError {
    #[error("Time of day: {0} is malformed, expected HH:MM in 24 hour form")]
    Malformed(String),
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidTimeOfDayError::Malformed(s.to_string());
        let parts = s.trim().split(':').collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(malformed());
        }
        let hour = parts[0].parse::<u8>().map_err(|_| malformed())?;
        let minute = parts[1].parse::<u8>().map_err(|_| malformed())?;
        TimeOfDay::new(hour, minute).ok_or_else(malformed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_valid_times() {
        for (h, m) in &[(0, 0), (6, 30), (16, 30), (23, 59)] {
            assert!(TimeOfDay::new(*h, *m).is_some());
        }
    }

    #[test]
    fn rejects_out_of_range_times() {
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(8, 60).is_none());
    }

    #[test]
    fn formats_as_zero_padded_24h() {
        let t = TimeOfDay::new(8, 5).unwrap();
        assert_eq!(t.to_string(), "08:05");
        let t = TimeOfDay::new(20, 0).unwrap();
        assert_eq!(t.to_string(), "20:00");
    }

    #[test]
    fn parses_its_own_string_representation() {
        for s in &["00:00", "06:30", "16:30", "23:59"] {
            let t = s.parse::<TimeOfDay>().expect("Valid time of day");
            assert_eq!(&t.to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        for s in &["24:00", "8", "8:5:0", "eight", "08:60"] {
            assert!(s.parse::<TimeOfDay>().is_err());
        }
    }
}
