use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt::Display;

/// Day of the week, indexed 0 = Monday .. 6 = Sunday everywhere in the
/// core. External calendar representations that count from Sunday must go
/// through [`Weekday::from_sunday_indexed`] / [`Weekday::to_sunday_indexed`]
/// at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn index(self) -> u8 {
        match self {
            Weekday::Mon => 0,
            Weekday::Tue => 1,
            Weekday::Wed => 2,
            Weekday::Thu => 3,
            Weekday::Fri => 4,
            Weekday::Sat => 5,
            Weekday::Sun => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Weekday::Mon),
            1 => Some(Weekday::Tue),
            2 => Some(Weekday::Wed),
            3 => Some(Weekday::Thu),
            4 => Some(Weekday::Fri),
            5 => Some(Weekday::Sat),
            6 => Some(Weekday::Sun),
            _ => None,
        }
    }

    /// Translates from a 0 = Sunday calendar representation.
    pub fn from_sunday_indexed(index: u8) -> Option<Self> {
        match index {
            0 => Some(Weekday::Sun),
            1..=6 => Self::from_index(index - 1),
            _ => None,
        }
    }

    /// Translates into a 0 = Sunday calendar representation.
    pub fn to_sunday_indexed(self) -> u8 {
        (self.index() + 1) % 7
    }

    /// Recognizes a day-name token like "MONDAY", "Tue" or "friday".
    pub fn from_day_name(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        let day = match token.as_str() {
            "mon" | "monday" => Weekday::Mon,
            "tue" | "tues" | "tuesday" => Weekday::Tue,
            "wed" | "wednesday" => Weekday::Wed,
            "thu" | "thurs" | "thursday" => Weekday::Thu,
            "fri" | "friday" => Weekday::Fri,
            "sat" | "saturday" => Weekday::Sat,
            "sun" | "sunday" => Weekday::Sun,
            _ => return None,
        };
        Some(day)
    }

    /// Default weekday selection for reminders without an explicit day
    /// header: Monday through Friday, never all seven days.
    pub fn work_week() -> BTreeSet<Weekday> {
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .collect()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        // chrono's num_days_from_monday already counts 0 = Monday
        Self::from_index(day.num_days_from_monday() as u8).unwrap_or(Weekday::Mon)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = anyhow::Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index)
            .ok_or_else(|| anyhow::Error::msg(format!("Invalid weekday index: {}", index)))
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        };
        write!(f, "{}", name)
    }
}
