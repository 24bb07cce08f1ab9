//! Time zone used to place close timestamps on the calendar.

use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarZone {
    /// The zone of the machine running the report.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl FromStr for CalendarZone {
    type Err = String;

    /// Accepts `local`, `utc` or an offset such as `+10:00` / `-0530`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_lowercase().as_str() {
            "local" => return Ok(CalendarZone::Local),
            "utc" | "z" => return Ok(CalendarZone::Utc),
            _ => {}
        }

        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(format!("expected local, utc or +HH:MM, got '{value}'")),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid offset '{value}', expected +HH:MM"));
        }

        let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid hours in '{value}'"))?;
        let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid minutes in '{value}'"))?;
        if minutes >= 60 {
            return Err(format!("invalid minutes in '{value}'"));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(CalendarZone::Fixed)
            .ok_or_else(|| format!("offset out of range: '{value}'"))
    }
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarZone::Local => write!(f, "local"),
            CalendarZone::Utc => write!(f, "utc"),
            CalendarZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
