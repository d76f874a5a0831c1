use chrono::{DateTime, Datelike, TimeZone};

pub const SITE_NAME: &str = "Ginja Tech AI News Website";

/// `Monday, October 19, 2026`
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %d, %Y").to_string()
}

pub fn copyright_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("© {} {}", now.year(), SITE_NAME)
}

/// The header date line, refreshed on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    display: String,
}

impl Clock {
    pub fn new<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            display: format_date(now),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Returns true when the shown date changed.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        let display = format_date(now);
        if display == self.display {
            return false;
        }
        self.display = display;
        true
    }
}
