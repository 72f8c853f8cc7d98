use std::fmt;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotError {
    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),
    #[error("slot end {end} must be after slot start {start}")]
    EmptyWindow { start: String, end: String },
}

const TIME_FORMAT: &str = "%H:%M";

fn parse_time(value: &str) -> Result<NaiveTime, TimeSlotError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| TimeSlotError::InvalidTime(value.to_string()))
}

fn to_minutes(time: NaiveTime) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

/// Converts zero-padded `HH:MM` into minutes since midnight.
///
/// Slot times are stored and ordered as text, so `9:00` is rejected in favour
/// of `09:00`.
pub fn parse_minutes(value: &str) -> Result<u16, TimeSlotError> {
    let time = parse_time(value)?;
    if time.format(TIME_FORMAT).to_string() != value.trim() {
        return Err(TimeSlotError::InvalidTime(value.to_string()));
    }
    Ok(to_minutes(time))
}

/// Half-open window `[start, end)` in minutes since midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    start: u16,
    end: u16,
}

impl TimeSlot {
    pub fn new(start: u16, end: u16) -> Result<Self, TimeSlotError> {
        if end <= start {
            return Err(TimeSlotError::EmptyWindow {
                start: format_minutes(start),
                end: format_minutes(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a candidate window. Zero-length and inverted windows are rejected.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeSlotError> {
        Self::new(parse_minutes(start)?, parse_minutes(end)?)
    }

    /// Parses a window that is already persisted. Neither padding nor ordering
    /// is checked so that legacy rows still take part in conflict detection.
    pub(crate) fn parse_stored(start: &str, end: &str) -> Result<Self, TimeSlotError> {
        Ok(Self {
            start: to_minutes(parse_time(start)?),
            end: to_minutes(parse_time(end)?),
        })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Two half-open windows conflict iff each one starts before the other ends.
    /// Back-to-back windows share no instant and do not conflict.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
