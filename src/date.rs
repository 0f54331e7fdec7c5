//! Gig date parsing and formatting
//!
//! A gig date is given on the command line as one of:
//! - `2024-11-20` (ISO)
//! - `11/20/2024` (US)
//! - `today`
//! - `Saturday` (next Saturday, or today if today is Saturday)
//! - `Saturday+2` (the Saturday two weeks after the next one)

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use crate::error::{Error, Result};

/// A parsed, not yet resolved, gig date expression
#[derive(Debug, Clone, PartialEq)]
pub enum DateExpression {
    /// Use today's date
    Today,
    /// Use an explicit date
    Explicit(NaiveDate),
    /// Next occurrence of a weekday, pushed back by `offset` weeks
    DayOfWeek { day: Weekday, offset: u32 },
}

/// Parse a gig date expression
pub fn parse_date_expression(expr: &str) -> Result<DateExpression> {
    let expr = expr.trim();

    if expr.is_empty() {
        return Err(Error::InvalidDateExpression("gig date is required".to_string()));
    }

    if expr.eq_ignore_ascii_case("today") {
        return Ok(DateExpression::Today);
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(expr, format) {
            return Ok(DateExpression::Explicit(date));
        }
    }

    let (day_str, offset) = match expr.split_once('+') {
        Some((day_str, offset_str)) => {
            let offset = offset_str.trim().parse().map_err(|_| {
                Error::InvalidDateExpression(format!("Invalid week offset: {}", offset_str.trim()))
            })?;
            (day_str, offset)
        }
        None => (expr, 0),
    };

    let day = parse_weekday(day_str)?;
    Ok(DateExpression::DayOfWeek { day, offset })
}

/// Parse a weekday name (case-insensitive, full or three-letter)
fn parse_weekday(s: &str) -> Result<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        other => Err(Error::InvalidDateExpression(format!(
            "Unable to parse date expression: {}",
            other
        ))),
    }
}

impl DateExpression {
    /// Resolve against the local calendar date
    pub fn resolve(&self) -> Result<NaiveDate> {
        self.resolve_from(Local::now().date_naive())
    }

    /// Resolve against an explicit "today"
    ///
    /// Fails when a week offset pushes the date past the calendar's range.
    pub fn resolve_from(&self, today: NaiveDate) -> Result<NaiveDate> {
        match self {
            DateExpression::Today => Ok(today),
            DateExpression::Explicit(date) => Ok(*date),
            DateExpression::DayOfWeek { day, offset } => {
                let today_num = today.weekday().num_days_from_monday();
                let target_num = day.num_days_from_monday();
                let days_until = (target_num + 7 - today_num) % 7;
                u64::from(*offset)
                    .checked_mul(7)
                    .and_then(|days| days.checked_add(u64::from(days_until)))
                    .and_then(|days| today.checked_add_days(Days::new(days)))
                    .ok_or_else(|| {
                        Error::InvalidDateExpression(format!("Week offset too large: {}", offset))
                    })
            }
        }
    }
}

/// Parse and resolve a gig date in one step
pub fn parse_gig_date(expr: &str) -> Result<NaiveDate> {
    parse_date_expression(expr)?.resolve()
}

/// Title-page form: full month name, two-digit day, year ("March 07, 2026")
pub fn format_long(date: &NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Filename form: `YYYY-MM-DD`
pub fn format_sortable(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
