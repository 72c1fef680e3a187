//! Ordering and filtering of departures for display.

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone};

use crate::domain::Departure;

use super::label::{DepartureLabel, label};

/// A departure ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow<'a> {
    pub departure: &'a Departure,
    pub label: DepartureLabel,
}

/// Departures matching `route_filter`, soonest first.
///
/// Departures are ordered by absolute departure time (realtime estimate when
/// tracked). Equal times are ordered by route number; routes without a
/// leading number (`"M1"`, `"N"`) come after all numbered routes, and any
/// remaining ties keep the order they were received in.
///
/// The filter is a case-insensitive substring match on the route name; an
/// empty filter keeps everything. The input is left untouched.
pub fn view<'a>(departures: &'a [Departure], route_filter: &str) -> Vec<&'a Departure> {
    let needle = route_filter.to_lowercase();
    let mut rows: Vec<&Departure> = departures
        .iter()
        .filter(|d| needle.is_empty() || d.route().to_lowercase().contains(&needle))
        .collect();
    rows.sort_by(|a, b| compare_departures(a, b));
    rows
}

/// [`view`] with each departure labelled relative to `now`.
pub fn rows<'a, Tz: TimeZone>(
    departures: &'a [Departure],
    route_filter: &str,
    now: &DateTime<Tz>,
) -> Vec<BoardRow<'a>> {
    view(departures, route_filter)
        .into_iter()
        .map(|departure| BoardRow {
            departure,
            label: label(departure, now),
        })
        .collect()
}

/// Message shown when [`rows`] comes back empty.
pub fn empty_message(route_filter: &str) -> String {
    if route_filter.is_empty() {
        "No upcoming departures found.".to_string()
    } else {
        format!("No upcoming departures found for route \"{route_filter}\".")
    }
}

fn compare_departures(a: &Departure, b: &Departure) -> Ordering {
    a.departure_epoch()
        .cmp(&b.departure_epoch())
        .then_with(|| compare_route_numbers(route_number(a.route()), route_number(b.route())))
}

fn compare_route_numbers(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Leading integer of a route name: `"550B"` is 550, `" 7"` is 7, `"M1"` has
/// none. Numbers too large for `i64` saturate.
fn route_number(route: &str) -> Option<i64> {
    let s = route.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
