//! Fixed month-name table.
//!
//! Only the twelve canonical, capitalised English names are accepted. Unlike
//! `chrono::Month`'s `FromStr`, abbreviations and other casings are rejected.

use chrono::Month;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Look up a full month name.
pub fn parse_month(name: &str) -> Option<Month> {
    MONTHS.iter().copied().find(|m| m.name() == name)
}

/// Calendar number (1..=12) of a full month name.
pub fn month_number(name: &str) -> Option<u32> {
    parse_month(name).map(|m| m.number_from_month())
}
