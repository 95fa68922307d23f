//! Human-readable labels for days and bucket ranges

use algae_forecast_shared::Locale;
use chrono::{Datelike, NaiveDate};

const ES_MX_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const EN_US_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renders day and range labels in a fixed locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelFormatter {
    locale: Locale,
}

impl LabelFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn month_abbrev(&self, date: NaiveDate) -> &'static str {
        let months = match self.locale {
            Locale::EsMx => &ES_MX_MONTHS,
            Locale::EnUs => &EN_US_MONTHS,
        };
        months[date.month0() as usize]
    }

    /// Label for a closed range.
    ///
    /// Only the end carries month and year: `"1-7 ene 25"`, or
    /// `"28-3 mar 25"` when the range crosses a month boundary.
    pub fn format_range(&self, start: NaiveDate, end: NaiveDate) -> String {
        debug_assert!(start <= end, "range starts after it ends");

        let short_year = end.year().rem_euclid(100);
        match self.locale {
            Locale::EsMx => format!(
                "{}-{} {} {:02}",
                start.day(),
                end.day(),
                self.month_abbrev(end),
                short_year
            ),
            Locale::EnUs => format!(
                "{}-{} {}, {:02}",
                start.day(),
                self.month_abbrev(end),
                end.day(),
                short_year
            ),
        }
    }

    /// Label for a single day in the daily view: `"01 ene 2025"`
    pub fn format_day(&self, date: NaiveDate) -> String {
        match self.locale {
            Locale::EsMx => format!(
                "{:02} {} {}",
                date.day(),
                self.month_abbrev(date),
                date.year()
            ),
            Locale::EnUs => format!(
                "{} {:02}, {}",
                self.month_abbrev(date),
                date.day(),
                date.year()
            ),
        }
    }
}
