use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::error::BookError;

// ISO-8601 in UTC with millisecond precision, e.g. `2021-03-04T05:06:07.089Z`.
time::serde::format_description!(
    iso_millis,
    OffsetDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// A book on the shelf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned at creation and never reused
    pub id: String,
    pub name: String,
    pub year: i64,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    /// Always `read_page == page_count`
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "iso_millis")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "iso_millis")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub(crate) fn new(id: String, payload: BookPayload, now: OffsetDateTime) -> Self {
        let mut book = Self {
            id,
            name: String::new(),
            year: 0,
            author: String::new(),
            summary: String::new(),
            publisher: String::new(),
            page_count: 0,
            read_page: 0,
            finished: false,
            reading: false,
            inserted_at: now,
            updated_at: now,
        };
        book.apply(payload, now);
        book
    }

    /// Overwrite every mutable field; `id` and `inserted_at` stay put.
    pub(crate) fn apply(&mut self, payload: BookPayload, now: OffsetDateTime) {
        self.finished = payload.read_page == payload.page_count;
        self.name = payload.name;
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.updated_at = now;
    }

    pub fn projection(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request body for creating or replacing a book. Absent or `null` fields take their zero value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub read_page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub reading: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BookPayload {
    /// Name is checked before the page range.
    pub fn validate(&self) -> Result<(), BookError> {
        if self.name.is_empty() {
            return Err(BookError::MissingName);
        }
        if self.read_page > self.page_count {
            return Err(BookError::InvalidPageRange);
        }
        Ok(())
    }
}

/// The `{id, name, publisher}` projection returned by listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Raw query string of `GET /books`.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// The single filter a listing ends up applying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    /// Lowercased needle for a case-insensitive substring match
    Name(String),
    /// `None` when the flag is not 0/1, which matches nothing
    Reading(Option<bool>),
    Finished(Option<bool>),
}

impl ListFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            ListFilter::Name(needle) => book.name.to_lowercase().contains(needle.as_str()),
            ListFilter::Reading(flag) => *flag == Some(book.reading),
            ListFilter::Finished(flag) => *flag == Some(book.finished),
        }
    }
}

impl BookQuery {
    /// Collect the known keys from decoded query pairs; a repeated key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "reading" => query.reading = Some(value),
                "finished" => query.finished = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Filters are not chained: each one would narrow the whole shelf, so the last
    /// supplied of name, reading, finished is the only one that counts.
    pub fn active_filter(&self) -> Option<ListFilter> {
        if let Some(raw) = supplied(&self.finished) {
            return Some(ListFilter::Finished(parse_flag(raw)));
        }
        if let Some(raw) = supplied(&self.reading) {
            return Some(ListFilter::Reading(parse_flag(raw)));
        }
        supplied(&self.name).map(|raw| ListFilter::Name(raw.to_lowercase()))
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.is_empty())
}

/// Numeric reading of a 0/1 flag. Blank means 0; `0x`, `0o` and `0b` literals are
/// accepted; anything other than 0 or 1 is `None`.
fn parse_flag(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(false);
    }
    match parse_number(trimmed) {
        Some(n) if n == 1.0 => Some(true),
        Some(n) if n == 0.0 => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let radix = match raw.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return raw.parse::<f64>().ok(),
    };
    let digits = &raw[2..];
    // Prefixed literals carry no sign of their own.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}
