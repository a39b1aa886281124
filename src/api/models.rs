use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::api::ApiError;

pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored booking. Missing or oddly typed fields decode to empty text so
/// one bad record cannot hide the rest of a listing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Booking {
    /// Server-assigned. The public listing leaves it out.
    #[serde(
        rename = "_id",
        alias = "id",
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub service: String,
    pub date: BookingDate,
    #[serde(deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
}

impl Booking {
    /// Converts a listing element by element. Elements that are not objects
    /// are dropped with a warning, records with an unreadable date are kept.
    pub fn from_rows(rows: Vec<Value>) -> Vec<Booking> {
        rows.into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<Booking>(row) {
                Ok(booking) => {
                    if let BookingDate::Unparsed(raw) = &booking.date {
                        log::warn!("booking {:?} has an unreadable date {:?}", booking.id, raw);
                    }
                    Some(booking)
                }
                Err(e) => {
                    log::warn!("skipping booking #{}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}

/// A booking date as the server sent it. Text the parser does not recognise
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingDate {
    Day(NaiveDate),
    Unparsed(String),
}

impl BookingDate {
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            BookingDate::Day(date) => Some(*date),
            BookingDate::Unparsed(_) => None,
        }
    }

    /// Formats a parsed date, or returns the raw text unchanged.
    pub fn display(&self, format: &str) -> String {
        match self {
            BookingDate::Day(date) => date.format(format).to_string(),
            BookingDate::Unparsed(raw) => raw.clone(),
        }
    }
}

impl Default for BookingDate {
    fn default() -> Self {
        BookingDate::Unparsed(String::new())
    }
}

impl From<NaiveDate> for BookingDate {
    fn from(date: NaiveDate) -> Self {
        BookingDate::Day(date)
    }
}

impl Serialize for BookingDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BookingDate::Day(date) => serializer.collect_str(&date.format(FORM_DATE_FORMAT)),
            BookingDate::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for BookingDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(match calendar_date::parse(&raw) {
            Some(date) => BookingDate::Day(date),
            None => BookingDate::Unparsed(raw),
        })
    }
}

/// The five user-editable fields, as typed into a form and sent as a JSON body.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub service: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
}

impl BookingDraft {
    pub fn is_complete(&self) -> bool {
        [&self.service, &self.date, &self.time, &self.name, &self.email]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ApiError::Validation("Please fill in all fields.".into()))
        }
    }
}

impl From<&Booking> for BookingDraft {
    fn from(booking: &Booking) -> Self {
        Self {
            service: booking.service.clone(),
            date: booking.date.display(FORM_DATE_FORMAT),
            time: booking.time.clone(),
            name: booking.name.clone(),
            email: booking.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Dates travel either as `2024-05-01` or as a full ISO-8601 timestamp.
/// Timestamps are reduced to their UTC calendar date.
mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    use super::FORM_DATE_FORMAT;

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT) {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.with_timezone(&Utc).date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|stamp| stamp.date())
    }
}

/// Field decoders that accept any JSON value.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let id = text(deserializer)?;
        Ok(Some(id).filter(|id| !id.is_empty()))
    }
}
