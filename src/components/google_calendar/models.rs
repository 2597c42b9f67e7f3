use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::booking::BookingRequest;

/// Event boundaries are naive timestamps; the zone travels alongside
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Minutes before the start when the popup reminder fires
pub const REMINDER_MINUTES: u32 = 60;

/// Event payload for the events.insert endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: EventReminders,
}

/// One event boundary with its timezone spelled out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Reminder block replacing the calendar defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

impl CalendarEvent {
    /// Build the calendar mirror of a booked meeting.
    ///
    /// Pure construction: the same booking and join URL always produce
    /// the same payload. The end boundary is start plus duration, and
    /// the join URL lands in the description so the entry is clickable.
    /// Expects a request that passed validation, which keeps the end
    /// boundary inside the calendar range.
    pub fn from_booking(request: &BookingRequest, join_url: &str, timezone: Tz) -> Self {
        let start = request.start_time;
        let end = start + Duration::minutes(i64::from(request.duration_min));
        let time_zone = timezone.name().to_string();

        Self {
            summary: format!("{}({})", request.title, request.host),
            location: String::new(),
            description: join_url.to_string(),
            start: EventDateTime {
                date_time: start.format(EVENT_TIME_FORMAT).to_string(),
                time_zone: time_zone.clone(),
            },
            end: EventDateTime {
                date_time: end.format(EVENT_TIME_FORMAT).to_string(),
                time_zone,
            },
            reminders: EventReminders {
                use_default: false,
                overrides: vec![ReminderOverride {
                    method: "popup".to_string(),
                    minutes: REMINDER_MINUTES,
                }],
            },
        }
    }
}

/// Created event as returned by the API; feeds the success log line
#[derive(Debug, Clone, Deserialize)]
pub struct InsertedEvent {
    pub id: String,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    pub status: Option<String>,
}
