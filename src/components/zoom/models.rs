use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::booking::BookingRequest;

/// Shared meeting password, kept stable so regulars can always get in
pub const MEETING_PASSWORD: &str = "nantsuku";

/// Zoom takes naive timestamps; the zone travels in its own field
pub const ZOOM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Type code for a scheduled (non-recurring) meeting
const MEETING_TYPE_SCHEDULED: u8 = 2;

/// Payload for the create-meeting endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ZoomMeetingRequest {
    pub topic: String,
    #[serde(rename = "type")]
    pub meeting_type: u8,
    pub start_time: String,
    pub duration: u32,
    pub timezone: String,
    pub password: String,
    pub agenda: String,
    pub settings: ZoomMeetingSettings,
}

impl ZoomMeetingRequest {
    /// Build the meeting payload for a booking request
    pub fn from_booking(request: &BookingRequest, timezone: Tz) -> Self {
        Self {
            topic: request.title.clone(),
            meeting_type: MEETING_TYPE_SCHEDULED,
            start_time: request.start_time.format(ZOOM_TIME_FORMAT).to_string(),
            duration: request.duration_min,
            timezone: timezone.name().to_string(),
            password: MEETING_PASSWORD.to_string(),
            agenda: format!("Host is {}", request.host),
            settings: ZoomMeetingSettings::default(),
        }
    }
}

/// Settings block sent with every meeting; values are fixed
#[derive(Debug, Clone, Serialize)]
pub struct ZoomMeetingSettings {
    pub host_video: bool,
    pub participant_video: bool,
    pub cn_meeting: bool,
    pub in_meeting: bool,
    pub join_before_host: bool,
    pub mute_upon_entry: bool,
    pub waiting_room: bool,
    pub watermark: bool,
    pub use_pmi: bool,
    pub approval_type: u8,
    pub registration_type: u8,
    pub registrants_confirmation_email: bool,
    pub registrants_email_notification: bool,
    pub audio: String,
    pub auto_recording: String,
    pub meeting_authentication: bool,
}

impl Default for ZoomMeetingSettings {
    fn default() -> Self {
        Self {
            host_video: true,
            participant_video: true,
            cn_meeting: false,
            in_meeting: false,
            join_before_host: true,
            mute_upon_entry: false,
            waiting_room: false,
            watermark: true,
            use_pmi: false,
            approval_type: 2,
            registration_type: 3,
            registrants_confirmation_email: false,
            registrants_email_notification: false,
            audio: "both".to_string(),
            auto_recording: "none".to_string(),
            meeting_authentication: false,
        }
    }
}

/// Token-endpoint response; only the token itself is read
#[derive(Debug, Deserialize)]
pub struct ZoomTokenResponse {
    pub access_token: String,
}

/// Create-meeting response; only the fields the pipeline needs
#[derive(Debug, Deserialize)]
pub struct ZoomMeetingResponse {
    pub id: Option<i64>,
    pub join_url: String,
}
