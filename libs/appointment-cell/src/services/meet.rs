// libs/appointment-cell/src/services/meet.rs
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use schedule_cell::models::TimeSlot;

/// Creates video-call links for booked appointments by inserting a
/// conference-enabled event into the clinic calendar. Link creation is
/// best-effort: an unconfigured or failing calendar never blocks a booking.
pub struct MeetLinkService {
    client: Client,
    base_url: String,
    api_token: String,
    configured: bool,
}

impl MeetLinkService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.google_calendar_base_url.clone(),
            api_token: config.google_calendar_token.clone(),
            configured: config.is_meet_link_configured(),
        }
    }

    pub async fn create_meet_link(&self, slot: &TimeSlot) -> Option<String> {
        if !self.configured {
            warn!("Meet link generation disabled - calendar not configured");
            return None;
        }

        let start = slot.date.and_time(slot.start_time).and_utc();
        let end = slot.date.and_time(slot.end_time).and_utc();

        let event = json!({
            "summary": "CardioCare consultation",
            "start": { "dateTime": start.to_rfc3339() },
            "end": { "dateTime": end.to_rfc3339() },
            "conferenceData": {
                "createRequest": {
                    "requestId": Uuid::new_v4().to_string(),
                    "conferenceSolutionKey": { "type": "hangoutsMeet" }
                }
            }
        });

        let url = format!(
            "{}/calendars/primary/events?conferenceDataVersion=1",
            self.base_url
        );

        let response = match self.client.post(&url)
            .bearer_auth(&self.api_token)
            .json(&event)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Meet link request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Meet link request rejected with status {}", response.status());
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse calendar event response: {}", e);
                return None;
            }
        };

        let link = body["hangoutLink"].as_str().map(str::to_string);
        match &link {
            Some(link) => debug!("Created meet link {}", link),
            None => warn!("Calendar event created without a meet link"),
        }
        link
    }
}
