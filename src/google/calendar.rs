//! Google Calendar API v3 event creation.

use serde::{Deserialize, Serialize};

use crate::models::LeaveEvent;
use crate::{AppError, AppResult};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Request body for `events.insert`. Leave spans whole days, so start and
/// end use the date-only field rather than `dateTime`.
#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    pub summary: String,
    pub description: String,
    pub start: EventDate,
    pub end: EventDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDate {
    pub date: String,
}

impl From<&LeaveEvent> for EventBody {
    fn from(event: &LeaveEvent) -> Self {
        EventBody {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: EventDate {
                date: event.start_date.format("%Y-%m-%d").to_string(),
            },
            end: EventDate {
                date: event.end_date.format("%Y-%m-%d").to_string(),
            },
        }
    }
}

/// The provider's representation of the created event. Only the fields the
/// application surfaces are modeled; `htmlLink` is the user-facing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: Option<String>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    pub summary: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CalendarClient {
    http: reqwest::Client,
    api_base: String,
}

impl CalendarClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Points the client at a different API base. Tests aim this at a local
    /// mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Inserts an event into the given calendar.
    ///
    /// The event must have a non-empty summary; start/end ordering is left to
    /// the provider, which accepts either. 401/403 means the credential is
    /// invalid or insufficient; any other rejection carries the provider's
    /// message.
    pub async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventBody,
    ) -> AppResult<CreatedEvent> {
        if event.summary.trim().is_empty() {
            return Err(AppError::Validation("Event summary is required".to_string()));
        }

        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("event creation request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Auth(
                "access token invalid, expired, or lacking calendar scope".to_string(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Provider(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = %status, body, "event creation rejected");
            return Err(AppError::Provider(format!("({}): {}", status, body)));
        }

        let created: CreatedEvent = serde_json::from_str(&body)
            .map_err(|e| AppError::Provider(format!("invalid event response: {}", e)))?;

        tracing::info!(
            event_id = created.id.as_deref().unwrap_or(""),
            link = created.html_link.as_deref().unwrap_or(""),
            "calendar event created"
        );
        Ok(created)
    }
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn leave_event() -> LeaveEvent {
        LeaveEvent {
            summary: "Sick Leave".to_string(),
            description: "Out sick".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        }
    }

    #[test]
    fn test_event_body_uses_date_only_fields() {
        let body = EventBody::from(&leave_event());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["start"]["date"], "2024-01-10");
        assert_eq!(json["end"]["date"], "2024-01-12");
        assert!(json["start"].get("dateTime").is_none());
    }

    #[tokio::test]
    async fn test_insert_event_targets_primary_calendar() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer at-1"))
            .and(body_partial_json(json!({
                "summary": "Sick Leave",
                "start": {"date": "2024-01-10"},
                "end": {"date": "2024-01-12"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "status": "confirmed",
                "htmlLink": "https://calendar.google.com/event?eid=evt-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CalendarClient::new().with_api_base(server.uri());
        let created = client
            .insert_event("at-1", "primary", &EventBody::from(&leave_event()))
            .await
            .unwrap();

        assert_eq!(
            created.html_link.as_deref(),
            Some("https://calendar.google.com/event?eid=evt-1")
        );
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = CalendarClient::new().with_api_base(server.uri());
        let result = client
            .insert_event("expired", "primary", &EventBody::from(&leave_event()))
            .await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rejection_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "Bad Request"}})),
            )
            .mount(&server)
            .await;

        let client = CalendarClient::new().with_api_base(server.uri());
        let result = client
            .insert_event("at-1", "primary", &EventBody::from(&leave_event()))
            .await;

        match result {
            Err(AppError::Provider(msg)) => assert!(msg.contains("Bad Request")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_summary_short_circuits() {
        let mut event = leave_event();
        event.summary = "  ".to_string();

        // No server: the call must fail before any request is attempted.
        let client = CalendarClient::new().with_api_base("http://127.0.0.1:1/never");
        let result = client
            .insert_event("at-1", "primary", &EventBody::from(&event))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
