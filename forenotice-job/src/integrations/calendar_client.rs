use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use serde_json::json;
use shared_types::{format_currency, NoticeRecord};

use crate::helpers::google_oauth::GoogleAuthenticator;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub struct CalendarClient {
    http: reqwest::Client,
    auth: Arc<GoogleAuthenticator>,
    calendar_id: String,
    timezone: String,
}

impl CalendarClient {
    pub fn new(auth: Arc<GoogleAuthenticator>, calendar_id: String, timezone: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            calendar_id,
            timezone,
        }
    }

    /// Creates a one-hour auction reminder for the record.
    ///
    /// Returns `false` without calling the API when the record carries no
    /// auction timestamp.
    pub async fn create_event_for_notice(&self, record: &NoticeRecord) -> Result<bool> {
        let Some(start) = record.auction_datetime else {
            tracing::warn!(
                "cannot create event for case {}: missing auction date/time",
                record.case_number
            );
            return Ok(false);
        };

        let end = start + Duration::hours(1);
        let event = build_event_body(record, start, &self.timezone);

        let token = self.auth.access_token().await?;
        let url = format!("{}/calendars/{}/events", CALENDAR_API_BASE, self.calendar_id);

        self.http
            .post(&url)
            .bearer_auth(token)
            .json(&event)
            .send()
            .await
            .with_context(|| format!("Failed to create event for case {}", record.case_number))?
            .error_for_status()
            .with_context(|| format!("Event insert rejected for case {}", record.case_number))?;

        tracing::info!(
            "event created for case {} ({} - {})",
            record.case_number,
            start.format("%Y-%m-%d %H:%M"),
            end.format("%H:%M")
        );

        Ok(true)
    }
}

fn build_event_body(
    record: &NoticeRecord,
    start: chrono::NaiveDateTime,
    timezone: &str,
) -> serde_json::Value {
    let end = start + Duration::hours(1);

    let address = record
        .property_address
        .as_deref()
        .unwrap_or("address unknown");

    let description = format!(
        "Case Number: {}\nAttorney: {} ({})\nOriginal Loan: {}\nAssessed Value: {}",
        record.case_number,
        record.attorney_name.as_deref().unwrap_or("unknown"),
        record.attorney_phone.as_deref().unwrap_or("unknown"),
        record
            .original_loan_amount
            .map(format_currency)
            .unwrap_or_else(|| "unknown".to_string()),
        record
            .assessed_value
            .map(format_currency)
            .unwrap_or_else(|| "unknown".to_string()),
    );

    json!({
        "summary": format!("Foreclosure Auction: {}", address),
        "location": address,
        "description": description,
        "start": {
            "dateTime": start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "timeZone": timezone,
        },
        "end": {
            "dateTime": end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "timeZone": timezone,
        },
        "reminders": {
            "useDefault": false,
            "overrides": [
                { "method": "email", "minutes": 24 * 60 },
                { "method": "popup", "minutes": 60 },
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn record_with_auction() -> NoticeRecord {
        NoticeRecord {
            property_address: Some("10 Elm St".to_string()),
            auction_datetime: Some(NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            )),
            case_number: "2025-00012".to_string(),
            attorney_name: Some("Smith & Jones".to_string()),
            attorney_phone: Some("(123) 456-7890".to_string()),
            original_loan_amount: Some(250000.0),
            assessed_value: None,
            date_added: "2025-03-01 09:00:00".to_string(),
        }
    }

    #[test]
    fn test_event_body() {
        let record = record_with_auction();
        let event = build_event_body(&record, record.auction_datetime.unwrap(), "UTC");

        assert_eq!(
            event["summary"],
            serde_json::json!("Foreclosure Auction: 10 Elm St")
        );
        assert_eq!(event["start"]["dateTime"], serde_json::json!("2025-03-03T14:30:00"));
        assert_eq!(event["end"]["dateTime"], serde_json::json!("2025-03-03T15:30:00"));
        assert_eq!(event["start"]["timeZone"], serde_json::json!("UTC"));

        let description = event["description"].as_str().unwrap();
        assert!(description.contains("Case Number: 2025-00012"));
        assert!(description.contains("Smith & Jones ((123) 456-7890)"));
        assert!(description.contains("Original Loan: $250,000.00"));
        assert!(description.contains("Assessed Value: unknown"));
    }

    #[test]
    fn test_event_reminder_overrides() {
        let record = record_with_auction();
        let event = build_event_body(&record, record.auction_datetime.unwrap(), "UTC");
        let overrides = event["reminders"]["overrides"].as_array().unwrap();

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0]["minutes"], serde_json::json!(1440));
        assert_eq!(overrides[1]["minutes"], serde_json::json!(60));
    }
}
