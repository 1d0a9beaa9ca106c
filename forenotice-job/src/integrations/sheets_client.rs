use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use shared_types::{NoticeRecord, SHEET_HEADER};

use crate::helpers::google_oauth::GoogleAuthenticator;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    http: reqwest::Client,
    auth: Arc<GoogleAuthenticator>,
    spreadsheet_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetsClient {
    pub fn new(auth: Arc<GoogleAuthenticator>, spreadsheet_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            spreadsheet_id,
        }
    }

    /// Writes the fixed header row if the sheet does not already carry it.
    pub async fn ensure_header(&self) -> Result<()> {
        let existing = self.get_values("A1:I1").await?;

        let header_matches = existing
            .values
            .first()
            .map(|row| {
                row.len() == SHEET_HEADER.len()
                    && row
                        .iter()
                        .zip(SHEET_HEADER)
                        .all(|(cell, expected)| cell.as_str() == Some(expected))
            })
            .unwrap_or(false);

        if header_matches {
            return Ok(());
        }

        tracing::info!("header missing or incorrect, writing header row");

        let token = self.auth.access_token().await?;
        let url = format!(
            "{}/{}/values/A1",
            SHEETS_API_BASE, self.spreadsheet_id
        );

        self.http
            .put(&url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [SHEET_HEADER] }))
            .send()
            .await
            .context("Failed to write sheet header")?
            .error_for_status()
            .context("Sheet header update rejected")?;

        Ok(())
    }

    /// Reads every stored case number (column D, below the header).
    pub async fn get_existing_case_numbers(&self) -> Result<Vec<String>> {
        let range = self.get_values("D2:D").await?;

        Ok(range
            .values
            .into_iter()
            .filter_map(|row| {
                row.into_iter()
                    .next()
                    .and_then(|cell| cell.as_str().map(|s| s.to_string()))
            })
            .collect())
    }

    /// Appends one row per record below the existing data.
    pub async fn append_records(&self, records: &[NoticeRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let values: Vec<Vec<serde_json::Value>> =
            records.iter().map(|r| r.to_sheet_row()).collect();

        let token = self.auth.access_token().await?;
        let url = format!(
            "{}/{}/values/A1:append",
            SHEETS_API_BASE, self.spreadsheet_id
        );

        self.http
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": values }))
            .send()
            .await
            .context("Failed to append records to sheet")?
            .error_for_status()
            .context("Sheet append rejected")?;

        tracing::info!("appended {} new records to the sheet", records.len());

        Ok(())
    }

    async fn get_values(&self, range: &str) -> Result<ValueRange> {
        let token = self.auth.access_token().await?;
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE, self.spreadsheet_id, range
        );

        self.http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to read sheet range {}", range))?
            .error_for_status()
            .with_context(|| format!("Sheet read rejected for range {}", range))?
            .json()
            .await
            .with_context(|| format!("Failed to decode sheet range {}", range))
    }
}
