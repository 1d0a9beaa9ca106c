use std::collections::HashSet;

use anyhow::Result;
use extractors::NoticeParser;
use shared_types::NoticeRecord;

use crate::integrations::calendar_client::CalendarClient;
use crate::integrations::gmail_client::GmailClient;
use crate::integrations::sheets_client::SheetsClient;

/// Counts reported at the end of each batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub added: usize,
    pub events_created: usize,
}

pub struct NoticeJob {
    query: String,
    parser: NoticeParser,
    gmail: GmailClient,
    sheets: SheetsClient,
    calendar: CalendarClient,
}

impl NoticeJob {
    pub fn new(
        query: String,
        gmail: GmailClient,
        sheets: SheetsClient,
        calendar: CalendarClient,
    ) -> Self {
        Self {
            query,
            parser: NoticeParser::new(),
            gmail,
            sheets,
            calendar,
        }
    }

    /// Runs one batch to completion: fetch, parse, dedup, append, remind.
    ///
    /// A failure on one message or one record is logged and the rest of the
    /// batch keeps going; only sink-wide conditions surface as errors.
    pub async fn run(&self) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        self.sheets.ensure_header().await?;

        tracing::info!("fetching emails with query: '{}'", self.query);
        let message_ids = self.gmail.list_message_ids(&self.query).await?;

        if message_ids.is_empty() {
            tracing::info!("no messages found matching the query");
            return Ok(summary);
        }

        let mut parsed = Vec::new();
        for message_id in &message_ids {
            summary.processed += 1;

            let text = match self.gmail.get_message_text(message_id).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("skipping message {}: {:#}", message_id, e);
                    summary.rejected += 1;
                    continue;
                }
            };

            match self.parser.parse(&text) {
                Some(record) => parsed.push(record),
                None => {
                    tracing::warn!("no usable notice data in message {}", message_id);
                    summary.rejected += 1;
                }
            }
        }

        if parsed.is_empty() {
            tracing::info!("no new foreclosure notices found");
            return Ok(summary);
        }

        let known: HashSet<String> = self
            .sheets
            .get_existing_case_numbers()
            .await?
            .into_iter()
            .collect();
        tracing::info!("found {} existing case numbers in the sheet", known.len());

        let total_parsed = parsed.len();
        let new_records = filter_new_records(parsed, &known);
        summary.duplicates = total_parsed - new_records.len();

        if new_records.is_empty() {
            tracing::info!("all parsed notices have already been processed");
            return Ok(summary);
        }

        match self.sheets.append_records(&new_records).await {
            Ok(()) => summary.added = new_records.len(),
            Err(e) => tracing::error!("failed to append records to sheet: {:#}", e),
        }

        for record in &new_records {
            match self.calendar.create_event_for_notice(record).await {
                Ok(true) => summary.events_created += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        "failed to create calendar event for case {}: {:#}",
                        record.case_number,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "batch finished: {} processed, {} added, {} duplicates, {} rejected, {} events",
            summary.processed,
            summary.added,
            summary.duplicates,
            summary.rejected,
            summary.events_created
        );

        Ok(summary)
    }
}

/// Drops records whose case number the sink already knows.
///
/// Exact string equality, input order preserved, no side effects.
pub fn filter_new_records(
    records: Vec<NoticeRecord>,
    known_case_numbers: &HashSet<String>,
) -> Vec<NoticeRecord> {
    records
        .into_iter()
        .filter(|record| !known_case_numbers.contains(&record.case_number))
        .collect()
}
