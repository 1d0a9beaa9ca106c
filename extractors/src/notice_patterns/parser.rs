use chrono::Local;
use shared_types::NoticeRecord;

use crate::notice_patterns::{combine_date_time, create_field_rules, FieldRule, NoticeField};

/// Turns one plain-text email body into a `NoticeRecord`.
///
/// Every field is searched independently; a miss on one field never stops the
/// others. The only hard requirement is the case number: without it `parse`
/// returns `None` and the email is dropped from the batch.
pub struct NoticeParser {
    rules: Vec<FieldRule>,
}

impl NoticeParser {
    pub fn new() -> Self {
        Self {
            rules: create_field_rules(),
        }
    }

    pub fn parse(&self, text: &str) -> Option<NoticeRecord> {
        let property_address = self.extract(NoticeField::PropertyAddress, text);
        let case_number = self.extract(NoticeField::CaseNumber, text);
        let attorney_name = self.extract(NoticeField::AttorneyName, text);
        let attorney_phone = self.extract(NoticeField::AttorneyPhone, text);

        let original_loan_amount = self
            .extract(NoticeField::OriginalLoanAmount, text)
            .and_then(|raw| parse_currency("original loan amount", &raw));
        let assessed_value = self
            .extract(NoticeField::AssessedValue, text)
            .and_then(|raw| parse_currency("assessed value", &raw));

        let date_str = self.extract(NoticeField::AuctionDate, text);
        let time_str = self.extract(NoticeField::AuctionTime, text);
        let auction_datetime = match (date_str.as_deref(), time_str.as_deref()) {
            (Some(date), Some(time)) => combine_date_time(date, time),
            _ => None,
        };

        let date_added = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let case_number = match case_number {
            Some(case_number) => case_number,
            None => {
                tracing::warn!("parsing failed: no case number found in email content");
                return None;
            }
        };

        tracing::debug!("parsed notice for case number: {}", case_number);

        Some(NoticeRecord {
            property_address,
            auction_datetime,
            case_number,
            attorney_name,
            attorney_phone,
            original_loan_amount,
            assessed_value,
            date_added,
        })
    }

    /// Runs one field's rules in order and returns the first capture that
    /// survives trimming. A rule whose capture trims to nothing falls through
    /// to the next rule.
    fn extract(&self, field: NoticeField, text: &str) -> Option<String> {
        let rule = self.rules.iter().find(|rule| rule.field == field)?;

        for pattern in &rule.patterns {
            if let Some(value) = pattern
                .captures(text)
                .and_then(|captures| captures.get(1))
                .and_then(|capture| tidy(capture.as_str()))
            {
                return Some(value);
            }
        }

        None
    }
}

impl Default for NoticeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips surrounding whitespace plus trailing commas and periods.
fn tidy(raw: &str) -> Option<String> {
    let value = raw
        .trim()
        .trim_end_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_currency(field: &str, raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "").replace('$', "");

    match cleaned.trim().parse::<f64>() {
        Ok(amount) if amount >= 0.0 => Some(amount),
        Ok(amount) => {
            tracing::warn!("discarding negative {} '{}': {}", field, raw, amount);
            None
        }
        Err(e) => {
            tracing::warn!("could not parse {} '{}': {}", field, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE_EMAIL_BODY: &str = "Hello,

This is a notice of a new foreclosure auction.

Property Address: 123 Main St, Anytown, USA 12345
Auction Date: October 26, 2023
Auction Time: 10:00 AM
Case No.: 2023-123456

Attorney for Plaintiff: Smith & Jones Law Firm
Attorney Phone: (123) 456-7890

Financial Details:
Original Loan Amount: $350,000.00
Assessed Value: $410,000.00

Please review the attached documents.
";

    #[test]
    fn test_full_parse() {
        let parser = NoticeParser::new();
        let record = parser.parse(SAMPLE_EMAIL_BODY).unwrap();

        assert_eq!(
            record.property_address.as_deref(),
            Some("123 Main St, Anytown, USA 12345")
        );
        assert_eq!(record.case_number, "2023-123456");
        assert_eq!(record.attorney_name.as_deref(), Some("Smith & Jones Law Firm"));
        assert_eq!(record.attorney_phone.as_deref(), Some("(123) 456-7890"));
        assert_eq!(record.original_loan_amount, Some(350000.0));
        assert_eq!(record.assessed_value, Some(410000.0));

        let auction = record.auction_datetime.unwrap();
        assert_eq!(
            (auction.year(), auction.month(), auction.day()),
            (2023, 10, 26)
        );
        assert_eq!((auction.hour(), auction.minute()), (10, 0));
    }

    #[test]
    fn test_missing_case_number_rejects_record() {
        let parser = NoticeParser::new();
        let body = SAMPLE_EMAIL_BODY.replace("Case No.: 2023-123456", "");
        assert!(parser.parse(&body).is_none());
    }

    #[test]
    fn test_no_labeled_fields_at_all() {
        let parser = NoticeParser::new();
        assert!(parser.parse("nothing to see here").is_none());
    }

    #[test]
    fn test_case_number_only() {
        let parser = NoticeParser::new();
        let record = parser.parse("Case No.: 2023-654321").unwrap();

        assert_eq!(record.case_number, "2023-654321");
        assert!(record.property_address.is_none());
        assert!(record.auction_datetime.is_none());
        assert!(record.attorney_name.is_none());
        assert!(record.attorney_phone.is_none());
        assert!(record.original_loan_amount.is_none());
        assert!(record.assessed_value.is_none());
        assert!(!record.date_added.is_empty());
    }

    #[test]
    fn test_label_fallback_variants() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Property: 456 Oak Ave\nCase Number: 2024-00007\nAttorney Name: Jane Roe")
            .unwrap();

        assert_eq!(record.property_address.as_deref(), Some("456 Oak Ave"));
        assert_eq!(record.case_number, "2024-00007");
        assert_eq!(record.attorney_name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("PROPERTY ADDRESS: 10 Elm St\ncase no.: 2025-00012")
            .unwrap();

        assert_eq!(record.property_address.as_deref(), Some("10 Elm St"));
        assert_eq!(record.case_number, "2025-00012");
    }

    #[test]
    fn test_trailing_punctuation_is_trimmed() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Property Address: 10 Elm St.,  \nCase No.: 2025-00012")
            .unwrap();

        assert_eq!(record.property_address.as_deref(), Some("10 Elm St"));
    }

    #[test]
    fn test_date_without_time_leaves_datetime_absent() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Case No.: 2025-1\nAuction Date: March 3, 2025")
            .unwrap();
        assert!(record.auction_datetime.is_none());
    }

    #[test]
    fn test_time_without_date_leaves_datetime_absent() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Case No.: 2025-1\nAuction Time: 2:30 PM")
            .unwrap();
        assert!(record.auction_datetime.is_none());
    }

    #[test]
    fn test_unparsable_date_leaves_datetime_absent() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Case No.: 2025-1\nAuction Date: soonish\nAuction Time: 2:30 PM")
            .unwrap();
        assert!(record.auction_datetime.is_none());
    }

    #[test]
    fn test_malformed_currency_degrades_to_absent() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Case No.: 2025-2\nOriginal Loan Amount: $,\nAssessed Value: $410,000.00")
            .unwrap();

        assert!(record.original_loan_amount.is_none());
        assert_eq!(record.assessed_value, Some(410000.0));
    }

    #[test]
    fn test_parse_is_idempotent_apart_from_date_added() {
        let parser = NoticeParser::new();
        let first = parser.parse(SAMPLE_EMAIL_BODY).unwrap();
        let second = parser.parse(SAMPLE_EMAIL_BODY).unwrap();

        assert_eq!(first.property_address, second.property_address);
        assert_eq!(first.auction_datetime, second.auction_datetime);
        assert_eq!(first.case_number, second.case_number);
        assert_eq!(first.attorney_name, second.attorney_name);
        assert_eq!(first.attorney_phone, second.attorney_phone);
        assert_eq!(first.original_loan_amount, second.original_loan_amount);
        assert_eq!(first.assessed_value, second.assessed_value);
    }

    #[test]
    fn test_full_notice_row_projection() {
        let parser = NoticeParser::new();
        let record = parser
            .parse(
                "Property Address: 10 Elm St\nCase No.: 2025-00012\nAuction Date: March 3, 2025\nAuction Time: 2:30 PM\nOriginal Loan Amount: $250,000.00",
            )
            .unwrap();

        let row = record.to_sheet_row();
        assert_eq!(row[0], serde_json::json!("10 Elm St"));
        assert_eq!(row[1], serde_json::json!("2025-03-03"));
        assert_eq!(row[2], serde_json::json!("02:30 PM"));
        assert_eq!(row[3], serde_json::json!("2025-00012"));
        assert_eq!(row[4], serde_json::Value::Null);
        assert_eq!(row[5], serde_json::Value::Null);
        assert_eq!(row[6], serde_json::json!(250000.0));
        assert_eq!(row[7], serde_json::Value::Null);
        assert_eq!(row[8], serde_json::json!(record.date_added));
    }

    #[test]
    fn test_address_on_line_after_label() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Property Address:\n  99 Pine Rd, Sometown\nCase No.: 2025-3")
            .unwrap();

        assert_eq!(
            record.property_address.as_deref(),
            Some("99 Pine Rd, Sometown")
        );
    }

    #[test]
    fn test_phone_shape_is_validated() {
        let parser = NoticeParser::new();
        let record = parser
            .parse("Case No.: 2025-4\nAttorney Phone: call the office")
            .unwrap();
        assert!(record.attorney_phone.is_none());

        let record = parser
            .parse("Case No.: 2025-4\nAttorney Phone: 555-123-4567")
            .unwrap();
        assert_eq!(record.attorney_phone.as_deref(), Some("555-123-4567"));
    }

    #[test]
    fn test_parse_currency_accepts_grouped_amounts() {
        assert_eq!(parse_currency("loan", "250,000.00"), Some(250000.0));
        assert_eq!(parse_currency("loan", "$1,000"), Some(1000.0));
        assert_eq!(parse_currency("loan", ","), None);
    }
}
