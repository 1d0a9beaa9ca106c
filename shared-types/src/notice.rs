use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header row the spreadsheet must carry, in append order.
///
/// `get_existing_case_numbers` reads column D, so `Case Number` must stay the
/// fourth column.
pub const SHEET_HEADER: [&str; 9] = [
    "Property Address",
    "Auction Date",
    "Auction Time",
    "Case Number",
    "Attorney Name",
    "Attorney Phone",
    "Original Loan Amount",
    "Assessed Value",
    "Date Added",
];

/// One parsed foreclosure notice.
///
/// A record only exists once a case number has been found; every other field
/// is best-effort and stays `None` when the source email does not carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub property_address: Option<String>,
    pub auction_datetime: Option<NaiveDateTime>,
    pub case_number: String,
    pub attorney_name: Option<String>,
    pub attorney_phone: Option<String>,
    pub original_loan_amount: Option<f64>,
    pub assessed_value: Option<f64>,
    /// Wall-clock time of parsing, `%Y-%m-%d %H:%M:%S`. Not taken from the email.
    pub date_added: String,
}

impl NoticeRecord {
    /// Projects the record into the fixed 9-column sheet row.
    ///
    /// Absent optional fields become `Value::Null` so the sink can tell
    /// "field not found" apart from a found-but-blank cell.
    pub fn to_sheet_row(&self) -> Vec<Value> {
        vec![
            opt_string(&self.property_address),
            self.auction_datetime
                .map(|dt| Value::String(dt.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),
            self.auction_datetime
                .map(|dt| Value::String(dt.format("%I:%M %p").to_string()))
                .unwrap_or(Value::Null),
            Value::String(self.case_number.clone()),
            opt_string(&self.attorney_name),
            opt_string(&self.attorney_phone),
            opt_number(self.original_loan_amount),
            opt_number(self.assessed_value),
            Value::String(self.date_added.clone()),
        ]
    }
}

fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

fn opt_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Formats an amount as `$1,234,567.89` for calendar event descriptions.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("${}.{}", grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_record() -> NoticeRecord {
        NoticeRecord {
            property_address: Some("10 Elm St".to_string()),
            auction_datetime: Some(NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            )),
            case_number: "2025-00012".to_string(),
            attorney_name: None,
            attorney_phone: None,
            original_loan_amount: Some(250000.0),
            assessed_value: None,
            date_added: "2025-03-01 09:00:00".to_string(),
        }
    }

    #[test]
    fn test_sheet_row_order_and_formats() {
        let row = sample_record().to_sheet_row();

        assert_eq!(row.len(), SHEET_HEADER.len());
        assert_eq!(row[0], Value::String("10 Elm St".to_string()));
        assert_eq!(row[1], Value::String("2025-03-03".to_string()));
        assert_eq!(row[2], Value::String("02:30 PM".to_string()));
        assert_eq!(row[3], Value::String("2025-00012".to_string()));
        assert_eq!(row[4], Value::Null);
        assert_eq!(row[5], Value::Null);
        assert_eq!(row[6], serde_json::json!(250000.0));
        assert_eq!(row[7], Value::Null);
        assert_eq!(row[8], Value::String("2025-03-01 09:00:00".to_string()));
    }

    #[test]
    fn test_sheet_row_absent_datetime() {
        let mut record = sample_record();
        record.auction_datetime = None;
        let row = record.to_sheet_row();

        assert_eq!(row[1], Value::Null);
        assert_eq!(row[2], Value::Null);
    }

    #[test]
    fn test_header_columns() {
        assert_eq!(SHEET_HEADER[3], "Case Number");
        assert_eq!(SHEET_HEADER[8], "Date Added");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(250000.0), "$250,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(0.0), "$0.00");
    }
}
