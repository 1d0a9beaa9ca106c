mod datetime;
mod parser;

pub use datetime::combine_date_time;
pub use parser::NoticeParser;

use regex::Regex;

/// Names a field of a foreclosure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeField {
    PropertyAddress,
    AuctionDate,
    AuctionTime,
    CaseNumber,
    AttorneyName,
    AttorneyPhone,
    OriginalLoanAmount,
    AssessedValue,
}

/// One field's ordered search rules. The first pattern whose captured group
/// survives trimming wins; later patterns are label variants seen in the wild.
pub struct FieldRule {
    pub field: NoticeField,
    pub patterns: Vec<Regex>,
}

/// Builds the immutable rule catalog. Constructed once per `NoticeParser`;
/// there is no shared registry to mutate at runtime.
///
/// Labels match case-insensitively. The address value may start on the line
/// after its label, which is why those patterns run in dot-matches-newline
/// mode; the capture itself still stops at the first line break. Short fields
/// (case number, phone) capture a single token or an exact phone shape.
pub fn create_field_rules() -> Vec<FieldRule> {
    vec![
        FieldRule {
            field: NoticeField::PropertyAddress,
            patterns: vec![
                Regex::new(r"(?is)property\s+address\s*:\s*(.+?)(?:\n|$)").unwrap(),
                Regex::new(r"(?is)property\s*:\s*(.+?)(?:\n|$)").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::AuctionDate,
            patterns: vec![
                Regex::new(r"(?i)auction\s+date\s*:\s*(.+?)(?:\n|$)").unwrap(),
                Regex::new(r"(?i)sale\s+date\s*:\s*(.+?)(?:\n|$)").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::AuctionTime,
            patterns: vec![
                Regex::new(r"(?i)auction\s+time\s*:\s*(.+?)(?:\n|$)").unwrap(),
                Regex::new(r"(?i)sale\s+time\s*:\s*(.+?)(?:\n|$)").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::CaseNumber,
            patterns: vec![
                Regex::new(r"(?i)case\s+no\.?\s*:\s*(\S+)").unwrap(),
                Regex::new(r"(?i)case\s+number\s*:\s*(\S+)").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::AttorneyName,
            patterns: vec![
                Regex::new(r"(?i)attorney\s+for\s+plaintiff\s*:\s*(.+?)(?:\n|$)").unwrap(),
                Regex::new(r"(?i)attorney\s+name\s*:\s*(.+?)(?:\n|$)").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::AttorneyPhone,
            patterns: vec![Regex::new(
                r"(?i)attorney\s+phone\s*:\s*(\(\d{3}\)\s*\d{3}-\d{4}|\d{3}-\d{3}-\d{4}|\d{3}\.\d{3}\.\d{4})",
            )
            .unwrap()],
        },
        FieldRule {
            field: NoticeField::OriginalLoanAmount,
            patterns: vec![
                Regex::new(r"(?i)original\s+loan\s+amount\s*:\s*\$?([\d,]+\.?\d{0,2})").unwrap(),
            ],
        },
        FieldRule {
            field: NoticeField::AssessedValue,
            patterns: vec![
                Regex::new(r"(?i)assessed\s+value\s*:\s*\$?([\d,]+\.?\d{0,2})").unwrap(),
            ],
        },
    ]
}
