//! Extractors Crate
//!
//! Turns free-form foreclosure-notice email text into structured
//! `NoticeRecord`s. The engine is pure: no I/O, no shared mutable state, one
//! fresh record per email.
//!
//! # Architecture
//!
//! - **Types**: the record and its sheet projection live in the
//!   `shared-types` crate
//! - **Rules**: each field carries an ordered list of compiled patterns;
//!   the first match wins and fields never depend on each other
//! - **Assembly**: `NoticeParser` coerces currency and date/time substrings
//!   and enforces the case-number requirement
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::NoticeParser;
//!
//! let parser = NoticeParser::new();
//! if let Some(record) = parser.parse(&email_body) {
//!     println!("case {}", record.case_number);
//! }
//! ```

pub mod notice_patterns;

// Re-export commonly used types
pub use notice_patterns::{combine_date_time, NoticeParser};
