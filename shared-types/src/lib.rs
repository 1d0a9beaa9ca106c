pub mod notice;

pub use notice::{format_currency, NoticeRecord, SHEET_HEADER};
