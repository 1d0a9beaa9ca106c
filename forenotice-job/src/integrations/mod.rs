pub mod calendar_client;
pub mod gmail_client;
pub mod sheets_client;
