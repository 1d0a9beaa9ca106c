use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JobConfig {
    pub gmail: Option<GmailConfig>,
    pub sheets: SheetsConfig,
    pub calendar: Option<CalendarConfig>,
    pub google_oauth: GoogleOAuthConfig,
    pub schedule: Option<ScheduleConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GmailConfig {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    pub calendar_id: Option<String>,
    pub timezone: Option<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: Some("primary".to_string()),
            timezone: Some("UTC".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Google account the refresh token in the keychain belongs to.
    pub account: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleConfig {
    pub interval_minutes: Option<u64>,
}

impl JobConfig {
    pub fn gmail_query(&self) -> String {
        self.gmail
            .as_ref()
            .and_then(|g| g.query.clone())
            .unwrap_or_else(|| r#"subject:"Foreclosure Notice""#.to_string())
    }

    pub fn load(override_path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = override_path.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[gmail]
# Search query selecting the notice emails to process
# query = 'subject:"Foreclosure Notice" is:unread'

[sheets]
# ID of the spreadsheet rows are appended to, taken from its URL
# spreadsheet_id = "YOUR_SPREADSHEET_ID"

[calendar]
# "primary" or a secondary calendar's id
calendar_id = "primary"
timezone = "UTC"

[google_oauth]
# OAuth2 client from the Google Cloud Console; the refresh token itself is
# stored in the OS keychain under the account below (--store-refresh-token)
# client_id = "YOUR_CLIENT_ID.apps.googleusercontent.com"
# client_secret = "YOUR_CLIENT_SECRET"
# account = "you@example.com"

[schedule]
interval_minutes = 1440
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: JobConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("forenotice").join("job.toml")
    } else {
        PathBuf::from("job.toml")
    }
}
