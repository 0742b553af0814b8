//! Configuration for the lead intake service.
//!
//! Every setting comes from the environment and can be overridden with a
//! command line flag of the same name.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::error::Error;
use crate::lead::IdStrategy;

pub type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_CRM_API_URL: &str =
    "https://newtonerp.in/NewtonApps/NewtonCrmAI/EnquiryDetails/AddLead";
pub const DEFAULT_CRM_UPDATE_API_URL: &str =
    "https://newtonerp.in/NewtonApps/NewtonCrmAI/EnquiryDetails/UpdateLead";

/// Which completion backend answers `/chat`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatProviderKind {
    Openai,
    Ollama,
}

/// How leads without an `Enq_Id` get one.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeadIdKind {
    Fixed,
    Generated,
}

/// Service settings.
#[derive(Args, Clone, Debug)]
pub struct Settings {
    /// CRM endpoint that creates leads
    #[arg(long, global = true, env = "CRM_API_URL", default_value = DEFAULT_CRM_API_URL)]
    pub crm_api_url: String,

    /// CRM endpoint that updates leads; the Enq_Id is appended as a path segment
    #[arg(long, global = true, env = "CRM_UPDATE_API_URL", default_value = DEFAULT_CRM_UPDATE_API_URL)]
    pub crm_update_api_url: String,

    /// Timeout for CRM requests, in seconds
    #[arg(long, global = true, env = "CRM_TIMEOUT_SECS", default_value_t = 10)]
    pub crm_timeout_secs: u64,

    /// Allowed cross-origin hosts, comma separated; `*` allows any origin
    #[arg(
        long,
        global = true,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://192.168.1.13:3000"
    )]
    pub cors_origins: Vec<String>,

    /// Completion backend for /chat
    #[arg(long, global = true, env = "CHAT_PROVIDER", value_enum, default_value_t = ChatProviderKind::Openai)]
    pub chat_provider: ChatProviderKind,

    /// API key for the completion service
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the completion service (provider default if unset)
    #[arg(long, global = true, env = "CHAT_API_URL")]
    pub chat_api_url: Option<String>,

    /// Model used for chat replies (provider default if unset)
    #[arg(long, global = true, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Address to bind
    #[arg(long, global = true, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, global = true, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Verbose logging
    #[arg(long, global = true, env = "DEBUG", value_parser = clap::builder::BoolishValueParser::new())]
    pub debug: bool,

    /// Directory for the rotating log file
    #[arg(long, global = true, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Identifier assignment for leads without an Enq_Id
    #[arg(long, global = true, env = "LEAD_ID_STRATEGY", value_enum, default_value_t = LeadIdKind::Fixed)]
    pub lead_id_strategy: LeadIdKind,

    /// Placeholder Enq_Id used by the fixed strategy
    #[arg(long, global = true, env = "DEFAULT_ENQ_ID", default_value = "12345")]
    pub default_enq_id: String,

    /// SQLite file journaling forwarded leads; journaling is off when unset
    #[arg(long, global = true, env = "LEADS_DB_PATH")]
    pub leads_db_path: Option<PathBuf>,

    /// Idle lifetime of conversation sessions, in seconds
    #[arg(long, global = true, env = "SESSION_IDLE_SECS", default_value_t = 1800)]
    pub session_idle_secs: u64,
}

impl Settings {
    pub fn id_strategy(&self) -> IdStrategy {
        match self.lead_id_strategy {
            LeadIdKind::Fixed => IdStrategy::Fixed(self.default_enq_id.clone()),
            LeadIdKind::Generated => IdStrategy::Generated,
        }
    }

    /// Allowed origins with blanks removed. Empty means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.iter().any(|o| o == "*") {
            return Vec::new();
        }
        origins
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("CRM_API_URL", Some(&self.crm_api_url)),
            ("CRM_UPDATE_API_URL", Some(&self.crm_update_api_url)),
            ("CHAT_API_URL", self.chat_api_url.as_ref()),
        ] {
            if let Some(url) = url {
                reqwest::Url::parse(url)
                    .map_err(|e| Error::Config(format!("{} '{}' is not a valid URL: {}", name, url, e)))?;
            }
        }

        if self.port == 0 {
            return Err(Error::Config("PORT must be non-zero".to_string()));
        }
        if self.crm_timeout_secs == 0 {
            return Err(Error::Config("CRM_TIMEOUT_SECS must be non-zero".to_string()));
        }
        if self.lead_id_strategy == LeadIdKind::Fixed && self.default_enq_id.trim().is_empty() {
            return Err(Error::Config(
                "DEFAULT_ENQ_ID must be set when LEAD_ID_STRATEGY is fixed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crm_api_url: DEFAULT_CRM_API_URL.to_string(),
            crm_update_api_url: DEFAULT_CRM_UPDATE_API_URL.to_string(),
            crm_timeout_secs: 10,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://192.168.1.13:3000".to_string(),
            ],
            chat_provider: ChatProviderKind::Openai,
            openai_api_key: None,
            chat_api_url: None,
            chat_model: None,
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            log_dir: PathBuf::from("logs"),
            lead_id_strategy: LeadIdKind::Fixed,
            default_enq_id: "12345".to_string(),
            leads_db_path: None,
            session_idle_secs: 1800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--crm-api-url",
            "http://crm.local/add",
            "--cors-origins",
            "http://a.test, http://b.test/",
            "--lead-id-strategy",
            "generated",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ]);
        let settings = cli.settings;

        assert_eq!(settings.crm_api_url, "http://crm.local/add");
        assert_eq!(
            settings.allowed_origins(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(settings.id_strategy(), IdStrategy::Generated);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_wildcard_origin_allows_any() {
        let mut settings = Settings::default();
        settings.cors_origins = vec!["http://a.test".to_string(), "*".to_string()];
        assert!(settings.allowed_origins().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.crm_update_api_url = "nope".to_string();
        assert!(matches!(settings.validate(), Err(Error::Config(_))));

        let mut settings = Settings::default();
        settings.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.default_enq_id = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fixed_id_strategy_uses_placeholder() {
        let mut settings = Settings::default();
        settings.default_enq_id = "LEAD-1".to_string();
        assert_eq!(settings.id_strategy().next_id(), "LEAD-1");
    }
}
