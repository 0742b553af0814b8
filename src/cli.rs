//! CLI commands using clap.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::process::ExitCode;

use crate::config::Settings;
use crate::journal::LeadJournal;
use crate::lead::{extract, validate_email, validate_phone};
use crate::logging;
use crate::web::{run_server, AppState};

/// Lead intake service: extracts, validates and forwards leads to a CRM.
#[derive(Parser)]
#[command(name = "leadintake")]
#[command(version)]
#[command(about = "Lead intake API", long_about = None)]
pub struct Commands {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,

    /// Extract a lead from free text and print it as JSON
    Extract {
        /// Text to extract from
        text: String,
    },

    /// Check an email address and/or phone number
    Validate {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Show recently journaled leads
    Journal {
        /// Number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

impl Commands {
    pub async fn run(self) -> Result<ExitCode> {
        let settings = self.settings;
        settings.validate()?;

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let _guard = logging::init(&settings.log_dir, settings.debug)?;
                let state = AppState::new(settings)?;
                run_server(state).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Extract { text } => {
                logging::init_console(settings.debug);
                let lead = extract(&text, &settings.id_strategy());
                println!("{}", serde_json::to_string_pretty(&lead)?);
                Ok(ExitCode::SUCCESS)
            }
            Command::Validate { email, phone } => {
                logging::init_console(settings.debug);
                let email_ok = email.as_deref().map(validate_email);
                let phone_ok = phone.as_deref().map(validate_phone);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "email": email_ok, "phone": phone_ok }))?
                );
                if email_ok == Some(false) || phone_ok == Some(false) {
                    return Ok(ExitCode::FAILURE);
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Journal { limit } => {
                logging::init_console(settings.debug);
                let path = settings
                    .leads_db_path
                    .as_ref()
                    .context("LEADS_DB_PATH is not set")?;
                let journal = LeadJournal::open(path)?;
                for entry in journal.recent(limit)? {
                    println!("{}", serde_json::to_string(&entry)?);
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Commands::parse_from(["leadintake", "extract", "I am Rahul"]);
        assert!(matches!(cli.command, Some(Command::Extract { ref text }) if text == "I am Rahul"));

        let cli = Commands::parse_from(["leadintake", "validate", "--phone", "9876543210"]);
        assert!(matches!(
            cli.command,
            Some(Command::Validate { email: None, phone: Some(_) })
        ));

        let cli = Commands::parse_from(["leadintake", "--port", "8080"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.settings.port, 8080);
    }

    #[test]
    fn test_settings_flags_after_subcommand() {
        let cli = Commands::parse_from([
            "leadintake",
            "extract",
            "--debug",
            "--default-enq-id",
            "E-1",
            "I am Rahul",
        ]);
        assert!(cli.settings.debug);
        assert_eq!(cli.settings.default_enq_id, "E-1");
        assert!(matches!(cli.command, Some(Command::Extract { ref text }) if text == "I am Rahul"));

        let cli = Commands::parse_from(["leadintake", "journal", "--limit", "5", "--leads-db-path", "leads.db"]);
        assert!(matches!(cli.command, Some(Command::Journal { limit: 5 })));
        assert_eq!(
            cli.settings.leads_db_path.as_deref(),
            Some(std::path::Path::new("leads.db"))
        );
    }
}
