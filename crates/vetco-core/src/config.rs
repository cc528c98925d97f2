//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `VETCO_*` environment variables with `__` between sections
//! (e.g. `VETCO_DATABASE__PATH=/tmp/vetco.db`).

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VetcoConfig {
    pub database: DatabaseConfig,
    pub messaging: MessagingConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; in-memory when absent
    pub path: Option<String>,
    /// Load the demo farmers, vets and appointments on open
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagingConfig {
    /// Auto-reply sent by the vet after a farmer writes
    pub vet_reply: ReplyConfig,
    /// Auto-reply sent by the farmer after a vet writes
    pub farmer_reply: ReplyConfig,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            vet_reply: ReplyConfig {
                mode: ReplyMode::Always,
                probability: 1.0,
                delay_secs: 2,
                text: "I've received your message. I'll get back to you shortly with more information."
                    .into(),
            },
            farmer_reply: ReplyConfig {
                mode: ReplyMode::Sometimes,
                probability: 0.5,
                delay_secs: 5,
                text: "Thank you for the information, doctor. I'll follow your advice.".into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    Always,
    Sometimes,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplyConfig {
    pub mode: ReplyMode,
    /// Chance of replying in `sometimes` mode, 0.0 - 1.0
    pub probability: f64,
    pub delay_secs: u64,
    pub text: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            mode: ReplyMode::Never,
            probability: 0.0,
            delay_secs: 0,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BookingConfig {
    /// Refuse bookings that break the vet's hours, special dates or policy
    pub enforce_availability: bool,
}

impl VetcoConfig {
    /// Load defaults, then `path` if given and present, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // Partial file or env sections merge over these, not over the
        // field-level serde defaults
        let mut builder = Config::builder().add_source(Config::try_from(&VetcoConfig::default())?);
        if let Some(path) = path {
            if path.exists() {
                log::info!("Loading config from {}", path.display());
            }
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("VETCO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: VetcoConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, reply) in [
            ("vet_reply", &self.messaging.vet_reply),
            ("farmer_reply", &self.messaging.farmer_reply),
        ] {
            if !(0.0..=1.0).contains(&reply.probability) {
                return Err(ConfigError::Message(format!(
                    "messaging.{}.probability must be between 0 and 1, got {}",
                    name, reply.probability
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VetcoConfig::default();
        assert!(config.database.path.is_none());
        assert!(!config.booking.enforce_availability);
        assert_eq!(config.messaging.vet_reply.mode, ReplyMode::Always);
        assert_eq!(config.messaging.farmer_reply.delay_secs, 5);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VetcoConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.messaging, MessagingConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vetco.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[database]
seed_demo_data = true

[booking]
enforce_availability = true

[messaging.farmer_reply]
mode = "never"
"#
        )
        .unwrap();

        let config = VetcoConfig::load(Some(&path)).unwrap();
        assert!(config.database.seed_demo_data);
        assert!(config.booking.enforce_availability);
        assert_eq!(config.messaging.farmer_reply.mode, ReplyMode::Never);
        // Untouched sections keep their defaults
        assert_eq!(config.messaging.vet_reply.delay_secs, 2);
    }

    #[test]
    fn test_partial_reply_section_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vetco.toml");
        std::fs::write(&path, "[messaging.vet_reply]\ndelay_secs = 10\n").unwrap();

        let config = VetcoConfig::load(Some(&path)).unwrap();
        let vet_reply = &config.messaging.vet_reply;
        let defaults = MessagingConfig::default();
        assert_eq!(vet_reply.delay_secs, 10);
        assert_eq!(vet_reply.mode, ReplyMode::Always);
        assert_eq!(vet_reply.probability, 1.0);
        assert_eq!(vet_reply.text, defaults.vet_reply.text);
        assert_eq!(config.messaging.farmer_reply, defaults.farmer_reply);
    }

    #[test]
    fn test_probability_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vetco.toml");
        std::fs::write(&path, "[messaging.vet_reply]\nprobability = 1.5\n").unwrap();

        assert!(VetcoConfig::load(Some(&path)).is_err());
    }
}
