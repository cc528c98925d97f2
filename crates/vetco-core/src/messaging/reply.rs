//! Counterpart auto-reply policy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ReplyConfig, ReplyMode};

/// How often the counterpart answers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ReplyOdds {
    Always,
    Sometimes { probability: f64 },
    Never,
}

/// Whether, when and what the counterpart replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyPolicy {
    pub odds: ReplyOdds,
    pub delay_ms: i64,
    pub text: String,
}

impl ReplyPolicy {
    pub fn from_config(config: &ReplyConfig) -> Self {
        let odds = match config.mode {
            ReplyMode::Always => ReplyOdds::Always,
            ReplyMode::Sometimes => ReplyOdds::Sometimes {
                probability: config.probability,
            },
            ReplyMode::Never => ReplyOdds::Never,
        };
        let delay_ms = i64::try_from(config.delay_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);

        Self {
            odds,
            delay_ms,
            text: config.text.clone(),
        }
    }

    /// Roll for a reply. Blank reply text never replies.
    pub fn should_reply<R: Rng>(&self, rng: &mut R) -> bool {
        if self.text.trim().is_empty() {
            return false;
        }
        match self.odds {
            ReplyOdds::Always => true,
            ReplyOdds::Sometimes { probability } => rng.gen::<f64>() < probability,
            ReplyOdds::Never => false,
        }
    }
}
