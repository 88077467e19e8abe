//! Runtime settings.
//!
//! Settings are layered with the `config` crate: built-in defaults first,
//! then whatever the command line supplied. No files or environment
//! variables are consulted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;
use tracing::warn;

use crate::locale::Locale;
use crate::source::status_url;

/// Status page queried when no URL is given.
pub const DEFAULT_STATUS_URL: &str = "http://localhost/status";
/// Label set used when no language is given.
pub const DEFAULT_LANG: &str = "en";
/// Log filter used when no level is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Values supplied on the command line; `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub status_url: Option<String>,
    pub lang: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Base status page URL, without the `json` query.
    pub status_url: String,
    /// Requested language tag (may be unrecognised; see [`Settings::locale`]).
    pub lang: String,
    /// Where to write logs. Logging is off when unset.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, e.g. "info" or "poolwatch=debug".
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            status_url: DEFAULT_STATUS_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from defaults and command-line overrides.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config = Config::builder()
            .set_default("status_url", DEFAULT_STATUS_URL)?
            .set_default("lang", DEFAULT_LANG)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_override_option("status_url", overrides.status_url.clone())?
            .set_override_option("lang", overrides.lang.clone())?
            .set_override_option(
                "log_file",
                overrides.log_file.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("log_level", overrides.log_level.clone())?
            .build()
            .context("failed to assemble settings")?;

        let settings: Settings = config
            .try_deserialize()
            .context("failed to read settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the status URL can be queried.
    pub fn validate(&self) -> Result<()> {
        status_url(&self.status_url)?;
        Ok(())
    }

    /// The label set for the configured language, English if unrecognised.
    pub fn locale(&self) -> &'static Locale {
        match Locale::find(&self.lang) {
            Some(locale) => locale,
            None => {
                let supported: Vec<_> = Locale::supported().collect();
                warn!(
                    "Unrecognised language '{}' (supported: {}), falling back to {}",
                    self.lang,
                    supported.join(", "),
                    DEFAULT_LANG
                );
                Locale::for_tag(DEFAULT_LANG)
            }
        }
    }
}
