//! Configuration for change-set synthesis.

use crate::error::{ChangesError, Result};
use crate::ledger::DEFAULT_CLOCK_TABLE_SUFFIX;
use crr_schema::Ident;
use serde::{Deserialize, Serialize};

/// How the two runtime parameters of a change query are written.
///
/// Both styles name each parameter once for the whole statement, so a single
/// binding covers every unioned table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamStyle {
    /// `?1` for the excluded site, `?2` for the minimum version.
    #[default]
    Numbered,
    /// `:excluded_site` and `:min_version`.
    Named,
}

impl ParamStyle {
    pub fn excluded_site(&self) -> &'static str {
        match self {
            ParamStyle::Numbered => "?1",
            ParamStyle::Named => ":excluded_site",
        }
    }

    pub fn min_version(&self) -> &'static str {
        match self {
            ParamStyle::Numbered => "?2",
            ParamStyle::Named => ":min_version",
        }
    }
}

/// Configuration shared by the composer and the patch resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangesConfig {
    /// Suffix appended to a table name to form its ledger table name.
    pub clock_table_suffix: String,
    /// Placeholder style for the excluded-site and minimum-version parameters.
    pub param_style: ParamStyle,
    /// Fail patch resolution for columns the table descriptor does not list.
    pub reject_unknown_columns: bool,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            clock_table_suffix: DEFAULT_CLOCK_TABLE_SUFFIX.to_string(),
            param_style: ParamStyle::Numbered,
            reject_unknown_columns: true,
        }
    }
}

impl ChangesConfig {
    pub fn builder() -> ChangesConfigBuilder {
        ChangesConfigBuilder::new()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChangesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clock_table_suffix.is_empty() {
            return Err(ChangesError::Config(
                "clock_table_suffix must not be empty".to_string(),
            ));
        }
        if self.clock_table_suffix.contains('\0') {
            return Err(ChangesError::Config(
                "clock_table_suffix must not contain NUL".to_string(),
            ));
        }
        Ok(())
    }

    /// Unquoted name of the ledger table for `table`.
    pub fn clock_table_name(&self, table: &Ident) -> String {
        format!("{}{}", table.as_str(), self.clock_table_suffix)
    }
}

/// Builder for [`ChangesConfig`].
pub struct ChangesConfigBuilder {
    config: ChangesConfig,
}

impl ChangesConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ChangesConfig::default(),
        }
    }

    pub fn clock_table_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.clock_table_suffix = suffix.into();
        self
    }

    pub fn param_style(mut self, style: ParamStyle) -> Self {
        self.config.param_style = style;
        self
    }

    pub fn reject_unknown_columns(mut self, enabled: bool) -> Self {
        self.config.reject_unknown_columns = enabled;
        self
    }

    pub fn build(self) -> Result<ChangesConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ChangesConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
