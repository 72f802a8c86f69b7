//! Builder configuration: naming rules and presentation defaults.

use crate::{DEFAULT_EMBEDDED_INDICATOR, DEFAULT_NAME_PATTERN, ThisError, detail::Detail};
use convert_case::{Case, Casing};
use regex::Regex;
use serde::{Deserialize, Serialize};

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("embedded indicator '{0}' is not allowed")]
    InvalidIndicator(char),

    #[error("invalid model configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

///
/// ModelConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub naming: NamingConfig,
    pub default_visible: bool,
    pub default_inline: bool,
}

impl ModelConfig {
    /// Parse and validate a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.naming.compile()?;

        Ok(config)
    }

    /// Detail every descriptor starts from before its own declarations.
    #[must_use]
    pub const fn base_detail(&self) -> Detail {
        Detail::new(self.default_visible, self.default_inline)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            default_visible: true,
            default_inline: false,
        }
    }
}

///
/// NamingConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    pub pattern: String,
    pub embedded_indicator: char,
    pub entity_case: Option<NameCase>,
}

impl NamingConfig {
    pub fn compile(&self) -> Result<NamePattern, ConfigError> {
        NamePattern::new(&self.pattern, self.embedded_indicator)
    }

    /// Apply `entity_case` to a derived entity name.
    #[must_use]
    pub fn entity_name(&self, raw: &str) -> String {
        match self.entity_case {
            Some(NameCase::Camel) => raw.to_case(Case::Camel),
            Some(NameCase::Kebab) => raw.to_case(Case::Kebab),
            Some(NameCase::Pascal) => raw.to_case(Case::Pascal),
            Some(NameCase::Snake) => raw.to_case(Case::Snake),
            Some(NameCase::UpperSnake) => raw.to_case(Case::Constant),
            None => raw.to_string(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_NAME_PATTERN.to_string(),
            embedded_indicator: DEFAULT_EMBEDDED_INDICATOR,
            entity_case: None,
        }
    }
}

///
/// NameCase
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum NameCase {
    Camel,
    Kebab,
    Pascal,
    Snake,
    UpperSnake,
}

///
/// NamePattern
///
/// Compiled name rule. Plain names must match as a whole; flattened names
/// are checked one local segment at a time.
///

#[derive(Clone, Debug)]
pub struct NamePattern {
    regex: Regex,
    indicator: char,
}

impl NamePattern {
    pub fn new(pattern: &str, indicator: char) -> Result<Self, ConfigError> {
        if indicator.is_alphanumeric() || indicator == '_' || indicator.is_whitespace() {
            return Err(ConfigError::InvalidIndicator(indicator));
        }

        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex, indicator })
    }

    #[must_use]
    pub const fn indicator(&self) -> char {
        self.indicator
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// First segment that does not match, if any.
    #[must_use]
    pub fn offending_segment<'a, S: AsRef<str>>(&self, segments: &'a [S]) -> Option<&'a str> {
        segments
            .iter()
            .map(|segment| segment.as_ref())
            .find(|segment| !self.regex.is_match(segment))
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

///
/// TESTS
///
