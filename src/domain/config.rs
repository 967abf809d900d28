use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

/// Environment variable holding the resource-management API base URL.
pub const INSIDER_API_ENV: &str = "INSIDER_API";
/// Environment variable holding the employee information API base URL.
pub const EMPINFO_API_ENV: &str = "EMPINFO_API";
/// Environment variable holding the matching service base URL.
pub const AI_ENDPOINT_ENV: &str = "AI_ENDPOINT";
/// Environment variable holding the static bearer token.
pub const TOKEN_ENV: &str = "TOKEN";

/// Errors raised while loading, saving or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    /// The configuration file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),

    /// A base URL needed by the current command is not configured.
    #[error("{0} is not configured (set `{key}` in the config file or the {env} environment variable)", key = .0.key(), env = .0.env_var())]
    MissingEndpoint(Service),

    /// A value is outside its allowed range.
    #[error("Invalid value for `{key}`: {reason}")]
    Invalid {
        /// The offending configuration key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// The external services the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The resource-management ("Insider") API.
    Insider,
    /// The employee information API.
    EmpInfo,
    /// The AI matching service.
    Matcher,
}

impl Service {
    /// Configuration file key of the service's base URL.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Insider => "insider_api",
            Self::EmpInfo => "empinfo_api",
            Self::Matcher => "ai_endpoint",
        }
    }

    /// Environment variable overriding the base URL.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Insider => INSIDER_API_ENV,
            Self::EmpInfo => EMPINFO_API_ENV,
            Self::Matcher => AI_ENDPOINT_ENV,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Insider => "The resource-management API",
            Self::EmpInfo => "The employee information API",
            Self::Matcher => "The matching service",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Weights of the matching criteria, shown on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Weight of skill fit.
    #[serde(default = "default_skill_fit")]
    pub skill_fit: f64,
    /// Weight of experience match.
    #[serde(default = "default_experience_match")]
    pub experience_match: f64,
    /// Weight of business-domain match.
    #[serde(default = "default_domain_match")]
    pub domain_match: f64,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            skill_fit: default_skill_fit(),
            experience_match: default_experience_match(),
            domain_match: default_domain_match(),
        }
    }
}

impl Criteria {
    /// The weights with their display labels, in display order.
    #[must_use]
    pub const fn labelled(&self) -> [(&'static str, f64); 3] {
        [
            ("Skill Fit", self.skill_fit),
            ("Experience Match", self.experience_match),
            ("Domain Match", self.domain_match),
        ]
    }
}

/// Configuration for the dashboard.
///
/// Base URLs and the token normally come from the environment; the file
/// only provides defaults. The token is never printed by `Debug`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    insider_api: Option<String>,
    empinfo_api: Option<String>,
    ai_endpoint: Option<String>,
    token: Option<String>,

    /// Rows per page in the list views.
    page_size: usize,

    /// Matching criteria weights.
    pub criteria: Criteria,

    /// Minimum overall score for a candidate to be considered confident.
    pub confidence_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            insider_api: None,
            empinfo_api: None,
            ai_endpoint: None,
            token: None,
            page_size: default_page_size(),
            criteria: Criteria::default(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("insider_api", &self.insider_api)
            .field("empinfo_api", &self.empinfo_api)
            .field("ai_endpoint", &self.ai_endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("criteria", &self.criteria)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish()
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(Error::Read)?;
        toml::from_str(&content).map_err(Error::Parse)
    }

    /// Loads the configuration file if it exists, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self).map_err(Error::Serialize)?;
        std::fs::write(path, content).map_err(Error::Write)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(INSIDER_API_ENV) {
            self.insider_api = Some(value);
        }
        if let Some(value) = read(EMPINFO_API_ENV) {
            self.empinfo_api = Some(value);
        }
        if let Some(value) = read(AI_ENDPOINT_ENV) {
            self.ai_endpoint = Some(value);
        }
        if let Some(value) = read(TOKEN_ENV) {
            self.token = Some(value);
        }
    }

    /// Checks that every value is within its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 {
            return Err(Error::Invalid {
                key: "page_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        let ratios = [
            ("criteria.skill_fit", self.criteria.skill_fit),
            ("criteria.experience_match", self.criteria.experience_match),
            ("criteria.domain_match", self.criteria.domain_match),
            ("confidence_threshold", self.confidence_threshold),
        ];
        for (key, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Invalid {
                    key,
                    reason: format!("{value} is outside 0..=1"),
                });
            }
        }

        Ok(())
    }

    /// Returns the base URL of `service`, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEndpoint`] if the URL is not configured.
    pub fn endpoint(&self, service: Service) -> Result<&str, Error> {
        let value = match service {
            Service::Insider => self.insider_api.as_deref(),
            Service::EmpInfo => self.empinfo_api.as_deref(),
            Service::Matcher => self.ai_endpoint.as_deref(),
        };
        value
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(Error::MissingEndpoint(service))
    }

    /// The bearer token, if configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Rows per page in the list views.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sets a base URL.
    pub fn set_endpoint(&mut self, service: Service, url: impl Into<String>) {
        let url = Some(url.into());
        match service {
            Service::Insider => self.insider_api = url,
            Service::EmpInfo => self.empinfo_api = url,
            Service::Matcher => self.ai_endpoint = url,
        }
    }

    /// Sets the bearer token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }
}

const fn default_page_size() -> usize {
    10
}

const fn default_skill_fit() -> f64 {
    0.45
}

const fn default_experience_match() -> f64 {
    0.4
}

const fn default_domain_match() -> f64 {
    0.15
}

const fn default_confidence_threshold() -> f64 {
    0.4
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        insider_api: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        empinfo_api: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        ai_endpoint: Option<String>,

        /// Prefer the `TOKEN` environment variable over storing it here.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,

        #[serde(default = "default_page_size")]
        page_size: usize,

        #[serde(default = "default_confidence_threshold")]
        confidence_threshold: f64,

        #[serde(default)]
        criteria: Criteria,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                insider_api,
                empinfo_api,
                ai_endpoint,
                token,
                page_size,
                criteria,
                confidence_threshold,
            } => Self {
                insider_api,
                empinfo_api,
                ai_endpoint,
                token,
                page_size,
                criteria,
                confidence_threshold,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            insider_api: config.insider_api,
            empinfo_api: config.empinfo_api,
            ai_endpoint: config.ai_endpoint,
            token: config.token,
            page_size: config.page_size,
            criteria: config.criteria,
            confidence_threshold: config.confidence_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ninsider_api = \"https://insider.example/\"\npage_size = 25\nconfidence_threshold = 0.5\n\n[criteria]\nskill_fit = 0.6\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(
            config.endpoint(Service::Insider).unwrap(),
            "https://insider.example"
        );
        assert_eq!(config.page_size(), 25);
        assert!((config.criteria.skill_fit - 0.6).abs() < f64::EPSILON);
        assert!((config.criteria.domain_match - 0.15).abs() < f64::EPSILON);
        assert!((config.confidence_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\npage_size = \"ten\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("resalloc.toml");

        let mut config = Config::default();
        config.set_endpoint(Service::Matcher, "http://ai.local");
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = Config::default();
        config.set_endpoint(Service::Insider, "http://file");

        let env: HashMap<&str, &str> = [
            (INSIDER_API_ENV, "http://env"),
            (TOKEN_ENV, "secret"),
            (AI_ENDPOINT_ENV, "  "),
        ]
        .into_iter()
        .collect();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.endpoint(Service::Insider).unwrap(), "http://env");
        assert_eq!(config.token(), Some("secret"));
        assert!(matches!(
            config.endpoint(Service::Matcher),
            Err(Error::MissingEndpoint(Service::Matcher))
        ));
    }

    #[test]
    fn debug_output_redacts_token() {
        let mut config = Config::default();
        config.set_token("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.criteria.skill_fit = 1.5;
        assert!(matches!(
            config.validate(),
            Err(Error::Invalid { key: "criteria.skill_fit", .. })
        ));

        let config: Config = toml::from_str("_version = \"1\"\npage_size = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::Invalid { key: "page_size", .. })
        ));
    }
}
