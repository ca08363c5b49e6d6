//! Shared configuration for Crawlab console tools.
//!
//! TOML profiles with environment overrides, and translation to
//! `crawlab_core::ConsoleConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crawlab_core::{ConsoleConfig, RequestFencing, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Resolve `name`, or the default profile when `None`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// `disabled` or `latest-issued`.
    #[serde(default)]
    pub fencing: RequestFencing,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
            fencing: RequestFencing::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}

/// A named Crawlab server profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "http://localhost:8080/api").
    pub endpoint: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,

    /// Override table page size.
    pub page_size: Option<u32>,

    /// Override request fencing.
    pub fencing: Option<RequestFencing>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "crawlab", "crawlab-console").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("crawlab-console");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CRAWLAB_").split("__"))
}

/// Load the full Config from file + environment.
///
/// Environment keys nest with a double underscore:
/// `CRAWLAB_DEFAULTS__PAGE_SIZE=20`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering the environment on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment(path).extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ConsoleConfig` from a profile, falling back to `defaults` for
/// every setting the profile leaves unset.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let url: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ConsoleConfig {
        url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        page_size,
        fencing: profile.fencing.unwrap_or(defaults.fencing),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(endpoint: &str) -> Profile {
        Profile {
            endpoint: endpoint.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            page_size: None,
            fencing: None,
        }
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
page_size = 20
fencing = "latest-issued"

[profiles.lab]
endpoint = "http://crawlab.lab:8080/api"
timeout = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.page_size, 20);
        assert_eq!(cfg.defaults.timeout, 30);

        let (name, lab) = cfg.profile(None).unwrap();
        assert_eq!(name, "lab");

        let console = profile_to_console_config(lab, &cfg.defaults).unwrap();
        assert_eq!(console.url.as_str(), "http://crawlab.lab:8080/api");
        assert_eq!(console.timeout, Duration::from_secs(5));
        assert_eq!(console.page_size, 20);
        assert_eq!(console.fencing, RequestFencing::LatestIssued);
        assert_eq!(console.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), profile("https://crawlab.example.com/api"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
    }

    #[test]
    fn unknown_profile() {
        let err = Config::default().profile(Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref profile } if profile == "nope"));
    }

    #[test]
    fn tls_precedence() {
        let defaults = Defaults::default();

        let mut p = profile("https://crawlab.example.com/api");
        p.ca_cert = Some("/etc/ca.pem".into());
        assert_eq!(
            profile_to_console_config(&p, &defaults).unwrap().tls,
            TlsVerification::CustomCa("/etc/ca.pem".into())
        );

        p.insecure = Some(true);
        assert_eq!(
            profile_to_console_config(&p, &defaults).unwrap().tls,
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn rejects_bad_endpoint_and_page_size() {
        let defaults = Defaults::default();
        assert!(matches!(
            profile_to_console_config(&profile("not a url"), &defaults),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            profile_to_console_config(&profile("ftp://crawlab/api"), &defaults),
            Err(ConfigError::Validation { .. })
        ));

        let mut p = profile("http://localhost:8080/api");
        p.page_size = Some(0);
        assert!(matches!(
            profile_to_console_config(&p, &defaults),
            Err(ConfigError::Validation { ref field, .. }) if field == "page_size"
        ));
    }
}
