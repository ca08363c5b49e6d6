// ── Runtime console configuration ──
//
// These types describe *how* the console reaches the Crawlab API and how its
// stores behave. They never touch disk: `crawlab-config` (or any embedder)
// builds a `ConsoleConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crawlab_api::{TlsMode, TransportConfig};

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// How concurrent responses on the same channel (table list, task logs,
/// task results) are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestFencing {
    /// Every response commits; whichever resolves last wins, even if it was
    /// issued first.
    #[default]
    Disabled,
    /// Only the most recently issued request on a channel may commit.
    /// Superseded responses are still returned to their caller.
    LatestIssued,
}

/// Configuration for one console instance.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root (e.g. `http://localhost:8080/api`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout, enforced by the transport.
    pub timeout: Duration,
    /// Page size for the main tables.
    pub page_size: u32,
    /// Response reconciliation policy for every store.
    pub fencing: RequestFencing,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: 10,
            fencing: RequestFencing::default(),
        }
    }
}

impl ConsoleConfig {
    /// Transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
