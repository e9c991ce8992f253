// # cfddnsd - one-shot Cloudflare dynamic DNS updater
//
// Runs exactly one sync cycle and exits. Scheduling is left to cron or a
// systemd timer.
//
// The binary is a thin integration layer:
// 1. Read configuration from environment variables
// 2. Initialize logging
// 3. Determine the current address (from the environment or an echo service)
// 4. Run one `SyncEngine` cycle and map the report to an exit code
//
// ## Configuration
//
// ### Provider
// - `CFDDNS_EMAIL`: Cloudflare account email
// - `CFDDNS_API_KEY`: Cloudflare global API key
// - `CFDDNS_ZONE_ID`: Zone ID the domains belong to
// - `CFDDNS_API_BASE_URL`: API base URL (default: Cloudflare v4)
// - `CFDDNS_HTTP_TIMEOUT_SECS`: Per-request timeout, 1-300 (default: 30)
//
// ### Records
// - `CFDDNS_DOMAINS`: Comma-separated list of domains, processed in order
//
// ### Address
// - `CFDDNS_IP`: Current address; skips discovery when set
// - `CFDDNS_IP_SOURCE_URL`: Echo service URL (default: https://api.ipify.org)
// - `CFDDNS_IP_VERSION`: v4, v6 or both (default: both)
//
// ### Logging
// - `CFDDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export CFDDNS_EMAIL=ops@example.com
// export CFDDNS_API_KEY=your_key
// export CFDDNS_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export CFDDNS_DOMAINS=example.com,home.example.com
//
// cfddnsd
// ```

use anyhow::{Context, Result};
use cfddns_core::{ProviderCredentials, SyncConfig, SyncEngine};
use cfddns_provider_cloudflare::{CLOUDFLARE_API_BASE, CloudflareProvider};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Default echo service for address discovery
const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

/// Default per-request timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Exit codes for the possible ends of a run
///
/// - 0: Every domain unchanged or updated
/// - 1: Configuration or startup error
/// - 2: Runtime error before the cycle could start
/// - 3: The cycle ran but at least one domain failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CfddnsExitCode {
    /// All domains in sync
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Address discovery or client setup failed
    RuntimeError = 2,
    /// One or more domains failed
    SyncFailures = 3,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    email: String,
    api_key: String,
    zone_id: String,
    domains: Vec<String>,
    current_ip: Option<String>,
    ip_source_url: String,
    ip_version: String,
    api_base_url: String,
    http_timeout_secs: u64,
    log_level: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("domains", &self.domains)
            .field("current_ip", &self.current_ip)
            .field("ip_source_url", &self.ip_source_url)
            .field("ip_version", &self.ip_version)
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} is required. Set it via: export {}=...", key, key))
        };

        let http_timeout_secs = match lookup("CFDDNS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CFDDNS_HTTP_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            email: required("CFDDNS_EMAIL")?,
            api_key: required("CFDDNS_API_KEY")?,
            zone_id: required("CFDDNS_ZONE_ID")?,
            domains: lookup("CFDDNS_DOMAINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            current_ip: lookup("CFDDNS_IP")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ip_source_url: lookup("CFDDNS_IP_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string()),
            ip_version: lookup("CFDDNS_IP_VERSION").unwrap_or_else(|| "both".to_string()),
            api_base_url: lookup("CFDDNS_API_BASE_URL")
                .unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string()),
            http_timeout_secs,
            log_level: lookup("CFDDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let key_lower = self.api_key.to_lowercase();
        if key_lower.contains("your_key") || key_lower.contains("replace_me") {
            anyhow::bail!(
                "CFDDNS_API_KEY appears to be a placeholder. \
                Use the global API key from your Cloudflare profile."
            );
        }

        if self.domains.is_empty() {
            anyhow::bail!(
                "CFDDNS_DOMAINS must contain at least one domain. \
                Set it via: export CFDDNS_DOMAINS=example.com,home.example.com"
            );
        }

        for domain in &self.domains {
            validate_domain_name(domain)?;
        }

        for (key, url) in [
            ("CFDDNS_API_BASE_URL", &self.api_base_url),
            ("CFDDNS_IP_SOURCE_URL", &self.ip_source_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", key, url);
            }
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "CFDDNS_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        #[cfg(feature = "http")]
        self.ip_version
            .parse::<cfddns_ip_http::IpVersion>()
            .context("CFDDNS_IP_VERSION is not valid")?;

        #[cfg(not(feature = "http"))]
        if self.current_ip.is_none() {
            anyhow::bail!("CFDDNS_IP is required when built without the `http` feature");
        }

        log_level(&self.log_level)?;

        Ok(())
    }

    fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(
            ProviderCredentials::new(&self.email, &self.api_key, &self.zone_id),
            self.domains.clone(),
        )
    }
}

/// Validate that a string looks like a DNS name
///
/// Basic RFC 1035 shape checks; the provider has the final word.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        // Wildcard records are addressable by name too
        if label != "*" && !label.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "CFDDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CfddnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return CfddnsExitCode::ConfigError.into();
    }

    let level = log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfddnsExitCode::ConfigError.into();
    }

    info!("Starting cfddnsd: {} domain(s) configured", config.domains.len());

    // Domains are processed sequentially; one thread is all a cycle needs
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfddnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run_once(&config).await {
            Ok(code) => code,
            Err(e) => {
                error!("cfddnsd error: {:#}", e);
                CfddnsExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Run a single sync cycle
async fn run_once(config: &Config) -> Result<CfddnsExitCode> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let current_ip = current_ip(config, timeout).await?;
    info!("Current address: {}", current_ip);

    let provider = CloudflareProvider::with_base_url(&config.api_base_url, timeout)
        .context("Failed to create Cloudflare provider")?;

    let engine = SyncEngine::new(Box::new(provider), config.sync_config())
        .context("Invalid sync configuration")?;

    let report = engine.sync(&current_ip).await;

    if report.has_failures() {
        warn!(
            "{} of {} domain(s) failed to sync",
            report.failed(),
            report.len()
        );
        return Ok(CfddnsExitCode::SyncFailures);
    }

    Ok(CfddnsExitCode::Success)
}

/// Determine the current address: configured value first, then discovery
async fn current_ip(config: &Config, timeout: Duration) -> Result<String> {
    if let Some(ip) = &config.current_ip {
        return Ok(ip.clone());
    }

    #[cfg(feature = "http")]
    {
        let version = config.ip_version.parse::<cfddns_ip_http::IpVersion>()?;
        let source = cfddns_ip_http::HttpIpSource::with_timeout(&config.ip_source_url, version, timeout)?;
        info!("Discovering current address via {}", source.url());
        source.current().await.context("Address discovery failed")
    }

    #[cfg(not(feature = "http"))]
    {
        let _ = timeout;
        anyhow::bail!("CFDDNS_IP is not set and address discovery is not compiled in")
    }
}
