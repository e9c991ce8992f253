// # HTTP IP Source
//
// Discovers the current public address by asking an external echo service
// (e.g. api.ipify.org, icanhazip.com) once per sync cycle.
//
// The sync core treats the address as an opaque literal; this crate is the
// one place where it is actually checked to be an IPv4/IPv6 address.

use cfddns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Default echo service
pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org";

/// Default HTTP timeout for the lookup
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which address family to accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// IPv4 only
    V4,
    /// IPv6 only
    V6,
    /// Either family
    #[default]
    Both,
}

impl IpVersion {
    fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
            IpVersion::Both => true,
        }
    }
}

impl FromStr for IpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "v4" | "ipv4" | "4" => Ok(IpVersion::V4),
            "v6" | "ipv6" | "6" => Ok(IpVersion::V6),
            "both" | "any" => Ok(IpVersion::Both),
            other => Err(Error::config(format!(
                "Unknown IP version '{}' (expected v4, v6 or both)",
                other
            ))),
        }
    }
}

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// Accepted address family
    version: IpVersion,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL answering with the caller's address as plain text
    /// - `version`: address family to accept
    pub fn new(url: impl Into<String>, version: IpVersion) -> Result<Self> {
        Self::with_timeout(url, version, DEFAULT_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, version: IpVersion, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::config(format!(
                "IP source URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, version, client })
    }

    /// URL queried by this source
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current address
    ///
    /// Returns the literal as served (trimmed), after checking it parses as
    /// an address of the accepted family.
    pub async fn current(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} answered with HTTP {}",
                self.url,
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;
        let text = text.trim();

        let ip: IpAddr = text
            .parse()
            .map_err(|_| Error::ip_source(format!("Invalid IP address: {:?}", text)))?;

        if !self.version.accepts(&ip) {
            return Err(Error::ip_source(format!(
                "Expected {:?} address, got: {}",
                self.version, ip
            )));
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serving(body: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_ip_version_from_str() {
        assert_eq!("v4".parse::<IpVersion>().unwrap(), IpVersion::V4);
        assert_eq!("IPv6".parse::<IpVersion>().unwrap(), IpVersion::V6);
        assert_eq!("both".parse::<IpVersion>().unwrap(), IpVersion::Both);
        assert!("v5".parse::<IpVersion>().is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(HttpIpSource::new("ftp://example.com", IpVersion::Both).is_err());
        assert!(HttpIpSource::new(DEFAULT_IP_SERVICE, IpVersion::Both).is_ok());
    }

    #[tokio::test]
    async fn test_current_trims_body() {
        let server = serving("203.0.113.5\n", 200).await;
        let source = HttpIpSource::new(server.uri(), IpVersion::Both).unwrap();

        assert_eq!(source.current().await.unwrap(), "203.0.113.5");
    }

    #[tokio::test]
    async fn test_current_ipv6() {
        let server = serving("2001:db8::1", 200).await;
        let source = HttpIpSource::new(server.uri(), IpVersion::V6).unwrap();

        assert_eq!(source.current().await.unwrap(), "2001:db8::1");
    }

    #[tokio::test]
    async fn test_current_version_mismatch() {
        let server = serving("203.0.113.5", 200).await;
        let source = HttpIpSource::new(server.uri(), IpVersion::V6).unwrap();

        assert!(matches!(source.current().await, Err(Error::IpSource(_))));
    }

    #[tokio::test]
    async fn test_current_garbage_body() {
        let server = serving("<html>rate limited</html>", 200).await;
        let source = HttpIpSource::new(server.uri(), IpVersion::Both).unwrap();

        assert!(matches!(source.current().await, Err(Error::IpSource(_))));
    }

    #[tokio::test]
    async fn test_current_http_error() {
        let server = serving("", 503).await;
        let source = HttpIpSource::new(server.uri(), IpVersion::Both).unwrap();

        let err = source.current().await.unwrap_err();
        assert!(err.to_string().contains("503"), "got: {}", err);
    }
}
