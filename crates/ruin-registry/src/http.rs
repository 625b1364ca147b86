use crate::catalog::{parse_locator, ChannelSnapshot};
use crate::source::SnapshotSource;
use crate::RegistryError;
use std::io::Read;

/// HTTP-based channel snapshot source.
///
/// The locator is the snapshot URL itself, optionally pinned with
/// `@<revision>` appended (e.g. `https://channels.example/stable.json@4f2a9c01`).
pub struct HttpSource {
    agent: ureq::Agent,
    auth_token: Option<String>,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            auth_token: None,
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            auth_token: Some(token.into()),
        }
    }

    fn do_get(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        let mut req = self
            .agent
            .get(url)
            .header("X-Ruin-Protocol", &crate::PROTOCOL_VERSION.to_string());
        if let Some(ref token) = self.auth_token {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }
        let resp = match req.call() {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(RegistryError::NotFound(url.to_owned()));
            }
            Err(ureq::Error::StatusCode(code)) => {
                return Err(RegistryError::Http(format!("HTTP {code} for {url}")));
            }
            Err(e) => {
                return Err(RegistryError::Http(e.to_string()));
            }
        };

        let code = resp.status().as_u16();
        if code == 404 {
            return Err(RegistryError::NotFound(url.to_owned()));
        }
        if code >= 400 {
            return Err(RegistryError::Http(format!("HTTP {code} for {url}")));
        }

        let mut reader = resp.into_body().into_reader();
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| RegistryError::Http(e.to_string()))?;
        Ok(body)
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for HttpSource {
    fn fetch(&self, locator: &str) -> Result<ChannelSnapshot, RegistryError> {
        let (url, pinned) = parse_locator(locator);
        tracing::debug!("GET {url}");
        let body = self.do_get(url)?;
        let snapshot = ChannelSnapshot::from_bytes(&body)?;
        snapshot.verify_pin(pinned)?;
        Ok(snapshot)
    }

    fn is_remote(&self) -> bool {
        true
    }
}
