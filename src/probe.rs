//! Blocking URL health check with retry.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::retry::{retry_with_backoff, RetryPolicy};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl ProbeError {
    /// Everything except a malformed URL is worth another try.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProbeError::InvalidUrl { .. })
    }
}

/// A successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSuccess {
    pub status: u16,
    pub attempts: u32,
}

pub struct HealthProbe {
    agent: ureq::Agent,
    policy: RetryPolicy,
}

impl HealthProbe {
    pub fn new(policy: RetryPolicy, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, policy }
    }

    /// Probe `url`, sleeping for real between attempts.
    pub fn probe(&self, url: &str) -> Result<ProbeSuccess, ProbeError> {
        self.probe_with_sleep(url, std::thread::sleep)
    }

    pub fn probe_with_sleep(
        &self,
        url: &str,
        sleep: impl FnMut(Duration),
    ) -> Result<ProbeSuccess, ProbeError> {
        let result = retry_with_backoff(
            &self.policy,
            |attempt| {
                debug!("Probing {} (attempt {})", url, attempt);
                self.get_once(url).map(|status| ProbeSuccess {
                    status,
                    attempts: attempt,
                })
            },
            ProbeError::is_retryable,
            sleep,
        );
        if let Ok(ok) = &result {
            info!("Website is up! {} answered {}", url, ok.status);
        }
        result
    }

    fn get_once(&self, url: &str) -> Result<u16, ProbeError> {
        match self.agent.get(url).call() {
            Ok(resp) if (200..300).contains(&resp.status()) => Ok(resp.status()),
            Ok(resp) => Err(ProbeError::Status {
                url: url.to_string(),
                status: resp.status(),
            }),
            Err(ureq::Error::Status(status, _)) => Err(ProbeError::Status {
                url: url.to_string(),
                status,
            }),
            Err(ureq::Error::Transport(t)) => match t.kind() {
                ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
                    Err(ProbeError::InvalidUrl {
                        url: url.to_string(),
                        reason: t.to_string(),
                    })
                }
                _ => Err(ProbeError::Transport {
                    url: url.to_string(),
                    reason: t.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_malformed_urls_are_final() {
        let bad = ProbeError::InvalidUrl {
            url: "::".into(),
            reason: "nope".into(),
        };
        let down = ProbeError::Status {
            url: "http://x".into(),
            status: 503,
        };
        let refused = ProbeError::Transport {
            url: "http://x".into(),
            reason: "refused".into(),
        };

        assert!(!bad.is_retryable());
        assert!(down.is_retryable());
        assert!(refused.is_retryable());
    }

    #[test]
    fn malformed_url_is_not_retried() {
        let probe = HealthProbe::new(RetryPolicy::default(), Duration::from_secs(1));
        let mut sleeps = 0;
        let err = probe
            .probe_with_sleep("not a url", |_| sleeps += 1)
            .unwrap_err();

        assert!(matches!(err, ProbeError::InvalidUrl { .. }));
        assert_eq!(sleeps, 0);
    }
}
