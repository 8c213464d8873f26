//! Workflow inputs — resolved from the hosting runner's environment.
//!
//! CI runners surface action inputs as `INPUT_<NAME>` environment
//! variables and deliver the triggering event as a JSON file whose path
//! arrives in `GITHUB_EVENT_PATH`. This module is the only place that
//! environment is read.

use std::path::PathBuf;

use thiserror::Error;

/// Everything the delivery workflow consumes from the outside.
#[derive(Debug, Clone)]
pub struct DeliveryInputs {
    /// Identity credential material, passed through verbatim.
    pub identity: String,
    /// Where the credential is persisted before overlay init.
    pub identity_path: PathBuf,
    /// Absolute URL of the receiving endpoint.
    pub webhook_url: String,
    /// Shared signing secret.
    pub webhook_secret: String,
    /// Event name, placed into the `X-GitHub-Event` header.
    pub event_name: String,
    /// The triggering event. Empty object when the runner provides none.
    pub event: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("required input {0} is missing or empty")]
    Missing(&'static str),
    #[error("failed to read event payload {0}: {1}")]
    EventRead(PathBuf, std::io::Error),
    #[error("event payload {0} is not valid JSON: {1}")]
    EventParse(PathBuf, serde_json::Error),
    #[error("webhook URL is invalid: {0}")]
    BadUrl(url::ParseError),
    #[error("webhook URL has no host component")]
    NoHost,
}

/// Default path the credential is written to before init.
const DEFAULT_IDENTITY_PATH: &str = "./identity.json";

impl DeliveryInputs {
    /// Resolve inputs from the process environment.
    pub fn from_env() -> Result<Self, InputError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve inputs through a lookup function. `from_env` passes
    /// `std::env::var`; tests pass a map.
    fn resolve(get: impl Fn(&str) -> Option<String>) -> Result<Self, InputError> {
        let required = |name: &'static str| -> Result<String, InputError> {
            match get(name) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(InputError::Missing(name)),
            }
        };

        let identity = required("INPUT_IDENTITY")?;
        let webhook_url = required("INPUT_WEBHOOK_URL")?;
        let webhook_secret = required("INPUT_WEBHOOK_SECRET")?;

        let identity_path = get("POSTERN_IDENTITY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IDENTITY_PATH));

        // The runner omits both of these for manually-invoked runs.
        let event_name = get("GITHUB_EVENT_NAME").unwrap_or_default();
        let event = match get("GITHUB_EVENT_PATH") {
            Some(path) => read_event(PathBuf::from(path))?,
            None => serde_json::Value::Object(serde_json::Map::new()),
        };

        Ok(Self {
            identity,
            identity_path,
            webhook_url,
            webhook_secret,
            event_name,
            event,
        })
    }

    /// The overlay service name for this delivery — the URL's host.
    ///
    /// The overlay requires the logical service name to match the URL
    /// host, so the lookup key is derived rather than configured.
    pub fn service_name(&self) -> Result<String, InputError> {
        let url = url::Url::parse(&self.webhook_url).map_err(InputError::BadUrl)?;
        url.host_str()
            .map(str::to_owned)
            .ok_or(InputError::NoHost)
    }
}

fn read_event(path: PathBuf) -> Result<serde_json::Value, InputError> {
    let text =
        std::fs::read_to_string(&path).map_err(|e| InputError::EventRead(path.clone(), e))?;
    serde_json::from_str(&text).map_err(|e| InputError::EventParse(path, e))
}
