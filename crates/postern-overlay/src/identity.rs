//! Network identity — the credential that authenticates this process
//! to the overlay.
//!
//! Created once at startup, owned by the overlay context, never
//! mutated. There is no teardown: the credential and the overlay
//! connection it authorizes live until process exit.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Credential material for one overlay identity.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkIdentity {
    /// Local agent socket address, e.g. `127.0.0.1:7171`. The overlay
    /// fabric is reached through this agent.
    pub agent: String,

    /// Opaque enrollment token, presented verbatim during hello.
    pub token: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to read identity {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("failed to parse identity {0}: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("failed to write identity {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

impl NetworkIdentity {
    /// Load credential material from a JSON file.
    pub fn load(path: &Path) -> Result<Self, IdentityError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| IdentityError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&text).map_err(|e| IdentityError::Parse(path.to_path_buf(), e))
    }
}

/// Persist raw credential material verbatim to `path`.
///
/// The workflow hands the material through without inspecting it; only
/// `NetworkIdentity::load` gives it meaning.
pub fn write_credential(path: &Path, material: &str) -> Result<(), IdentityError> {
    std::fs::write(path, material).map_err(|e| IdentityError::Write(path.to_path_buf(), e))
}
