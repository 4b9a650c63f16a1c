//! File persistence of the execution session between invocations.
//!
//! Every `cadence run ...` call is a separate process, so the running
//! session lives in a small JSON file next to the other state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadence_core::Session;
use log::{debug, warn};

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, idle when the file is missing.
    ///
    /// A file that no longer decodes is treated as idle too; the plan it
    /// referred to stays in progress and can be resumed.
    pub fn load(&self) -> Result<Session> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(Session::Idle);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session file {}", self.path.display())
                })
            }
        };

        match serde_json::from_str(&text) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {e}",
                    self.path.display()
                );
                Ok(Session::Idle)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session).context("Failed to encode session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_state_file("session.json")
            .context("Failed to resolve the session file location")
    }
}
