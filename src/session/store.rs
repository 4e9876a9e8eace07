use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use super::Session;

const TOKEN_FILE: &str = "token";
const MIRROR_FILE: &str = "session.json";

/// File-backed persistence: the bearer token and a JSON mirror of the [`Session`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn mirror_path(&self) -> PathBuf {
        self.dir.join(MIRROR_FILE)
    }

    /// The persisted token, if any. Unreadable files count as absent.
    pub fn token(&self) -> Option<String> {
        match fs::read_to_string(self.token_path()) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read token file: {e}");
                None
            }
        }
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        fs::write(&path, token)
            .with_context(|| format!("Failed to write token file: {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict token file: {}", path.display()))?;
        }
        Ok(())
    }

    pub fn remove_token(&self) -> Result<()> {
        remove_if_present(&self.token_path())
    }

    /// Reads the session mirror. A missing or corrupt mirror yields `None`.
    pub fn load_mirror(&self) -> Option<Session> {
        let raw = match fs::read_to_string(self.mirror_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read session mirror: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring corrupt session mirror: {e}");
                None
            }
        }
    }

    pub fn save_mirror(&self, session: &Session) -> Result<()> {
        let path = self.mirror_path();
        let json = serde_json::to_string(session).context("Failed to serialize session")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write session mirror: {}", path.display()))
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
