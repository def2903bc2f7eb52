// Session token persistence backends.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use wedly_core::{CoreError, TokenStore};

const KEYRING_SERVICE: &str = "wedly";

fn storage_error(action: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::Storage {
        message: format!("{action}: {err}"),
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Stores the token in a single file, readable only by the owner on unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/tokens/<profile>.token`
    pub fn for_profile(profile: &str) -> Self {
        Self::new(crate::token_dir().join(format!("{profile}.token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("reading token file", e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| storage_error("creating token directory", e))?;
        }
        write_private(&self.path, token.expose_secret())
            .map_err(|e| storage_error("writing token file", e))?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("removing token file", e)),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Stores the token in the OS keyring under `wedly` / `<profile>/token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new(profile: &str) -> Self {
        Self {
            account: format!("{profile}/token"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| storage_error("opening keyring entry", e))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(storage_error("reading keyring", e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| storage_error("writing keyring", e))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storage_error("clearing keyring", e)),
        }
    }
}
