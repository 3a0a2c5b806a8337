//! Persistence for the login token between invocations.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use postern_proto::AuthToken;

use crate::AppError;

/// Storage for the single session token.
pub(crate) trait TokenStore {
    /// Returns the stored token, if any.
    fn load(&self) -> Result<Option<AuthToken>, AppError>;
    /// Replaces the stored token.
    fn save(&self, token: &AuthToken) -> Result<(), AppError>;
    /// Forgets the stored token. Succeeds when nothing is stored.
    fn delete(&self) -> Result<(), AppError>;
}

/// Token kept in a plain file, one token per line.
#[derive(Debug, Clone)]
pub(crate) struct FileTokenStore {
    path: Utf8PathBuf,
}

impl FileTokenStore {
    pub(crate) fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent(&self) -> &Utf8Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."))
    }

    fn file_name(&self) -> io::Result<&str> {
        self.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "token path has no file name")
        })
    }

    fn open_parent(&self) -> io::Result<Option<Dir>> {
        match Dir::open_ambient_dir(self.parent(), ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn read(&self) -> io::Result<Option<String>> {
        let name = self.file_name()?;
        let Some(dir) = self.open_parent()? else {
            return Ok(None);
        };
        match dir.read_to_string(name) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&self, token: &AuthToken) -> io::Result<()> {
        let name = self.file_name()?;
        Dir::create_ambient_dir_all(self.parent(), ambient_authority())?;
        let dir = Dir::open_ambient_dir(self.parent(), ambient_authority())?;
        dir.write(name, format!("{}\n", token.as_str()))
    }

    fn remove(&self) -> io::Result<()> {
        let name = self.file_name()?;
        let Some(dir) = self.open_parent()? else {
            return Ok(());
        };
        match dir.remove_file(name) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, AppError> {
        let content = self.read().map_err(|source| AppError::ReadToken {
            path: self.path.clone(),
            source,
        })?;
        Ok(content.as_deref().and_then(parse_token))
    }

    fn save(&self, token: &AuthToken) -> Result<(), AppError> {
        tracing::debug!(path = %self.path, "saving login token");
        self.write(token).map_err(|source| AppError::WriteToken {
            path: self.path.clone(),
            source,
        })
    }

    fn delete(&self) -> Result<(), AppError> {
        tracing::debug!(path = %self.path, "removing login token");
        self.remove().map_err(|source| AppError::RemoveToken {
            path: self.path.clone(),
            source,
        })
    }
}

/// The last non-blank line, trimmed.
fn parse_token(content: &str) -> Option<AuthToken> {
    content
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(AuthToken::new)
}
