use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use twig_history::CommitPolicy;
use twig_types::Signature;

use crate::error::{SdkError, SdkResult};

/// Repository settings, stored as `config.toml` in the metadata directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub user: UserConfig,
    pub core: CoreConfig,
}

/// Identity recorded as author and committer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: "Twig User".into(),
            email: "twig@localhost".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Branch `HEAD` points at in a new repository.
    pub default_branch: String,
    pub allow_empty_initial_commit: bool,
    /// zstd level for loose objects.
    pub compression_level: i32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            allow_empty_initial_commit: true,
            compression_level: 3,
        }
    }
}

impl RepoConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> SdkResult<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Replace the user identity.
    pub fn with_user(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.user.name = name.into();
        self.user.email = email.into();
        self
    }

    /// A signature for the configured user at the current time.
    pub fn signature(&self) -> SdkResult<Signature> {
        Ok(Signature::now(&self.user.name, &self.user.email)?)
    }

    pub fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy {
            allow_empty_initial: self.core.allow_empty_initial_commit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = RepoConfig::default();
        assert_eq!(c.core.default_branch, "main");
        assert!(c.core.allow_empty_initial_commit);
        assert_eq!(c.core.compression_level, 3);
        assert!(c.commit_policy().allow_empty_initial);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = RepoConfig::from_toml_str(
            r#"
            [user]
            name = "Ada"

            [core]
            allow_empty_initial_commit = false
            "#,
        )
        .unwrap();
        assert_eq!(c.user.name, "Ada");
        assert_eq!(c.user.email, "twig@localhost");
        assert_eq!(c.core.default_branch, "main");
        assert!(!c.commit_policy().allow_empty_initial);
    }

    #[test]
    fn toml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = RepoConfig::default().with_user("Grace", "grace@example.com");
        config.save(&path).unwrap();
        assert_eq!(RepoConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepoConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RepoConfig::default());
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            RepoConfig::from_toml_str("[core]\ncompression_level = \"high\""),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn invalid_identity_fails_signature() {
        let config = RepoConfig::default().with_user("Eve <evil>", "e@x");
        assert!(matches!(config.signature(), Err(SdkError::Types(_))));
    }
}
