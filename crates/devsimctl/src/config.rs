use std::time::Duration;

use camino::Utf8Path;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

use crate::defaults;

/// Settings read from `config.toml`. Every field is optional; command-line
/// flags take precedence.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub api: Option<Url>,
    pub registry: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub release_handles: Option<bool>,
}

impl Config {
    /// Loads the config at `path`, or at the default location when `path`
    /// is `None`. Only a missing default file is tolerated.
    pub async fn load(path: Option<&Utf8Path>) -> eyre::Result<Self> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => match defaults::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .await
            .wrap_err_with(|| format!("unable to read config file `{path}`"))?;

        let config = toml::from_str(&contents)
            .wrap_err_with(|| format!("invalid config file `{path}`"))?;

        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use camino::Utf8PathBuf;

    use super::*;

    #[tokio::test]
    async fn test_load_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api = \"http://sim.example:10000\"\nregistry = \"Home\"\nrequest_timeout_secs = 5"
        )
        .unwrap();

        let path = Utf8PathBuf::from_path_buf(file.path().to_owned()).unwrap();
        let config = Config::load(Some(&path)).await.unwrap();

        assert_eq!(config.api.as_ref().unwrap().as_str(), "http://sim.example:10000/");
        assert_eq!(config.registry.as_deref(), Some("Home"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.release_handles, None);
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.toml")).unwrap();

        assert!(Config::load(Some(&path)).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://sim.example\"").unwrap();

        let path = Utf8PathBuf::from_path_buf(file.path().to_owned()).unwrap();

        assert!(Config::load(Some(&path)).await.is_err());
    }
}
