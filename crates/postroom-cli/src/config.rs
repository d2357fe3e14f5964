//! Layered configuration: optional file, then `POSTROOM_*` environment variables

use anyhow::Context;
use config::{Config, Environment, File};
use postroom_mailgun::MailgunSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostroomConfig {
    #[serde(default)]
    pub mailgun: MailgunSettings,
}

impl PostroomConfig {
    /// `~/.postroom/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".postroom").join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist; the default path is optional.
    /// Environment variables such as `POSTROOM_MAILGUN__API_KEY` override
    /// file values.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("POSTROOM")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().context("Failed to read configuration")?;
        config
            .try_deserialize()
            .context("Invalid configuration values")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[mailgun]
api_key = "key-from-file"
working_domain = "mg.example.com"
api_endpoint = "https://api.eu.mailgun.net"
debug_mode = true
tracking_clicks = false
"#,
        );

        let config = PostroomConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.mailgun.api_key, "key-from-file");
        assert_eq!(config.mailgun.working_domain, "mg.example.com");
        assert_eq!(config.mailgun.api_endpoint, "https://api.eu.mailgun.net");
        assert!(config.mailgun.debug_mode);
        assert_eq!(config.mailgun.tracking_clicks, Some(false));
        assert_eq!(config.mailgun.tracking_opens, None);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let file = write_config("# nothing configured yet\n");

        let config = PostroomConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.mailgun.working_domain, "_sender");
        assert_eq!(
            config.mailgun.api_endpoint,
            postroom_mailgun::DEFAULT_API_ENDPOINT
        );
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = PostroomConfig::load(Some(Path::new("/nonexistent/postroom.toml")));
        assert!(result.is_err());
    }
}
