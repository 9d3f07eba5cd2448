use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::app::DEFAULT_MAX_BODY_BYTES;

/// Environment variable prefix for configuration overrides (`DOCSITE_PORT`, ...).
pub const ENV_PREFIX: &str = "DOCSITE";

/// Configuration file read when no `--config` is given. Optional.
pub const DEFAULT_CONFIG_FILE: &str = "docsite.toml";

/// Server configuration.
///
/// Layered, lowest precedence first: built-in defaults, the TOML config file,
/// `DOCSITE_*` environment variables, and the plain `PORT` variable.
/// Command-line flags are applied on top by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory that static paths are resolved against.
    pub root: PathBuf,
    /// Document collection, relative to `root` unless absolute.
    pub docs_file: PathBuf,
    /// Feedback log, relative to `root` unless absolute.
    pub feedback_file: PathBuf,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (file, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut builder = ::config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("root", ".")?
            .set_default("docs_file", "data/docs.json")?
            .set_default("feedback_file", "data/feedback.json")?
            .set_default("max_body_bytes", DEFAULT_MAX_BODY_BYTES as i64)?
            .add_source(
                ::config::File::from(file.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX));

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("port", port)?;
        }

        builder
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// The site root as an absolute path.
    pub fn site_root(&self) -> anyhow::Result<PathBuf> {
        if self.root.is_absolute() {
            return Ok(self.root.clone());
        }
        let cwd = std::env::current_dir().context("Failed to read the working directory")?;
        Ok(cwd.join(&self.root))
    }

    pub fn docs_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.site_root()?.join(&self.docs_file))
    }

    pub fn feedback_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.site_root()?.join(&self.feedback_file))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
