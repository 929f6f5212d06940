use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};
use paths::PathContext;
use serde::Deserialize;
use signature::Branding;

/// Prefix of the environment overrides, e.g. `SIGNATURE_LOG_FILTER` or
/// `SIGNATURE_BRANDING__BRAND_NAME`.
pub const ENV_PREFIX: &str = "SIGNATURE";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where the form snapshot is kept; defaults to the platform data dir.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// `RUST_LOG`-style directives.
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default)]
    pub branding: Branding,
}

impl Config {
    /// Layers, lowest first: built-in defaults, `<project>/signature.toml`,
    /// the `--config` file, `SIGNATURE_*` environment variables.
    pub fn load(paths: &PathContext, explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let default_file = paths.config_file();
        let mut builder = config::Config::builder().add_source(
            File::from(default_file.as_path())
                .format(FileFormat::Toml)
                .required(false),
        );

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        } else if !default_file.exists() {
            tracing::debug!("no configuration file at {}", default_file.display());
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn store_dir(&self, paths: &PathContext) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| paths.store_dir())
    }
}
