// Subcommand handlers. main.rs parses arguments and dispatches here; each
// module owns one subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use hydrad_lib::{resolve_config_path, source_for_path, ConfigLoader, EnvSource};

pub mod export;
pub mod show;
pub mod validate;

/// Global options that decide where the configuration is read from.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub config: Option<PathBuf>,
    pub use_env: bool,
    pub strict: bool,
}

impl LoadOptions {
    /// Build the layered loader: the configuration file, then `HYDRAD_*`
    /// overrides unless disabled. Returns the loader and the file path.
    pub fn loader(&self) -> Result<(ConfigLoader, PathBuf)> {
        let path = resolve_config_path(self.config.as_deref())
            .context("failed to resolve the configuration file location")?;
        if !path.exists() {
            anyhow::bail!(
                "configuration file not found at {}; pass --config or set HYDRAD_CONFIG",
                path.display()
            );
        }
        let source = source_for_path(&path, self.strict)
            .with_context(|| format!("cannot read configuration from {}", path.display()))?;
        debug!(
            path = %path.display(),
            strict = self.strict,
            env = self.use_env,
            "configuration source"
        );

        let mut loader = ConfigLoader::new().with_boxed_source(source);
        if self.use_env {
            loader = loader.with_source(EnvSource::from_process());
        }
        Ok((loader, path))
    }
}
