use baboon_core::{BaboonConfig, Result};
use std::path::{Path, PathBuf};

/// `<config dir>/baboon/config.json`, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("baboon")
        .join("config.json")
}

/// Endpoint overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub wallet_url: Option<String>,
}

/// An explicit `--config` must exist; the default location is optional.
pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<BaboonConfig> {
    let mut config = match path {
        Some(path) => BaboonConfig::from_file(path)?,
        None => BaboonConfig::load_or_default(&default_config_path())?,
    };

    if let Some(rpc_url) = overrides.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(wallet_url) = overrides.wallet_url {
        config.wallet_url = wallet_url;
    }

    config.validate()?;
    Ok(config)
}
