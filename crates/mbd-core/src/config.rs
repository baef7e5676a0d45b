use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default releases feed: the niXman mingw-builds binaries repository.
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/niXman/mingw-builds-binaries/releases";

/// Global configuration loaded from `~/.config/mbd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbdConfig {
    /// URL of the releases metadata feed.
    pub releases_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Connect timeout in seconds for metadata fetches and downloads.
    pub connect_timeout_secs: u64,
    /// Optional cap on followed redirects.
    #[serde(default)]
    pub max_redirects: Option<u32>,
}

impl Default for MbdConfig {
    fn default() -> Self {
        Self {
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            user_agent: format!("mbd/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 30,
            max_redirects: None,
        }
    }
}

impl MbdConfig {
    /// Redirect cap to hand to curl (library default when unset).
    pub fn redirect_limit(&self) -> u32 {
        self.max_redirects.unwrap_or(10)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mbd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MbdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MbdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MbdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
