mod session;
mod settings;

pub use session::{SessionContext, SessionRef};
pub use settings::{
    ApiSettings, Business, Config, DisplaySettings, PolicySettings, ReportSettings, Theme,
};

use crate::error::{CajaError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.toml";

/// Get the config directory path (~/.caja/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "caja") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.caja/
    let home = dirs_home().ok_or_else(|| {
        CajaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".caja"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the report directory; relative paths live under the config dir.
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        cfg_dir.join(expanded)
    }
}

pub fn ensure_initialized(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(CajaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Load the main config.toml
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Err(CajaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| CajaError::ConfigParse { path, source: e })
}

/// Load session.toml; `None` when nobody is logged in.
pub fn load_session(cfg_dir: &Path) -> Result<Option<SessionRef>> {
    let path = cfg_dir.join(SESSION_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| CajaError::ConfigParse { path, source: e })
}

/// Like [`load_session`], but a missing session is an error.
pub fn require_session(cfg_dir: &Path) -> Result<SessionRef> {
    load_session(cfg_dir)?.ok_or(CajaError::NotLoggedIn)
}

/// Save session.toml
pub fn save_session(cfg_dir: &Path, session: &SessionRef) -> Result<()> {
    let path = cfg_dir.join(SESSION_FILE);
    let content = toml::to_string_pretty(session).map_err(|e| CajaError::ConfigWrite {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(&path, content)?;
    debug!(path = %path.display(), "session reference saved");
    Ok(())
}

/// Remove session.toml. Returns whether a session was present.
pub fn clear_session(cfg_dir: &Path) -> Result<bool> {
    let path = cfg_dir.join(SESSION_FILE);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    debug!(path = %path.display(), "session reference cleared");
    Ok(true)
}

/// Write the template config into a fresh directory.
pub fn write_template(cfg_dir: &Path) -> Result<()> {
    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[business]
name = "Mi Negocio"
# ruc = "20123456789"          # optional, printed on closure reports
# address = "Av. Principal 123" # optional

[api]
base_url = "http://localhost:8080/api"
timeout_secs = 10
# token = "..."                 # optional bearer token

[display]
currency_symbol = "S/"
thousands_separator = ","
decimal_separator = "."
fallback = "—"
theme = "light"                 # light | dark

[policy]
# How an administrator sees their own open cash session:
#   "owner"         -> may register income/expenses and close normally
#   "administrator" -> only the administrative closure is offered
admin_own_session = "owner"

[report]
output_dir = "reports"          # relative paths live under this directory
"#;
