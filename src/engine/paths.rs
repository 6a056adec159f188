// dashchat Engine: path resolution
//
// The config file lives at `<config_dir>/dashchat/config.toml`
// (`~/.config/dashchat/` on Linux, `~/Library/Application Support/dashchat/`
// on macOS). `DASHCHAT_CONFIG` replaces the whole path.

use crate::atoms::constants::ENV_CONFIG_PATH;
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "dashchat";
const CONFIG_FILE: &str = "config.toml";

/// `<config_dir>/dashchat/`, or `./dashchat/` when the platform has no
/// config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Resolved config file path, honoring `DASHCHAT_CONFIG`.
pub fn config_path() -> PathBuf {
    config_path_from(std::env::var_os(ENV_CONFIG_PATH))
}

fn config_path_from(override_path: Option<OsString>) -> PathBuf {
    match override_path {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => default_config_dir().join(CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let p = config_path_from(Some(OsString::from("/tmp/elsewhere.toml")));
        assert_eq!(p, PathBuf::from("/tmp/elsewhere.toml"));
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let p = config_path_from(Some(OsString::new()));
        assert!(p.ends_with("dashchat/config.toml"));
        assert!(config_path_from(None).ends_with("dashchat/config.toml"));
    }
}
