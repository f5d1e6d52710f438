use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{env_subst::substitute_env, schema::HeraldConfig};

/// Config locations checked in the working directory, in order. The first
/// entry is the historical deployment layout.
const CONFIG_CANDIDATES: &[&str] = &[
    "config/main/config.json",
    "herald.json",
    "herald.toml",
    "herald.yaml",
    "herald.yml",
];

/// File names checked in the user config directory.
const USER_CONFIG_FILENAMES: &[&str] = &["herald.json", "herald.toml", "herald.yaml", "herald.yml"];

/// Load config from the given path (format chosen by extension).
pub fn load_config(path: &Path) -> anyhow::Result<HeraldConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load the explicit config file, or discover one in the standard locations.
///
/// A missing or broken config file is not fatal: the failure is logged and
/// the defaults (an empty address book) are returned.
pub fn discover_and_load(explicit: Option<&Path>) -> HeraldConfig {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file(),
    };

    let Some(path) = path else {
        warn!("no config file found, starting with an empty address book");
        return HeraldConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => {
            info!(
                path = %path.display(),
                addresses = cfg.addresses.len(),
                "config loaded"
            );
            cfg
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            HeraldConfig::default()
        },
    }
}

/// Find the first config file in standard locations.
///
/// Search order:
/// 1. `./config/main/config.json`, `./herald.{json,toml,yaml,yml}`
/// 2. `~/.config/herald/herald.{json,toml,yaml,yml}`
pub fn find_config_file() -> Option<PathBuf> {
    find_in(Path::new("."), CONFIG_CANDIDATES).or_else(|| {
        let dir = user_config_dir()?;
        find_in(&dir, USER_CONFIG_FILENAMES)
    })
}

fn find_in(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|p| p.exists())
}

/// `~/.config/herald/` on all platforms.
fn user_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("herald"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<HeraldConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match ext {
        "json" => Ok(serde_json::from_str(raw)?),
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
