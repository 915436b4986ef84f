use std::path::{Path, PathBuf};

use {serde_json::Value, tracing::debug};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::UsersConfig,
    validate::validate_users_config,
};

/// Standard users config file names, checked in order.
const USERS_FILENAMES: &[&str] = &[
    "users.json",
    "users.json5",
    "users.yaml",
    "users.yml",
    "users.toml",
];

/// On-disk format of a users config, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    /// JSON with comments and trailing commas, as the gateway's own config.
    Json5,
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "json5" => Ok(Self::Json5),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(Error::message(format!(
                "unsupported users config format: .{other}"
            ))),
        }
    }
}

/// Returns the user-global config directory (`~/.config/clawmux/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "clawmux").map(|d| d.config_dir().to_path_buf())
}

/// First standard users config file in `dir`.
pub fn find_users_config_in(dir: &Path) -> Option<PathBuf> {
    USERS_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Discover a users config.
///
/// Search order:
/// 1. `./users.{json,json5,yaml,yml,toml}` (project-local)
/// 2. `~/.config/clawmux/users.{json,json5,yaml,yml,toml}` (user-global)
pub fn find_users_config() -> Option<PathBuf> {
    let found = find_users_config_in(Path::new("."))
        .or_else(|| config_dir().and_then(|dir| find_users_config_in(&dir)));
    match &found {
        Some(path) => debug!(path = %path.display(), "found users config"),
        None => debug!("no users config found"),
    }
    found
}

/// Load, env-substitute, parse and validate a users config file.
pub fn load_users_config(path: &Path) -> Result<UsersConfig> {
    let format = ConfigFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), ?format, "loading users config");
    parse_users_config(&raw, format)
}

/// Parse and validate a users config from a string.
pub fn parse_users_config(raw: &str, format: ConfigFormat) -> Result<UsersConfig> {
    let value = parse_value(&substitute_env(raw), format)?;
    validate_users_config(&value)
}

fn parse_value(raw: &str, format: ConfigFormat) -> Result<Value> {
    let value: Value = match format {
        ConfigFormat::Json => serde_json::from_str(raw)?,
        ConfigFormat::Json5 => json5::from_str(raw)?,
        ConfigFormat::Yaml => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            serde_json::to_value(v)?
        },
        ConfigFormat::Toml => {
            let v: toml::Value = toml::from_str(raw)?;
            serde_json::to_value(v)?
        },
    };
    Ok(value)
}
