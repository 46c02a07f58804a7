//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.feeltok/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::layout::{CardHeights, DEFAULT_COLUMN_COUNT};
use crate::core::model::{FeedView, Viewer};

/// Largest accepted explore grid column count.
pub const MAX_COLUMN_COUNT: usize = 16;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeelTokConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_view: Option<FeedView>,
    pub column_count: Option<usize>,
    pub retract_like_notifications: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ViewerConfig {
    pub id: Option<String>,
    pub handle: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub base_height: Option<u32>,
    pub text_height: Option<u32>,
    pub media_height: Option<u32>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub view: FeedView,
    pub column_count: usize,
    pub retract_like_notifications: bool,
    pub backend_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub viewer: Viewer,
    pub card_heights: CardHeights,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub view: Option<FeedView>,
    pub columns: Option<usize>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A required setting has no value anywhere in the hierarchy.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.feeltok/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".feeltok").join("config.toml"))
}

/// Load config from `~/.feeltok/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FeelTokConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FeelTokConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FeelTokConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FeelTokConfig::default());
    }

    let contents = fs::read_to_string(&path)?;
    let config: FeelTokConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# FeelTok Configuration
# All settings are optional unless marked required.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_view = "home"              # "home" or "explore"
# column_count = 2                   # explore grid columns (1-16)
# retract_like_notifications = true  # unliking removes your own like notification

# [backend]
# url = "https://your-project.supabase.co"   # required, or FEELTOK_BACKEND_URL
# anon_key = "eyJ..."                        # required, or FEELTOK_ANON_KEY
# access_token = "eyJ..."                    # or FEELTOK_ACCESS_TOKEN

# [viewer]
# id = "your-user-id"                # required, or FEELTOK_VIEWER_ID
# handle = "you"                     # or FEELTOK_VIEWER_HANDLE

# [layout]
# base_height = 150
# text_height = 30
# media_height = 200
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FeelTokConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an explicit environment lookup.
pub fn resolve_with_env<F>(
    config: &FeelTokConfig,
    cli: &CliOverrides,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // View: CLI → config → default
    let view = cli
        .view
        .or(config.general.default_view)
        .unwrap_or_default();

    let column_count = cli
        .columns
        .or(config.general.column_count)
        .unwrap_or(DEFAULT_COLUMN_COUNT);
    if !(1..=MAX_COLUMN_COUNT).contains(&column_count) {
        return Err(ConfigError::Invalid(format!(
            "column_count must be between 1 and {MAX_COLUMN_COUNT}, got {column_count}"
        )));
    }

    // Backend: env → config
    let backend_url = non_empty("FEELTOK_BACKEND_URL")
        .or_else(|| config.backend.url.clone())
        .ok_or(ConfigError::Missing("backend.url"))?;
    let anon_key = non_empty("FEELTOK_ANON_KEY")
        .or_else(|| config.backend.anon_key.clone())
        .ok_or(ConfigError::Missing("backend.anon_key"))?;
    let access_token =
        non_empty("FEELTOK_ACCESS_TOKEN").or_else(|| config.backend.access_token.clone());

    let viewer_id = non_empty("FEELTOK_VIEWER_ID")
        .or_else(|| config.viewer.id.clone())
        .ok_or(ConfigError::Missing("viewer.id"))?;
    // Handle falls back to the id so comments always have an author
    let viewer_handle = non_empty("FEELTOK_VIEWER_HANDLE")
        .or_else(|| config.viewer.handle.clone())
        .unwrap_or_else(|| viewer_id.clone());

    let defaults = CardHeights::default();
    let card_heights = CardHeights {
        base: config.layout.base_height.unwrap_or(defaults.base),
        text: config.layout.text_height.unwrap_or(defaults.text),
        media: config.layout.media_height.unwrap_or(defaults.media),
    };

    Ok(ResolvedConfig {
        view,
        column_count,
        retract_like_notifications: config.general.retract_like_notifications.unwrap_or(true),
        backend_url,
        anon_key,
        access_token,
        viewer: Viewer {
            id: viewer_id,
            handle: viewer_handle,
        },
        card_heights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn minimal() -> FeelTokConfig {
        FeelTokConfig {
            backend: BackendConfig {
                url: Some("https://db.example".to_string()),
                anon_key: Some("anon".to_string()),
                access_token: None,
            },
            viewer: ViewerConfig {
                id: Some("u1".to_string()),
                handle: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_uses_defaults() {
        let resolved = resolve_with_env(&minimal(), &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.view, FeedView::Home);
        assert_eq!(resolved.column_count, DEFAULT_COLUMN_COUNT);
        assert!(resolved.retract_like_notifications);
        assert_eq!(resolved.card_heights, CardHeights::default());
        // Handle falls back to id
        assert_eq!(resolved.viewer.handle, "u1");
        assert!(resolved.access_token.is_none());
    }

    #[test]
    fn test_resolve_missing_required() {
        let err = resolve_with_env(&FeelTokConfig::default(), &CliOverrides::default(), no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("backend.url")));

        let mut config = minimal();
        config.viewer.id = None;
        let err = resolve_with_env(&config, &CliOverrides::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("viewer.id")));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("FEELTOK_BACKEND_URL", "https://env.example"),
            ("FEELTOK_VIEWER_HANDLE", "envhandle"),
            ("FEELTOK_ACCESS_TOKEN", ""),
        ]
        .into_iter()
        .collect();
        let resolved = resolve_with_env(&minimal(), &CliOverrides::default(), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(resolved.backend_url, "https://env.example");
        assert_eq!(resolved.viewer.handle, "envhandle");
        // Blank env values are ignored
        assert!(resolved.access_token.is_none());
    }

    #[test]
    fn test_cli_wins_over_file() {
        let mut config = minimal();
        config.general.default_view = Some(FeedView::Home);
        config.general.column_count = Some(4);
        let cli = CliOverrides {
            view: Some(FeedView::Explore),
            columns: Some(3),
        };
        let resolved = resolve_with_env(&config, &cli, no_env).unwrap();
        assert_eq!(resolved.view, FeedView::Explore);
        assert_eq!(resolved.column_count, 3);
    }

    #[test]
    fn test_zero_columns_rejected() {
        let cli = CliOverrides {
            view: None,
            columns: Some(0),
        };
        assert!(matches!(
            resolve_with_env(&minimal(), &cli, no_env),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_oversized_column_count_rejected() {
        let cli = CliOverrides {
            view: None,
            columns: Some(65537),
        };
        assert!(matches!(
            resolve_with_env(&minimal(), &cli, no_env),
            Err(ConfigError::Invalid(msg)) if msg.contains("65537")
        ));

        let cli = CliOverrides {
            view: None,
            columns: Some(MAX_COLUMN_COUNT),
        };
        let resolved = resolve_with_env(&minimal(), &cli, no_env).unwrap();
        assert_eq!(resolved.column_count, MAX_COLUMN_COUNT);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
default_view = "explore"
column_count = 3
retract_like_notifications = false

[backend]
url = "https://db.example"
anon_key = "anon"

[viewer]
id = "u9"
handle = "nine"

[layout]
media_height = 240
"#;
        let config: FeelTokConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_view, Some(FeedView::Explore));
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.column_count, 3);
        assert!(!resolved.retract_like_notifications);
        assert_eq!(resolved.viewer.handle, "nine");
        assert_eq!(resolved.card_heights.media, 240);
        assert_eq!(resolved.card_heights.base, 150);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: FeelTokConfig = toml::from_str("[viewer]\nid = \"x\"\n").unwrap();
        assert_eq!(config.viewer.id.as_deref(), Some("x"));
        assert!(config.backend.url.is_none());
        assert!(config.general.column_count.is_none());
    }
}
