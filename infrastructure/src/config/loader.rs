//! Configuration file loader with multi-source merging

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::file_config::FileConfig;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TABLEPICK_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./tablepick.toml` or `./.tablepick.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/tablepick/config.toml`
    /// 5. Fallback: `~/.config/tablepick/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Global config (XDG or fallback)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        // Project-level config files (check both names)
        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // Explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables win over everything
        // (e.g. TABLEPICK_PLACES__API_KEY → places.api_key)
        figment = figment.merge(Env::prefixed("TABLEPICK_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/tablepick/config.toml if set,
    /// otherwise falls back to ~/.config/tablepick/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tablepick").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["tablepick.toml", ".tablepick.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.behavior.to_behavior().deck_size, 10);
        assert!(config.places.api_key.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("tablepick"));
    }

    #[test]
    fn test_env_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            // Keep a real global config file out of the merge
            let jail_dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", jail_dir);
            jail.create_file("tablepick.toml", "[behavior]\ndeck_size = 11\nmax_tie_rounds = 9")?;
            jail.set_env("TABLEPICK_BEHAVIOR__DECK_SIZE", "12");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            let behavior = config.behavior.to_behavior();
            // Env wins over the file; untouched file keys still apply
            assert_eq!(behavior.deck_size, 12);
            assert_eq!(behavior.max_tie_rounds, 9);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[behavior]\nmax_tie_rounds = 7\n\n[profile]\ndisplay_name = \"Ben\""
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.behavior.to_behavior().max_tie_rounds, 7);
        assert_eq!(config.profile.display_name.as_deref(), Some("Ben"));
        // Untouched sections keep their defaults
        assert_eq!(config.behavior.to_behavior().deck_size, 10);
    }
}
