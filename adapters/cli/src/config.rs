//! Optional TOML configuration: catalog overrides and session rules.
//!
//! A missing file is not an error — the built-in catalog defaults apply. A
//! present-but-malformed file is fatal before the world is constructed.

use std::fs;
use std::path::Path;

use rampart_core::{Catalog, CatalogError, GameRules};
use serde::Deserialize;
use thiserror::Error;

/// Reasons the configuration file could not be turned into a valid catalog.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid catalog entry: {0:?}")]
    InvalidCatalog(CatalogError),
    #[error("invalid game rules: {0}")]
    InvalidRules(&'static str),
}

/// Top-level shape of the configuration file. Every section is optional and
/// falls back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigFile {
    pub(crate) catalog: Catalog,
    pub(crate) rules: GameRules,
}

/// Loads and validates a configuration file.
pub(crate) fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;
    validate(&file)?;
    Ok(file)
}

pub(crate) fn validate(file: &ConfigFile) -> Result<(), ConfigError> {
    file.catalog.validate().map_err(ConfigError::InvalidCatalog)?;

    if file.rules.total_waves == 0 {
        return Err(ConfigError::InvalidRules("total_waves must be at least 1"));
    }
    if file.rules.starting_lives == 0 {
        return Err(ConfigError::InvalidRules(
            "starting_lives must be at least 1",
        ));
    }
    if !file.rules.wave_cooldown.is_finite() || file.rules.wave_cooldown < 0.0 {
        return Err(ConfigError::InvalidRules(
            "wave_cooldown must be a non-negative number of seconds",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate, ConfigError, ConfigFile};

    #[test]
    fn defaults_validate() {
        assert!(validate(&ConfigFile::default()).is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [rules]
            starting_balance = 750

            [catalog.towers.basic]
            cost = 120
            damage = 12.0
            range = 160.0
            cooldown = 0.9
            "#,
        )
        .expect("partial config parses");

        assert_eq!(file.rules.starting_balance, 750);
        assert_eq!(file.rules.starting_lives, 100);
        assert_eq!(file.catalog.towers.basic.cost, 120);
        assert_eq!(file.catalog.towers.sniper.cost, 250);
        assert!(validate(&file).is_ok());
    }

    #[test]
    fn zero_wave_sessions_are_rejected() {
        let mut file = ConfigFile::default();
        file.rules.total_waves = 0;
        assert!(matches!(
            validate(&file),
            Err(ConfigError::InvalidRules(_))
        ));
    }

    #[test]
    fn malformed_catalogs_are_fatal() {
        let mut file = ConfigFile::default();
        file.catalog.enemies.boss.health = -1.0;
        assert!(matches!(
            validate(&file),
            Err(ConfigError::InvalidCatalog(_))
        ));
    }
}
