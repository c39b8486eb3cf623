//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [energy]
            regen_per_turn = 15

            [rewards]
            rare_item = "megalixir"
            "#,
        )
        .unwrap();

        assert_eq!(config.energy.regen_per_turn, 15);
        assert_eq!(config.energy.max, 100);
        assert_eq!(config.rewards.rare_item, "megalixir");
        assert_eq!(config.raid, BattleConfig::default().raid);
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), BattleConfig::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(ConfigLoader::parse("[crit]\nbase_chance = \"high\"").is_err());
    }
}
