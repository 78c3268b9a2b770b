//! Combat configuration loader.

use std::path::Path;

use melee_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their built-in defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded combat config");
        Ok(config)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &CombatConfig) -> LoadResult<()> {
        if config.max_monster_attack_slots == 0 {
            anyhow::bail!("max_monster_attack_slots must be at least 1");
        }
        if config.kite_chance == 0 || config.mount_absorb_chance == 0 {
            anyhow::bail!("one-in-N chances must be at least 1");
        }
        if config.base_hit_chance > 100 {
            anyhow::bail!(
                "base_hit_chance is a percentage, got {}",
                config.base_hit_chance
            );
        }
        Ok(())
    }
}
