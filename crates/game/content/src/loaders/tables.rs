//! Combat tables loader.
//!
//! A tables file only lists the rows it changes; everything else keeps the
//! built-in values from [`CombatTables::standard`].

use std::path::Path;

use melee_core::{CombatTables, DamageFlavour, FlavourProfile, WeaponClass, WeaponProfile};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Overrides layered on top of the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesSpec {
    pub flavours: Vec<(DamageFlavour, FlavourProfile)>,
    pub weapons: Vec<(WeaponClass, WeaponProfile)>,
}

impl TablesSpec {
    /// Applies the overrides to `tables`; later rows win.
    pub fn apply(&self, tables: &mut CombatTables) {
        for &(flavour, profile) in &self.flavours {
            tables.set_flavour(flavour, profile);
        }
        for &(class, profile) in &self.weapons {
            tables.set_weapon(class, profile);
        }
    }

    fn validate(&self) -> LoadResult<()> {
        for (flavour, profile) in &self.flavours {
            if profile.resistible_percent > 100 {
                anyhow::bail!(
                    "flavour {:?}: resistible_percent {} is over 100",
                    flavour,
                    profile.resistible_percent
                );
            }
        }
        for (class, profile) in &self.weapons {
            if profile.melee && profile.reach == 0 {
                anyhow::bail!("weapon class {:?}: melee reach must be at least 1", class);
            }
        }
        Ok(())
    }
}

/// Loader for combat tables from RON files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load the standard tables with the file's overrides applied.
    pub fn load(path: &Path) -> LoadResult<CombatTables> {
        let content = read_file(path)?;
        let tables = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded combat tables");
        Ok(tables)
    }

    pub fn parse(content: &str) -> LoadResult<CombatTables> {
        let spec: TablesSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables RON: {}", e))?;
        spec.validate()?;

        let mut tables = CombatTables::standard();
        spec.apply(&mut tables);
        Ok(tables)
    }
}
