//! Content factory for loading combat data from a data directory.

use std::path::{Path, PathBuf};

use melee_core::{CombatConfig, CombatTables};

use crate::loaders::{
    Bestiary, BestiaryLoader, ConfigLoader, LoadResult, Scenario, ScenarioLoader, TablesLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tables.ron
/// ├── bestiary.ron
/// └── scenarios/
///     ├── duel.ron
///     └── hydra_den.ron
/// ```
///
/// `config.toml` and `tables.ron` are optional; the built-in values are used
/// when they are missing.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tunables from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load combat tables from `tables.ron`.
    pub fn load_tables(&self) -> LoadResult<CombatTables> {
        let path = self.data_dir.join("tables.ron");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no tables file, using standard tables");
            return Ok(CombatTables::standard());
        }
        TablesLoader::load(&path)
    }

    /// Load creature templates from `bestiary.ron`.
    pub fn load_bestiary(&self) -> LoadResult<Bestiary> {
        BestiaryLoader::load(&self.data_dir.join("bestiary.ron"))
    }

    /// Load `scenarios/{name}.ron` against `bestiary`.
    pub fn load_scenario(&self, name: &str, bestiary: &Bestiary) -> LoadResult<Scenario> {
        let path = self.scenario_dir().join(format!("{}.ron", name));
        ScenarioLoader::load(&path, bestiary)
    }

    /// Names of the scenarios shipped in `scenarios/`, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.scenario_dir();
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn scenario_dir(&self) -> PathBuf {
        self.data_dir.join("scenarios")
    }
}
