//! Shared helpers for arena commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::{Term, style};
use melee_content::{Bestiary, ContentFactory, Scenario};
use melee_core::{CombatConfig, CombatTables, EntityId, Prompter};
use tracing_subscriber::EnvFilter;

const DATA_DIR_ENV: &str = "MELEE_DATA_DIR";

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolves the content directory: flag, then environment, then `./data`.
pub fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Everything a round needs from the content directory.
pub struct Content {
    pub config: CombatConfig,
    pub tables: CombatTables,
    pub bestiary: Bestiary,
}

impl Content {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        Ok(Self {
            config: factory.load_config()?,
            tables: factory.load_tables()?,
            bestiary: factory.load_bestiary()?,
        })
    }

    pub fn scenario(&self, data_dir: &Path, name: &str) -> Result<Scenario> {
        ContentFactory::new(data_dir).load_scenario(name, &self.bestiary)
    }
}

/// Finds a combatant by name, listing the choices when it is missing.
pub fn lookup(scenario: &Scenario, name: &str) -> Result<EntityId> {
    scenario.find(name).ok_or_else(|| {
        let names: Vec<_> = scenario.field.iter().map(|c| c.name.as_str()).collect();
        anyhow::anyhow!(
            "no combatant called '{}' in scenario '{}' (have: {})",
            name,
            scenario.name,
            names.join(", ")
        )
    })
}

/// Display name for an id, falling back to the raw id.
pub fn name_of(scenario: &Scenario, id: EntityId) -> String {
    scenario
        .field
        .get(id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}

/// Asks confirmation questions on the terminal, or answers yes when `assume_yes`.
pub struct TermPrompter {
    term: Term,
    assume_yes: bool,
}

impl TermPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            term: Term::stderr(),
            assume_yes,
        }
    }
}

impl Prompter for TermPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes || !self.term.is_term() {
            return true;
        }
        let _ = self
            .term
            .write_str(&format!("{} {} ", style(question).yellow(), style("[y/N]").dim()));
        let answer = self.term.read_char().unwrap_or('n');
        let _ = self.term.write_line("");
        matches!(answer, 'y' | 'Y')
    }
}
