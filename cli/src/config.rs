//! Configuration for the inscribe CLI
//!
//! Handles loading `inscribe.toml`: the database to read, engine limits and
//! the entity schemas that can be queried.
//!
//! ```toml
//! [database]
//! path = "./inscriptions.db"
//!
//! [engine]
//! default_page_size = 20
//! max_page_size = 100
//!
//! [[entity]]
//! name = "inscriptions"
//! table = "inscription"
//! id_field = "id"
//! cursor_key = { primary = "block_number", secondary = "tx_index" }
//! columns = ["id", "block_number", "tx_index", "content_sha"]
//! fields = [
//!     { name = "block_number", kind = "numeric" },
//!     { name = "content_sha", kind = "text" },
//! ]
//! ```

use inscribe_core::{EngineConfig, EntitySchema};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "inscribe.toml";

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Database,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default, rename = "entity")]
    pub entities: Vec<EntitySchema>,

    /// Directory relative database paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Database {
    pub path: PathBuf,
}

impl Config {
    /// Load from the default path
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let mut config = Self::parse(&content).map_err(|e| match e {
            Error::Toml(e) => Error::Parse(path.into(), e),
            other => other,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content).map_err(Error::Toml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        let engine = &self.engine;
        if engine.default_page_size == 0 || engine.max_page_size == 0 {
            return Err(Error::Invalid("page sizes must be at least 1".into()));
        }
        if engine.default_page_size > engine.max_page_size {
            return Err(Error::Invalid(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                engine.default_page_size, engine.max_page_size
            )));
        }

        for (i, entity) in self.entities.iter().enumerate() {
            if self.entities[..i].iter().any(|e| e.name == entity.name) {
                return Err(Error::Invalid(format!("entity '{}' is declared twice", entity.name)));
            }
            validate_entity(entity)?;
        }
        Ok(())
    }

    /// Database path, resolved against the config file's directory.
    pub fn database_path(&self) -> PathBuf {
        if self.database.path.is_absolute() {
            self.database.path.clone()
        } else {
            self.base_dir.join(&self.database.path)
        }
    }

    pub fn entity(&self, name: &str) -> Result<&EntitySchema, Error> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::UnknownEntity {
                name: name.to_string(),
                available: self.entity_names().join(", "),
            })
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }
}

fn validate_entity(entity: &EntitySchema) -> Result<(), Error> {
    let err = |msg: String| Error::Invalid(format!("entity '{}': {msg}", entity.name));

    if entity.cursor_key.primary == entity.cursor_key.secondary {
        return Err(err("cursor_key columns must differ".into()));
    }
    for (i, field) in entity.fields.iter().enumerate() {
        if entity.fields[..i].iter().any(|f| f.name == field.name) {
            return Err(err(format!("field '{}' is declared twice", field.name)));
        }
    }
    for relation in &entity.relations {
        if relation.fields.is_empty() {
            return Err(err(format!("relation '{}' selects no fields", relation.name)));
        }
        if relation.name.contains('.') {
            return Err(err(format!("relation name '{}' may not contain '.'", relation.name)));
        }
    }
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown entity '{name}' (configured: {available})")]
    UnknownEntity { name: String, available: String },
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================
