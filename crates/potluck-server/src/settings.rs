use std::{
    env, fs,
    path::{Path, PathBuf},
};

use potluck_core::UnitPolicy;
use serde::Deserialize;

use crate::{db::SurrealdbCfg, error::Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/services.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: HttpCfg,
    #[serde(default)]
    pub store: StoreCfg,
    pub surrealdb: Option<SurrealdbCfg>,
    #[serde(default)]
    pub shopping_list: ShoppingListCfg,
    #[serde(default)]
    pub seed: SeedCfg,
}

#[derive(Debug, Deserialize)]
pub struct HttpCfg {
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Surrealdb,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreCfg {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShoppingListCfg {
    /// Reject carts whose recipes measure one ingredient in different units
    pub strict_units: bool,
    /// Attachment name of the downloaded list
    pub filename: String,
}

impl Default for ShoppingListCfg {
    fn default() -> Self {
        Self {
            strict_units: false,
            filename: "shopping_cart.txt".to_string(),
        }
    }
}

impl ShoppingListCfg {
    pub fn unit_policy(&self) -> UnitPolicy {
        if self.strict_units {
            UnitPolicy::Strict
        } else {
            UnitPolicy::LastSeen
        }
    }
}

/// JSON files loaded into an empty catalog at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedCfg {
    pub tags_path: Option<PathBuf>,
    pub ingredients_path: Option<PathBuf>,
}

impl Settings {
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(config_path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let r = toml::from_str(raw)?;
        Ok(r)
    }

    /// `POTLUCK_CONFIG` if set, the default path otherwise
    pub fn config_path() -> PathBuf {
        env::var_os("POTLUCK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = Settings::parse("[http]\nport = 8080\n").unwrap();

        assert_eq!(settings.http.port, 8080);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert!(settings.surrealdb.is_none());
        assert_eq!(settings.shopping_list.filename, "shopping_cart.txt");
        assert_eq!(settings.shopping_list.unit_policy(), UnitPolicy::LastSeen);
        assert!(settings.seed.tags_path.is_none());
    }

    #[test]
    fn test_full_settings() {
        let raw = r#"
            [http]
            port = 9000

            [store]
            backend = "surrealdb"

            [surrealdb]
            host = "127.0.0.1"
            port = 8000
            username = "root"
            password = "root"
            namespace = "potluck"
            database = "recipes"

            [shopping_list]
            strict_units = true

            [seed]
            ingredients_path = "data/ingredients.json"
        "#;
        let settings = Settings::parse(raw).unwrap();

        assert_eq!(settings.store.backend, StoreBackend::Surrealdb);
        assert_eq!(settings.surrealdb.unwrap().namespace, "potluck");
        assert_eq!(settings.shopping_list.unit_policy(), UnitPolicy::Strict);
        // Unset keys inside a present table still default
        assert_eq!(settings.shopping_list.filename, "shopping_cart.txt");
        assert_eq!(
            settings.seed.ingredients_path,
            Some(PathBuf::from("data/ingredients.json"))
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let raw = "[http]\nport = 1\n[store]\nbackend = \"redis\"\n";
        assert!(Settings::parse(raw).is_err());
    }
}
