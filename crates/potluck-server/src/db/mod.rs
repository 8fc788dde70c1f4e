mod schema;
mod store;

use std::sync::Arc;

use potluck_core::{MemoryStore, RecipeStore};
use serde::Deserialize;
use surrealdb::{
    Surreal,
    engine::remote::ws::{Client, Ws},
    opt::auth::Root,
};

pub use schema::create_tables;
pub use store::SurrealStore;

use crate::{
    error::{AppError, Result},
    settings::{Settings, StoreBackend},
};

/// Struct representing the Surrealdb configuration parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SurrealdbCfg {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

pub async fn connect(cfg: &SurrealdbCfg) -> Result<Surreal<Client>> {
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let db = Surreal::new::<Ws>(addr).await?;
    db.signin(Root {
        username: &cfg.username,
        password: &cfg.password,
    })
    .await?;
    db.use_ns(cfg.namespace.clone())
        .use_db(cfg.database.clone())
        .await?;
    Ok(db)
}

/// Opens the backend selected in the settings
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn RecipeStore>> {
    match settings.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Surrealdb => {
            let cfg = settings.surrealdb.as_ref().ok_or_else(|| {
                AppError::InvalidConfig(
                    "store.backend is `surrealdb` but the [surrealdb] section is missing".into(),
                )
            })?;
            tracing::info!("Connecting to SurrealDB at {}:{}...", cfg.host, cfg.port);
            let db = connect(cfg).await?;
            create_tables(&db).await?;
            tracing::info!("Database initialized successfully");
            Ok(Arc::new(SurrealStore::new(db)))
        }
    }
}
