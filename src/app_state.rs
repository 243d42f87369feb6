use std::sync::Arc;

use crate::{
    config::Config,
    infrastructure::{
        Database, FileStore, IdGenerator, LocalFileStore, SqliteAssetRepository,
        SqlitePageRepository, SqliteSectionRepository, UploadStore,
    },
    services::{AssetLifecycle, AssetService, PageService, SectionService},
};

#[derive(Clone)]
pub struct AppState {
    pub pages: PageService,
    pub sections: SectionService,
    pub assets: AssetService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let database = Database::connect(&config.database).await?;
        database.init().await?;

        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.uploads.base_dir));
        Ok(Self::from_parts(&database, files, config))
    }

    /// Wire repositories and services over an existing database and file store
    pub fn from_parts(database: &Database, files: Arc<dyn FileStore>, config: Config) -> Self {
        let ids = Arc::new(IdGenerator::new(config.server.node_id));
        let pool = database.pool().clone();

        let pages = Arc::new(SqlitePageRepository::new(pool.clone(), ids.clone()));
        let sections = Arc::new(SqliteSectionRepository::new(pool.clone(), ids.clone()));
        let assets = Arc::new(SqliteAssetRepository::new(pool, ids));

        let uploads = UploadStore::new(files.clone(), config.uploads.max_file_size);
        let lifecycle = AssetLifecycle::new(files, sections.clone());

        Self {
            pages: PageService::new(pages.clone(), sections.clone(), lifecycle.clone()),
            sections: SectionService::new(
                sections.clone(),
                pages,
                uploads.clone(),
                lifecycle.clone(),
            ),
            assets: AssetService::new(assets, sections, uploads, lifecycle),
            config,
        }
    }
}
