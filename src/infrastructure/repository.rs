// Repository traits - storage seams for the services layer

use async_trait::async_trait;

use crate::core::PageId;
use crate::error::AppResult;
use crate::models::{Asset, AssetType, Entity, Page, Section};

/// Basic record operations shared by every entity
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<T>>;

    async fn find_by_id(&self, id: T::Id) -> AppResult<Option<T>>;

    async fn create(&self, input: T::Create) -> AppResult<T>;

    /// `Ok(None)` when no record has this id
    async fn update(&self, id: T::Id, changes: T::Update) -> AppResult<Option<T>>;

    /// `Ok(false)` when no record has this id
    async fn delete(&self, id: T::Id) -> AppResult<bool>;
}

#[async_trait]
pub trait PageRepository: Repository<Page> {
    /// Siblings are keyed by `(parent_id, slug)`; `None` means the root set
    async fn find_by_slug_and_parent(
        &self,
        slug: &str,
        parent_id: Option<PageId>,
    ) -> AppResult<Option<Page>>;

    async fn find_children(&self, parent_id: PageId) -> AppResult<Vec<Page>>;

    /// Root pages ordered by title
    async fn find_root_pages(&self) -> AppResult<Vec<Page>>;
}

#[async_trait]
pub trait SectionRepository: Repository<Section> {
    /// Sections of one page in ascending `order`
    async fn find_by_page_id(&self, page_id: PageId) -> AppResult<Vec<Section>>;
}

#[async_trait]
pub trait AssetRepository: Repository<Asset> {
    async fn find_by_type(&self, asset_type: AssetType) -> AppResult<Vec<Asset>>;
}
