// SQLite repositories - sqlx-backed storage for pages, sections and assets

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

use super::id_generator::IdGenerator;
use super::repository::{AssetRepository, PageRepository, Repository, SectionRepository};
use crate::core::{AssetId, PageId, SectionId};
use crate::error::{AppError, AppResult};
use crate::models::{
    Asset, AssetType, CreateAsset, CreatePage, NewSection, Page, Section, SectionChanges,
    SectionType, UpdateAsset, UpdatePage,
};

/// Unique index violations become `Conflict`; everything else is a database failure
fn write_error(err: sqlx::Error, conflict: impl FnOnce() -> String) -> AppError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(conflict()),
        _ => AppError::DatabaseError(err.to_string()),
    }
}

fn page_from_row(row: &SqliteRow) -> AppResult<Page> {
    Ok(Page {
        id: PageId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        parent_id: row.try_get::<Option<i64>, _>("parent_id")?.map(PageId::new),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn section_from_row(row: &SqliteRow) -> AppResult<Section> {
    let section_type: SectionType = row.try_get::<String, _>("section_type")?.parse()?;
    let content: String = row.try_get("content")?;

    Ok(Section {
        id: SectionId::new(row.try_get("id")?),
        section_type,
        content: serde_json::from_str(&content)?,
        order: row.try_get("position")?,
        page_id: PageId::new(row.try_get("page_id")?),
    })
}

fn asset_from_row(row: &SqliteRow) -> AppResult<Asset> {
    Ok(Asset {
        id: AssetId::new(row.try_get("id")?),
        url: row.try_get("url")?,
        asset_type: row.try_get::<String, _>("asset_type")?.parse()?,
        filename: row.try_get("filename")?,
        uploaded_at: row.try_get("uploaded_at")?,
        uploaded_by: row.try_get("uploaded_by")?,
    })
}

const PAGE_COLUMNS: &str = "SELECT id, title, slug, parent_id, created_at, updated_at FROM pages";
const SECTION_COLUMNS: &str = "SELECT id, page_id, section_type, content, position FROM sections";
const ASSET_COLUMNS: &str =
    "SELECT id, url, asset_type, filename, uploaded_at, uploaded_by FROM assets";

#[derive(Clone)]
pub struct SqlitePageRepository {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
}

impl SqlitePageRepository {
    pub fn new(pool: SqlitePool, ids: Arc<IdGenerator>) -> Self {
        Self { pool, ids }
    }

    async fn fetch(&self, sql: String, bind: Option<i64>) -> AppResult<Vec<Page>> {
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(page_from_row)
            .collect()
    }
}

fn slug_conflict(slug: &str, parent_id: Option<PageId>) -> String {
    match parent_id {
        Some(parent) => format!("A page with slug '{}' already exists under page {}", slug, parent),
        None => format!("A root page with slug '{}' already exists", slug),
    }
}

#[async_trait]
impl Repository<Page> for SqlitePageRepository {
    async fn find_all(&self) -> AppResult<Vec<Page>> {
        self.fetch(format!("{} ORDER BY created_at, id", PAGE_COLUMNS), None)
            .await
    }

    async fn find_by_id(&self, id: PageId) -> AppResult<Option<Page>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", PAGE_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(page_from_row).transpose()
    }

    async fn create(&self, input: CreatePage) -> AppResult<Page> {
        let now = Utc::now();
        let page = Page {
            id: PageId::new(self.ids.next_id()),
            title: input.title,
            slug: input.slug,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO pages (id, title, slug, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(page.id.value())
        .bind(&page.title)
        .bind(&page.slug)
        .bind(page.parent_id.map(PageId::value))
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, || slug_conflict(&page.slug, page.parent_id)))?;

        debug!("Created page {} ({})", page.id, page.slug);
        Ok(page)
    }

    async fn update(&self, id: PageId, changes: UpdatePage) -> AppResult<Option<Page>> {
        let Some(mut page) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            page.title = title;
        }
        if let Some(slug) = changes.slug {
            page.slug = slug;
        }
        if let Some(parent_id) = changes.parent_id {
            page.parent_id = parent_id;
        }
        page.updated_at = Utc::now();

        sqlx::query("UPDATE pages SET title = ?, slug = ?, parent_id = ?, updated_at = ? WHERE id = ?")
            .bind(&page.title)
            .bind(&page.slug)
            .bind(page.parent_id.map(PageId::value))
            .bind(page.updated_at)
            .bind(page.id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, || slug_conflict(&page.slug, page.parent_id)))?;

        Ok(Some(page))
    }

    async fn delete(&self, id: PageId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PageRepository for SqlitePageRepository {
    async fn find_by_slug_and_parent(
        &self,
        slug: &str,
        parent_id: Option<PageId>,
    ) -> AppResult<Option<Page>> {
        let row = match parent_id {
            Some(parent) => {
                sqlx::query(&format!("{} WHERE slug = ? AND parent_id = ?", PAGE_COLUMNS))
                    .bind(slug)
                    .bind(parent.value())
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(&format!("{} WHERE slug = ? AND parent_id IS NULL", PAGE_COLUMNS))
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        row.as_ref().map(page_from_row).transpose()
    }

    async fn find_children(&self, parent_id: PageId) -> AppResult<Vec<Page>> {
        self.fetch(
            format!("{} WHERE parent_id = ? ORDER BY title, id", PAGE_COLUMNS),
            Some(parent_id.value()),
        )
        .await
    }

    async fn find_root_pages(&self) -> AppResult<Vec<Page>> {
        self.fetch(
            format!("{} WHERE parent_id IS NULL ORDER BY title, id", PAGE_COLUMNS),
            None,
        )
        .await
    }
}

#[derive(Clone)]
pub struct SqliteSectionRepository {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
}

impl SqliteSectionRepository {
    pub fn new(pool: SqlitePool, ids: Arc<IdGenerator>) -> Self {
        Self { pool, ids }
    }
}

fn order_conflict(page_id: PageId, order: i32) -> String {
    format!("A section with order {} already exists on page {}", order, page_id)
}

#[async_trait]
impl Repository<Section> for SqliteSectionRepository {
    async fn find_all(&self) -> AppResult<Vec<Section>> {
        sqlx::query(&format!("{} ORDER BY page_id, position", SECTION_COLUMNS))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(section_from_row)
            .collect()
    }

    async fn find_by_id(&self, id: SectionId) -> AppResult<Option<Section>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SECTION_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(section_from_row).transpose()
    }

    async fn create(&self, input: NewSection) -> AppResult<Section> {
        let section = Section {
            id: SectionId::new(self.ids.next_id()),
            section_type: input.content.section_type(),
            content: input.content,
            order: input.order,
            page_id: input.page_id,
        };
        let content = serde_json::to_string(&section.content)?;

        sqlx::query(
            "INSERT INTO sections (id, page_id, section_type, content, position) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(section.id.value())
        .bind(section.page_id.value())
        .bind(section.section_type.as_str())
        .bind(content)
        .bind(section.order)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, || order_conflict(section.page_id, section.order)))?;

        debug!("Created {} section {} on page {}", section.section_type, section.id, section.page_id);
        Ok(section)
    }

    async fn update(&self, id: SectionId, changes: SectionChanges) -> AppResult<Option<Section>> {
        let Some(mut section) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(content) = changes.content {
            section.section_type = content.section_type();
            section.content = content;
        }
        if let Some(order) = changes.order {
            section.order = order;
        }
        if let Some(page_id) = changes.page_id {
            section.page_id = page_id;
        }
        let content = serde_json::to_string(&section.content)?;

        sqlx::query(
            "UPDATE sections SET page_id = ?, section_type = ?, content = ?, position = ? WHERE id = ?",
        )
        .bind(section.page_id.value())
        .bind(section.section_type.as_str())
        .bind(content)
        .bind(section.order)
        .bind(section.id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, || order_conflict(section.page_id, section.order)))?;

        Ok(Some(section))
    }

    async fn delete(&self, id: SectionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sections WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SectionRepository for SqliteSectionRepository {
    async fn find_by_page_id(&self, page_id: PageId) -> AppResult<Vec<Section>> {
        sqlx::query(&format!("{} WHERE page_id = ? ORDER BY position", SECTION_COLUMNS))
            .bind(page_id.value())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(section_from_row)
            .collect()
    }
}

#[derive(Clone)]
pub struct SqliteAssetRepository {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
}

impl SqliteAssetRepository {
    pub fn new(pool: SqlitePool, ids: Arc<IdGenerator>) -> Self {
        Self { pool, ids }
    }
}

#[async_trait]
impl Repository<Asset> for SqliteAssetRepository {
    async fn find_all(&self) -> AppResult<Vec<Asset>> {
        sqlx::query(&format!("{} ORDER BY uploaded_at DESC, id DESC", ASSET_COLUMNS))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(asset_from_row)
            .collect()
    }

    async fn find_by_id(&self, id: AssetId) -> AppResult<Option<Asset>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", ASSET_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    async fn create(&self, input: CreateAsset) -> AppResult<Asset> {
        let asset = Asset {
            id: AssetId::new(self.ids.next_id()),
            url: input.url,
            asset_type: input.asset_type,
            filename: input.filename,
            uploaded_at: Utc::now(),
            uploaded_by: input.uploaded_by,
        };

        sqlx::query(
            "INSERT INTO assets (id, url, asset_type, filename, uploaded_at, uploaded_by) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(asset.id.value())
        .bind(&asset.url)
        .bind(asset.asset_type.as_str())
        .bind(&asset.filename)
        .bind(asset.uploaded_at)
        .bind(&asset.uploaded_by)
        .execute(&self.pool)
        .await?;

        Ok(asset)
    }

    async fn update(&self, id: AssetId, changes: UpdateAsset) -> AppResult<Option<Asset>> {
        let Some(mut asset) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(url) = changes.url {
            asset.url = url;
        }
        if let Some(asset_type) = changes.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(filename) = changes.filename {
            asset.filename = filename;
        }
        if let Some(uploaded_by) = changes.uploaded_by {
            asset.uploaded_by = Some(uploaded_by);
        }

        sqlx::query("UPDATE assets SET url = ?, asset_type = ?, filename = ?, uploaded_by = ? WHERE id = ?")
            .bind(&asset.url)
            .bind(asset.asset_type.as_str())
            .bind(&asset.filename)
            .bind(&asset.uploaded_by)
            .bind(asset.id.value())
            .execute(&self.pool)
            .await?;

        Ok(Some(asset))
    }

    async fn delete(&self, id: AssetId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assets WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AssetRepository for SqliteAssetRepository {
    async fn find_by_type(&self, asset_type: AssetType) -> AppResult<Vec<Asset>> {
        sqlx::query(&format!(
            "{} WHERE asset_type = ? ORDER BY uploaded_at DESC, id DESC",
            ASSET_COLUMNS
        ))
        .bind(asset_type.as_str())
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(asset_from_row)
        .collect()
    }
}
