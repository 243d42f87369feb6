// Page Service - page CRUD, path lookups and the page tree

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::asset_lifecycle::{AssetLifecycle, PageCleanup};
use super::page_hierarchy::{self, PageHierarchy};
use crate::core::PageId;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repository::{PageRepository, SectionRepository};
use crate::models::{CreatePage, Page, PageDetails, PageTreeNode, UpdatePage};

#[derive(Clone)]
pub struct PageService {
    pages: Arc<dyn PageRepository>,
    sections: Arc<dyn SectionRepository>,
    hierarchy: PageHierarchy,
    lifecycle: AssetLifecycle,
}

fn required_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Page title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

impl PageService {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        sections: Arc<dyn SectionRepository>,
        lifecycle: AssetLifecycle,
    ) -> Self {
        Self {
            hierarchy: PageHierarchy::new(pages.clone()),
            pages,
            sections,
            lifecycle,
        }
    }

    pub fn hierarchy(&self) -> &PageHierarchy {
        &self.hierarchy
    }

    pub async fn find_all(&self) -> AppResult<Vec<Page>> {
        self.pages.find_all().await
    }

    async fn get(&self, id: PageId) -> AppResult<Page> {
        self.pages
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page with ID {} not found", id)))
    }

    async fn details(&self, page: Page) -> AppResult<PageDetails> {
        let full_path = self.hierarchy.compute_full_path(&page).await?;
        let parent = match page.parent_id {
            Some(parent_id) => self.pages.find_by_id(parent_id).await?,
            None => None,
        };
        let children = self.pages.find_children(page.id).await?;
        let sections = self.sections.find_by_page_id(page.id).await?;

        Ok(PageDetails {
            page,
            full_path,
            parent,
            children,
            sections,
        })
    }

    pub async fn find_one(&self, id: PageId) -> AppResult<PageDetails> {
        let page = self.get(id).await?;
        self.details(page).await
    }

    pub async fn find_root_by_slug(&self, slug: &str) -> AppResult<PageDetails> {
        let page = self.hierarchy.find_root_by_slug(slug).await?;
        self.details(page).await
    }

    pub async fn find_by_path(&self, path: &str) -> AppResult<PageDetails> {
        let page = self.hierarchy.resolve_path_str(path).await?;
        self.details(page).await
    }

    pub async fn all_slugs(&self) -> AppResult<Vec<String>> {
        let mut slugs: Vec<String> = self.pages.find_all().await?.into_iter().map(|p| p.slug).collect();
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    pub async fn all_paths(&self) -> AppResult<Vec<String>> {
        let pages = self.pages.find_all().await?;
        let mut paths: Vec<String> = page_hierarchy::full_paths(&pages)?.into_values().collect();
        paths.sort();
        Ok(paths)
    }

    pub async fn root_pages(&self) -> AppResult<Vec<Page>> {
        self.pages.find_root_pages().await
    }

    pub async fn children(&self, id: PageId) -> AppResult<Vec<Page>> {
        self.get(id).await?;
        self.pages.find_children(id).await
    }

    /// Every root page with its descendants, siblings ordered by title
    pub async fn tree(&self) -> AppResult<Vec<PageTreeNode>> {
        let pages = self.pages.find_all().await?;
        let mut paths = page_hierarchy::full_paths(&pages)?;

        let mut by_parent: HashMap<Option<PageId>, Vec<Page>> = HashMap::new();
        for page in pages {
            by_parent.entry(page.parent_id).or_default().push(page);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        }

        // full_paths already rejected cycles, so the recursion terminates
        fn build(
            parent_id: Option<PageId>,
            by_parent: &mut HashMap<Option<PageId>, Vec<Page>>,
            paths: &mut HashMap<PageId, String>,
        ) -> Vec<PageTreeNode> {
            let siblings = by_parent.remove(&parent_id).unwrap_or_default();
            siblings
                .into_iter()
                .map(|page| {
                    let children = build(Some(page.id), by_parent, paths);
                    PageTreeNode {
                        full_path: paths.remove(&page.id).unwrap_or_default(),
                        page,
                        children,
                    }
                })
                .collect()
        }

        Ok(build(None, &mut by_parent, &mut paths))
    }

    pub async fn create(&self, input: CreatePage) -> AppResult<Page> {
        let title = required_title(&input.title)?;
        page_hierarchy::validate_slug(&input.slug)?;

        if let Some(parent_id) = input.parent_id {
            self.hierarchy.assert_valid_parent(parent_id, None).await?;
        }
        self.hierarchy
            .assert_unique_slug(input.parent_id, &input.slug, None)
            .await?;

        let page = self
            .pages
            .create(CreatePage { title, ..input })
            .await?;
        info!("Created page {} at slug '{}'", page.id, page.slug);
        Ok(page)
    }

    pub async fn update(&self, id: PageId, changes: UpdatePage) -> AppResult<Page> {
        let existing = self.get(id).await?;

        let title = changes.title.as_deref().map(required_title).transpose()?;
        if let Some(slug) = &changes.slug {
            page_hierarchy::validate_slug(slug)?;
        }

        let slug = changes.slug.as_deref().unwrap_or(&existing.slug);
        let parent_id = changes.parent_id.unwrap_or(existing.parent_id);

        if parent_id != existing.parent_id {
            if let Some(parent_id) = parent_id {
                self.hierarchy.assert_valid_parent(parent_id, Some(id)).await?;
            }
        }
        if parent_id != existing.parent_id || slug != existing.slug {
            self.hierarchy
                .assert_unique_slug(parent_id, slug, Some(id))
                .await?;
        }

        let page = self
            .pages
            .update(id, UpdatePage { title, ..changes })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page with ID {} not found", id)))?;
        info!("Updated page {}", page.id);
        Ok(page)
    }

    /// Pages with children cannot be deleted. Sections and their files go first.
    pub async fn delete(&self, id: PageId) -> AppResult<PageCleanup> {
        let page = self.get(id).await?;

        let children = self.pages.find_children(id).await?;
        if !children.is_empty() {
            return Err(AppError::Conflict(format!(
                "Page {} still has {} child page(s)",
                page.id,
                children.len()
            )));
        }

        let cleanup = self.lifecycle.cleanup_for_page(id).await?;
        self.pages.delete(id).await?;
        info!("Deleted page {} ({})", page.id, page.slug);
        Ok(cleanup)
    }
}
