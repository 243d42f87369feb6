// Page Hierarchy - converts between a page's ancestor chain and its `/`-joined path
// and keeps slugs unique among siblings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::PageId;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repository::PageRepository;
use crate::models::Page;

/// Longest ancestor chain followed before the tree is treated as corrupt
pub const MAX_PAGE_DEPTH: usize = 64;

static SLUG_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").expect("valid regex"));

/// Non-empty segments of a slash-delimited path
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

pub fn join_path<S: AsRef<str>>(slugs: &[S]) -> String {
    let mut path = String::new();
    for slug in slugs {
        path.push('/');
        path.push_str(slug.as_ref());
    }
    path
}

/// A slug is exactly one URL path segment
pub fn validate_slug(slug: &str) -> AppResult<()> {
    if SLUG_FORMAT.is_match(slug) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid slug '{}': use letters, digits, '-', '_', '.' or '~', starting with a letter or digit",
            slug
        )))
    }
}

/// Full paths for a whole set of pages from a single id -> page map,
/// with the same depth and cycle guards as [`PageHierarchy::compute_full_path`]
pub fn full_paths(pages: &[Page]) -> AppResult<HashMap<PageId, String>> {
    let by_id: HashMap<PageId, &Page> = pages.iter().map(|p| (p.id, p)).collect();
    let mut paths = HashMap::with_capacity(pages.len());

    for page in pages {
        let mut slugs = vec![page.slug.as_str()];
        let mut visited = HashSet::from([page.id]);
        let mut parent_id = page.parent_id;

        while let Some(id) = parent_id {
            if !visited.insert(id) {
                return Err(cycle_error(page.id));
            }
            if visited.len() > MAX_PAGE_DEPTH {
                return Err(depth_error(page.id));
            }
            let parent = by_id.get(&id).ok_or_else(|| dangling_parent(page.id, id))?;
            slugs.push(parent.slug.as_str());
            parent_id = parent.parent_id;
        }

        slugs.reverse();
        paths.insert(page.id, join_path(&slugs));
    }

    Ok(paths)
}

fn cycle_error(page_id: PageId) -> AppError {
    AppError::Internal(format!("Page {} has a cyclic ancestor chain", page_id))
}

fn depth_error(page_id: PageId) -> AppError {
    AppError::Internal(format!(
        "Page {} is nested deeper than {} levels",
        page_id, MAX_PAGE_DEPTH
    ))
}

fn dangling_parent(page_id: PageId, parent_id: PageId) -> AppError {
    AppError::Internal(format!(
        "Page {} refers to missing parent page {}",
        page_id, parent_id
    ))
}

#[derive(Clone)]
pub struct PageHierarchy {
    pages: Arc<dyn PageRepository>,
}

impl PageHierarchy {
    pub fn new(pages: Arc<dyn PageRepository>) -> Self {
        Self { pages }
    }

    /// Walk the segments down from the root set, failing at the first unmatched one
    pub async fn resolve_path<S: AsRef<str> + Sync>(&self, segments: &[S]) -> AppResult<Page> {
        let mut current: Option<Page> = None;

        for segment in segments {
            let segment = segment.as_ref();
            let parent_id = current.as_ref().map(|p| p.id);
            let next = self
                .pages
                .find_by_slug_and_parent(segment, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Page not found at segment '{}'", segment))
                })?;
            current = Some(next);
        }

        current.ok_or_else(|| AppError::NotFound("Page not found for empty path".to_string()))
    }

    pub async fn resolve_path_str(&self, path: &str) -> AppResult<Page> {
        self.resolve_path(&split_path(path)).await
    }

    /// Bare slugs only address root pages
    pub async fn find_root_by_slug(&self, slug: &str) -> AppResult<Page> {
        self.pages
            .find_by_slug_and_parent(slug, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Root page with slug '{}' not found", slug)))
    }

    /// `page` followed by its ancestors up to the root
    pub async fn ancestor_chain(&self, page: &Page) -> AppResult<Vec<Page>> {
        let mut chain = vec![page.clone()];
        let mut visited = HashSet::from([page.id]);
        let mut parent_id = page.parent_id;

        while let Some(id) = parent_id {
            if !visited.insert(id) {
                return Err(cycle_error(page.id));
            }
            if visited.len() > MAX_PAGE_DEPTH {
                return Err(depth_error(page.id));
            }
            let parent = self
                .pages
                .find_by_id(id)
                .await?
                .ok_or_else(|| dangling_parent(page.id, id))?;
            parent_id = parent.parent_id;
            chain.push(parent);
        }

        Ok(chain)
    }

    pub async fn compute_full_path(&self, page: &Page) -> AppResult<String> {
        let chain = self.ancestor_chain(page).await?;
        let slugs: Vec<&str> = chain.iter().rev().map(|p| p.slug.as_str()).collect();
        Ok(join_path(&slugs))
    }

    /// Conflict when a sibling under `parent_id` other than `exclude_id` uses `slug`
    pub async fn assert_unique_slug(
        &self,
        parent_id: Option<PageId>,
        slug: &str,
        exclude_id: Option<PageId>,
    ) -> AppResult<()> {
        match self.pages.find_by_slug_and_parent(slug, parent_id).await? {
            Some(existing) if Some(existing.id) != exclude_id => Err(AppError::Conflict(match parent_id {
                Some(parent) => format!(
                    "A page with slug '{}' already exists under page {}",
                    slug, parent
                ),
                None => format!("A root page with slug '{}' already exists", slug),
            })),
            _ => Ok(()),
        }
    }

    /// The parent must exist and, when `page_id` is being moved, must not be the
    /// page itself or one of its descendants
    pub async fn assert_valid_parent(
        &self,
        parent_id: PageId,
        page_id: Option<PageId>,
    ) -> AppResult<Page> {
        let parent = self
            .pages
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Parent page {} not found", parent_id)))?;

        if let Some(page_id) = page_id {
            let chain = self.ancestor_chain(&parent).await?;
            if chain.iter().any(|p| p.id == page_id) {
                return Err(AppError::Validation(format!(
                    "Page {} cannot be moved under itself or one of its descendants",
                    page_id
                )));
            }
        }

        Ok(parent)
    }
}
