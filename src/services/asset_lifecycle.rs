// Asset Lifecycle - keeps uploaded files in step with the sections that reference them
//
// Record deletion and file cleanup fail independently: a file that cannot be removed
// is logged and counted, never turned into an error for the caller.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::content::SectionContent;
use crate::core::PageId;
use crate::error::AppResult;
use crate::infrastructure::file_store::{FileRemoval, FileStore};
use crate::infrastructure::repository::SectionRepository;
use crate::infrastructure::uploads::{UploadedFile, UPLOADS_DIR};
use crate::models::Section;

/// Every file reference held by a piece of content, in document order
pub fn extract_file_refs(content: &SectionContent) -> Vec<String> {
    match content {
        SectionContent::ImageText(c) => vec![c.image_url.clone()],
        SectionContent::Hero(c) => vec![c.background_image.clone()],
        SectionContent::Slider(c) => c.slides.iter().map(|s| s.image_url.clone()).collect(),
        SectionContent::Gallery(c) => c.images.iter().map(|i| i.url.clone()).collect(),
        SectionContent::TextBlock(_) | SectionContent::ContactForm(_) => Vec::new(),
    }
}

/// Only references into the uploads directory are ever touched on disk
fn is_local_upload(reference: &str) -> bool {
    let relative = reference.strip_prefix('/').unwrap_or(reference);
    relative
        .strip_prefix(UPLOADS_DIR)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub attempted: usize,
    pub deleted: usize,
    pub missing: usize,
    /// References whose removal failed with an I/O error
    pub failed: Vec<String>,
}

impl CleanupReport {
    pub fn merge(&mut self, other: CleanupReport) {
        self.attempted += other.attempted;
        self.deleted += other.deleted;
        self.missing += other.missing;
        self.failed.extend(other.failed);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCleanup {
    pub sections_deleted: usize,
    pub files: CleanupReport,
}

#[derive(Clone)]
pub struct AssetLifecycle {
    files: Arc<dyn FileStore>,
    sections: Arc<dyn SectionRepository>,
}

impl AssetLifecycle {
    pub fn new(files: Arc<dyn FileStore>, sections: Arc<dyn SectionRepository>) -> Self {
        Self { files, sections }
    }

    /// Attempt every removal concurrently; duplicates and non-upload references are skipped
    pub async fn delete_files(&self, references: &[String]) -> CleanupReport {
        let mut seen = HashSet::new();
        let targets: Vec<&str> = references
            .iter()
            .map(String::as_str)
            .filter(|r| {
                if !is_local_upload(r) {
                    debug!("Skipping cleanup of non-upload reference {}", r);
                    return false;
                }
                seen.insert(*r)
            })
            .collect();

        let outcomes = join_all(targets.iter().map(|r| self.files.remove(r))).await;

        let mut report = CleanupReport {
            attempted: targets.len(),
            ..Default::default()
        };
        for (reference, outcome) in targets.into_iter().zip(outcomes) {
            match outcome {
                Ok(FileRemoval::Deleted) => {
                    info!("Deleted file {}", reference);
                    report.deleted += 1;
                }
                Ok(FileRemoval::Missing) => {
                    debug!("File {} was already gone", reference);
                    report.missing += 1;
                }
                Err(e) => {
                    warn!("Failed to delete file {}: {}", reference, e);
                    report.failed.push(reference.to_string());
                }
            }
        }
        report
    }

    pub async fn cleanup_for_section(&self, section: &Section) -> CleanupReport {
        let references = extract_file_refs(&section.content);
        if references.is_empty() {
            return CleanupReport::default();
        }
        debug!(
            "Cleaning up {} file(s) of {} section {}",
            references.len(),
            section.section_type,
            section.id
        );
        self.delete_files(&references).await
    }

    /// Delete the record and its files side by side; only the record outcome is returned
    pub async fn delete_section(&self, section: &Section) -> AppResult<bool> {
        let (report, deleted) = futures::join!(
            self.cleanup_for_section(section),
            self.sections.delete(section.id)
        );
        if !report.failed.is_empty() {
            warn!(
                "Section {} deleted with {} file(s) left behind",
                section.id,
                report.failed.len()
            );
        }
        deleted
    }

    /// Remove every section of a page together with its files
    pub async fn cleanup_for_page(&self, page_id: PageId) -> AppResult<PageCleanup> {
        let sections = self.sections.find_by_page_id(page_id).await?;

        let reports = join_all(sections.iter().map(|s| self.cleanup_for_section(s))).await;
        let mut files = CleanupReport::default();
        for report in reports {
            files.merge(report);
        }

        let deletions = join_all(sections.iter().map(|s| self.sections.delete(s.id))).await;
        let mut sections_deleted = 0;
        for deleted in deletions {
            if deleted? {
                sections_deleted += 1;
            }
        }

        info!(
            "Cleared page {}: {} section(s), {} file(s) deleted, {} missing, {} failed",
            page_id,
            sections_deleted,
            files.deleted,
            files.missing,
            files.failed.len()
        );
        Ok(PageCleanup {
            sections_deleted,
            files,
        })
    }

    /// Files referenced by `previous` that `current` no longer references
    pub async fn remove_replaced(
        &self,
        previous: &SectionContent,
        current: &SectionContent,
    ) -> CleanupReport {
        let kept: HashSet<String> = extract_file_refs(current).into_iter().collect();
        let replaced: Vec<String> = extract_file_refs(previous)
            .into_iter()
            .filter(|r| !kept.contains(r))
            .collect();
        if replaced.is_empty() {
            return CleanupReport::default();
        }
        self.delete_files(&replaced).await
    }

    /// Best-effort removal of uploads stored for a request that did not complete
    pub async fn discard_uploads(&self, uploads: &[UploadedFile]) -> CleanupReport {
        if uploads.is_empty() {
            return CleanupReport::default();
        }
        let references: Vec<String> = uploads.iter().map(UploadedFile::url).collect();
        debug!("Discarding {} upload(s) of a failed request", references.len());
        self.delete_files(&references).await
    }
}
