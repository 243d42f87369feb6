// Section Service - JSON and multipart section CRUD
//
// Multipart requests run: form metadata -> page and order checks -> store uploads ->
// build candidate -> validate -> persist. Uploads of a request that fails after
// they were stored are discarded again.

use std::sync::Arc;
use tracing::{info, warn};

use super::asset_lifecycle::AssetLifecycle;
use crate::content::processor::{self, FormFields};
use crate::content::{catalog, validator, SectionContent, SectionTypeInfo};
use crate::core::{PageId, SectionId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repository::{PageRepository, SectionRepository};
use crate::infrastructure::uploads::{IncomingFile, UploadStore, UploadedFile};
use crate::models::{
    CreateSectionRequest, NewSection, Section, SectionChanges, SectionType, UpdateSectionRequest,
};

/// A parsed multipart submission: named text parts and file parts
#[derive(Debug, Clone, Default)]
pub struct SectionForm {
    pub fields: FormFields,
    pub files: Vec<IncomingFile>,
}

/// `type`, `pageId` and `order` as sent in a multipart form
#[derive(Debug, Clone, Copy)]
struct FormMeta {
    section_type: Option<SectionType>,
    page_id: Option<PageId>,
    order: Option<i32>,
}

impl FormMeta {
    fn parse(fields: &FormFields) -> AppResult<Self> {
        let section_type = fields.non_empty("type").map(str::parse::<SectionType>).transpose()?;
        let page_id = fields
            .non_empty("pageId")
            .map(|v| {
                v.trim()
                    .parse::<PageId>()
                    .map_err(|_| AppError::Validation(format!("Invalid pageId '{}'", v)))
            })
            .transpose()?;
        let order = fields
            .non_empty("order")
            .map(|v| {
                v.trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::Validation(format!("Invalid order '{}'", v)))
            })
            .transpose()?;

        Ok(Self {
            section_type,
            page_id,
            order,
        })
    }
}

fn missing_form_field(name: &str) -> AppError {
    AppError::Validation(format!("Form field '{}' is required", name))
}

#[derive(Clone)]
pub struct SectionService {
    sections: Arc<dyn SectionRepository>,
    pages: Arc<dyn PageRepository>,
    uploads: UploadStore,
    lifecycle: AssetLifecycle,
}

impl SectionService {
    pub fn new(
        sections: Arc<dyn SectionRepository>,
        pages: Arc<dyn PageRepository>,
        uploads: UploadStore,
        lifecycle: AssetLifecycle,
    ) -> Self {
        Self {
            sections,
            pages,
            uploads,
            lifecycle,
        }
    }

    pub fn section_types(&self) -> Vec<SectionTypeInfo> {
        catalog::section_types()
    }

    pub async fn find_all(&self) -> AppResult<Vec<Section>> {
        self.sections.find_all().await
    }

    pub async fn find_one(&self, id: SectionId) -> AppResult<Section> {
        self.sections
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Section with ID {} not found", id)))
    }

    pub async fn find_by_page(&self, page_id: PageId) -> AppResult<Vec<Section>> {
        self.ensure_page(page_id).await?;
        self.sections.find_by_page_id(page_id).await
    }

    async fn ensure_page(&self, page_id: PageId) -> AppResult<()> {
        match self.pages.find_by_id(page_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Page with ID {} not found", page_id))),
        }
    }

    /// Conflict when another section of the page already uses `order`
    async fn assert_order_free(
        &self,
        page_id: PageId,
        order: i32,
        exclude_id: Option<SectionId>,
    ) -> AppResult<()> {
        let taken = self
            .sections
            .find_by_page_id(page_id)
            .await?
            .into_iter()
            .any(|s| s.order == order && Some(s.id) != exclude_id);
        if taken {
            return Err(AppError::Conflict(format!(
                "Section with order {} already exists for page {}",
                order, page_id
            )));
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateSectionRequest) -> AppResult<Section> {
        let content = validator::validate(request.section_type, &request.content)?;
        self.ensure_page(request.page_id).await?;
        self.assert_order_free(request.page_id, request.order, None)
            .await?;

        let section = self
            .sections
            .create(NewSection {
                content,
                order: request.order,
                page_id: request.page_id,
            })
            .await?;
        info!("Created {} section {}", section.section_type, section.id);
        Ok(section)
    }

    pub async fn update(&self, id: SectionId, request: UpdateSectionRequest) -> AppResult<Section> {
        let existing = self.find_one(id).await?;
        let section_type = request.section_type.unwrap_or(existing.section_type);

        let content = match &request.content {
            Some(raw) => Some(validator::validate(section_type, raw)?),
            None if section_type != existing.section_type => {
                return Err(AppError::Validation(format!(
                    "Changing a section to {} requires new content",
                    section_type
                )))
            }
            None => None,
        };

        let changes = SectionChanges {
            content,
            order: request.order,
            page_id: request.page_id,
        };
        self.apply(existing, changes).await
    }

    /// Placement checks, persistence and cleanup of file references the update dropped
    async fn apply(&self, existing: Section, changes: SectionChanges) -> AppResult<Section> {
        let page_id = changes.page_id.unwrap_or(existing.page_id);
        let order = changes.order.unwrap_or(existing.order);

        if page_id != existing.page_id {
            self.ensure_page(page_id).await?;
        }
        if page_id != existing.page_id || order != existing.order {
            self.assert_order_free(page_id, order, Some(existing.id))
                .await?;
        }

        let updated = self
            .sections
            .update(existing.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Section with ID {} not found", existing.id)))?;

        self.lifecycle
            .remove_replaced(&existing.content, &updated.content)
            .await;
        info!("Updated section {}", updated.id);
        Ok(updated)
    }

    pub async fn create_from_form(&self, form: SectionForm) -> AppResult<Section> {
        let meta = FormMeta::parse(&form.fields)?;
        let section_type = meta.section_type.ok_or_else(|| missing_form_field("type"))?;
        let page_id = meta.page_id.ok_or_else(|| missing_form_field("pageId"))?;
        let order = meta.order.ok_or_else(|| missing_form_field("order"))?;

        self.ensure_page(page_id).await?;
        self.assert_order_free(page_id, order, None).await?;

        let uploads = self.uploads.persist(form.files).await?;

        let result = async {
            let candidate = processor::build(section_type, &uploads, &form.fields)?;
            let content = validator::validate(section_type, &candidate)?;
            self.sections
                .create(NewSection {
                    content,
                    order,
                    page_id,
                })
                .await
        }
        .await;

        match result {
            Ok(section) => {
                info!(
                    "Created {} section {} from form with {} upload(s)",
                    section.section_type,
                    section.id,
                    uploads.len()
                );
                Ok(section)
            }
            Err(e) => Err(self.discard(&uploads, e).await),
        }
    }

    pub async fn update_from_form(&self, id: SectionId, form: SectionForm) -> AppResult<Section> {
        let existing = self.find_one(id).await?;
        let meta = FormMeta::parse(&form.fields)?;
        let section_type = meta.section_type.unwrap_or(existing.section_type);

        let page_id = meta.page_id.unwrap_or(existing.page_id);
        let order = meta.order.unwrap_or(existing.order);
        if page_id != existing.page_id {
            self.ensure_page(page_id).await?;
        }
        if page_id != existing.page_id || order != existing.order {
            self.assert_order_free(page_id, order, Some(id)).await?;
        }

        let uploads = self.uploads.persist(form.files).await?;

        let result = async {
            let candidate = processor::build_for_update(
                section_type,
                &uploads,
                &form.fields,
                &existing.content,
            )?;
            let content: SectionContent = validator::validate(section_type, &candidate)?;
            let changes = SectionChanges {
                content: Some(content),
                order: meta.order,
                page_id: meta.page_id,
            };
            self.apply(existing, changes).await
        }
        .await;

        match result {
            Ok(section) => Ok(section),
            Err(e) => Err(self.discard(&uploads, e).await),
        }
    }

    async fn discard(&self, uploads: &[UploadedFile], error: AppError) -> AppError {
        if !uploads.is_empty() {
            warn!("Section request failed, discarding its uploads: {}", error);
            self.lifecycle.discard_uploads(uploads).await;
        }
        error
    }

    /// Files are cleaned up best-effort alongside the record delete
    pub async fn delete(&self, id: SectionId) -> AppResult<Section> {
        let section = self.find_one(id).await?;
        if !self.lifecycle.delete_section(&section).await? {
            return Err(AppError::NotFound(format!("Section with ID {} not found", id)));
        }
        info!("Deleted section {}", section.id);
        Ok(section)
    }
}
