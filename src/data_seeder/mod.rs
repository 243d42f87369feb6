use serde_json::json;
use tracing::info;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{CreatePage, CreateSectionRequest, SectionType},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pages: usize,
    pub sections: usize,
}

/// Sample site: home, about, and a media page with a nested gallery.
/// Does nothing when a root `home` page already exists.
pub async fn seed_sample_site(state: &AppState) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    match state.pages.hierarchy().find_root_by_slug("home").await {
        Ok(_) => {
            info!("Sample site already present, skipping seed");
            return Ok(summary);
        }
        Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let home = state
        .pages
        .create(CreatePage {
            title: "Home Page".to_string(),
            slug: "home".to_string(),
            parent_id: None,
        })
        .await?;
    summary.pages += 1;

    let about = state
        .pages
        .create(CreatePage {
            title: "About Us".to_string(),
            slug: "about".to_string(),
            parent_id: None,
        })
        .await?;
    summary.pages += 1;

    let media = state
        .pages
        .create(CreatePage {
            title: "Media".to_string(),
            slug: "media".to_string(),
            parent_id: None,
        })
        .await?;
    let gallery = state
        .pages
        .create(CreatePage {
            title: "Gallery".to_string(),
            slug: "gallery".to_string(),
            parent_id: Some(media.id),
        })
        .await?;
    summary.pages += 2;

    let sections = [
        (
            home.id,
            1,
            SectionType::Hero,
            json!({
                "backgroundImage": "/uploads/hero-bg.jpg",
                "backgroundImageAlt": "Hero background",
                "title": "Welcome to Our Website",
                "subtitle": "Build amazing websites with ease",
                "ctaButton": { "text": "Get Started", "url": "/about" },
                "textAlignment": "center"
            }),
        ),
        (
            home.id,
            2,
            SectionType::TextBlock,
            json!({
                "content": "This is a sample text section with rich content.",
                "textAlignment": "center"
            }),
        ),
        (
            about.id,
            1,
            SectionType::TextBlock,
            json!({
                "title": "About Our Company",
                "content": "We are a company dedicated to building great websites.",
                "textAlignment": "left"
            }),
        ),
        (
            gallery.id,
            1,
            SectionType::Gallery,
            json!({
                "title": "Our Work",
                "images": [
                    { "url": "/uploads/work-1.jpg", "alt": "Project one" },
                    { "url": "/uploads/work-2.jpg", "alt": "Project two" }
                ],
                "layout": "grid",
                "columns": 2
            }),
        ),
    ];

    for (page_id, order, section_type, content) in sections {
        state
            .sections
            .create(CreateSectionRequest {
                section_type,
                content,
                order,
                page_id,
            })
            .await?;
        summary.sections += 1;
    }

    info!(
        "Seeded {} page(s) and {} section(s)",
        summary.pages, summary.sections
    );
    Ok(summary)
}
