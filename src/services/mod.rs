// Services - page, section and asset operations on top of the repositories

pub mod asset_lifecycle;
pub mod asset_service;
pub mod page_hierarchy;
pub mod page_service;
pub mod section_service;

pub use asset_lifecycle::{extract_file_refs, AssetLifecycle, CleanupReport, PageCleanup};
pub use asset_service::AssetService;
pub use page_hierarchy::PageHierarchy;
pub use page_service::PageService;
pub use section_service::{SectionForm, SectionService};
