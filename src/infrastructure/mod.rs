// Infrastructure - storage, id generation and the uploads directory

pub mod database;              // SQLite pool and schema
pub mod file_store;            // Files behind `/uploads/...` references
pub mod id_generator;          // Snowflake ids
pub mod repository;            // Repository traits
pub mod sqlite_repository;     // SQLite repositories
pub mod uploads;               // Upload naming, filtering and persistence

pub use database::Database;
pub use file_store::{FileRemoval, FileStore, LocalFileStore};
pub use id_generator::IdGenerator;
pub use repository::{AssetRepository, PageRepository, Repository, SectionRepository};
pub use sqlite_repository::{SqliteAssetRepository, SqlitePageRepository, SqliteSectionRepository};
pub use uploads::{IncomingFile, UploadStore, UploadedFile};
