#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use page_builder::{
    api,
    app_state::AppState,
    config::{Config, DatabaseConfig, ServerConfig, UploadConfig},
    infrastructure::{Database, FileRemoval, FileStore, LocalFileStore},
};

/// Local disk store that also remembers every removal attempt
pub struct RecordingFileStore {
    inner: LocalFileStore,
    removed: Mutex<Vec<String>>,
}

impl RecordingFileStore {
    pub fn removed(&self) -> Vec<String> {
        let mut removed = self.removed.lock().unwrap().clone();
        removed.sort();
        removed
    }
}

#[async_trait]
impl FileStore for RecordingFileStore {
    async fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        self.inner.save(filename, data).await
    }

    async fn remove(&self, reference: &str) -> io::Result<FileRemoval> {
        self.removed.lock().unwrap().push(reference.to_string());
        self.inner.remove(reference).await
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

const BOUNDARY: &str = "page-builder-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub files: Arc<RecordingFileStore>,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempdir().unwrap();
        let database = Database::connect_in_memory().await.unwrap();
        let files = Arc::new(RecordingFileStore {
            inner: LocalFileStore::new(dir.path()),
            removed: Mutex::new(Vec::new()),
        });

        let config = Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                node_id: 1,
            },
            uploads: UploadConfig {
                base_dir: dir.path().to_path_buf(),
                max_file_size: 1024 * 1024,
            },
        };

        let state = AppState::from_parts(&database, files.clone(), config);
        Self { state, files, dir }
    }

    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Names currently stored in the uploads directory
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.uploads_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn file_exists(&self, url: &str) -> bool {
        self.dir.path().join(url.trim_start_matches('/')).exists()
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        uri: &str,
        parts: &[Part<'_>],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Create a page over HTTP and return its id
    pub async fn create_page(&self, title: &str, slug: &str, parent_id: Option<&str>) -> String {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/pages",
                serde_json::json!({ "title": title, "slug": slug, "parentId": parent_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
