mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{Part, TestApp};
use page_builder::data_seeder::seed_sample_site;

#[tokio::test]
async fn test_nested_path_round_trip() {
    let app = TestApp::new().await;
    let media = app.create_page("Media", "media", None).await;
    let gallery = app.create_page("Gallery", "gallery", Some(&media)).await;

    let (status, page) = app.get("/api/pages/path/media/gallery").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["id"], json!(gallery));
    assert_eq!(page["fullPath"], json!("/media/gallery"));
    assert_eq!(page["parent"]["id"], json!(media));

    let (_, details) = app.get(&format!("/api/pages/{}", gallery)).await;
    assert_eq!(details["fullPath"], json!("/media/gallery"));

    let (_, paths) = app.get("/api/pages/paths/all").await;
    assert_eq!(paths, json!(["/media", "/media/gallery"]));

    let (_, slugs) = app.get("/api/pages/slugs/all").await;
    assert_eq!(slugs, json!(["gallery", "media"]));

    for missing in ["/api/pages/path/gallery", "/api/pages/path/media/nope"] {
        let (status, _) = app.get(missing).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", missing);
    }
}

#[tokio::test]
async fn test_root_slug_lookup_ignores_nested_pages() {
    let app = TestApp::new().await;
    let media = app.create_page("Media", "media", None).await;
    app.create_page("Gallery", "gallery", Some(&media)).await;

    let (status, _) = app.get("/api/pages/slug/gallery").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = app.get("/api/pages/slug/media").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["children"][0]["slug"], json!("gallery"));
}

#[tokio::test]
async fn test_slug_unique_among_siblings_only() {
    let app = TestApp::new().await;
    app.create_page("Home", "home", None).await;
    let about = app.create_page("About", "about", None).await;

    let (status, body) = app
        .send_json(Method::POST, "/api/pages", json!({ "title": "Again", "slug": "home" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["status"], json!(409));

    app.create_page("Nested home", "home", Some(&about)).await;

    // Renaming into a taken slug conflicts too
    let (status, _) = app
        .send_json(Method::PUT, &format!("/api/pages/{}", about), json!({ "slug": "home" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send_json(Method::POST, "/api/pages", json!({ "title": "Bad", "slug": "a/b" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reparenting_rejects_cycles() {
    let app = TestApp::new().await;
    let a = app.create_page("A", "a", None).await;
    let b = app.create_page("B", "b", Some(&a)).await;

    let (status, _) = app
        .send_json(Method::PUT, &format!("/api/pages/{}", a), json!({ "parentId": b }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, moved) = app
        .send_json(Method::PUT, &format!("/api/pages/{}", b), json!({ "parentId": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["parentId"], json!(null));

    let (_, roots) = app.get("/api/pages/roots").await;
    assert_eq!(roots.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tree_nests_children() {
    let app = TestApp::new().await;
    let media = app.create_page("Media", "media", None).await;
    app.create_page("Videos", "videos", Some(&media)).await;
    app.create_page("Gallery", "gallery", Some(&media)).await;
    app.create_page("About", "about", None).await;

    let (status, tree) = app.get("/api/pages/tree").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree[0]["slug"], json!("about"));
    assert_eq!(tree[1]["slug"], json!("media"));
    assert_eq!(tree[1]["children"][0]["fullPath"], json!("/media/gallery"));
    assert_eq!(tree[1]["children"][1]["fullPath"], json!("/media/videos"));

    let (_, children) = app.get(&format!("/api/pages/{}/children", media)).await;
    assert_eq!(children.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_page_cascades_sections_and_files() {
    let app = TestApp::new().await;
    let media = app.create_page("Media", "media", None).await;
    let gallery = app.create_page("Gallery", "gallery", Some(&media)).await;

    let (status, section) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "gallery"),
                Part::Text("pageId", &gallery),
                Part::Text("order", "1"),
                Part::File("images", "one.jpg", b"1"),
                Part::File("images", "two.jpg", b"2"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", section);
    assert_eq!(app.stored_files().len(), 2);

    let (status, _) = app.delete(&format!("/api/pages/{}", media)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.delete(&format!("/api/pages/{}", gallery)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["sectionsDeleted"], json!(1));
    assert_eq!(body["filesDeleted"], json!(2));
    assert!(app.stored_files().is_empty());

    let (status, _) = app.get(&format!("/api/sections/{}", section["id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/pages/{}", media)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = TestApp::new().await;

    let first = seed_sample_site(&app.state).await.unwrap();
    assert_eq!(first.pages, 4);
    assert_eq!(first.sections, 4);

    let second = seed_sample_site(&app.state).await.unwrap();
    assert_eq!(second.pages, 0);

    let (_, page) = app.get("/api/pages/path/media/gallery").await;
    assert_eq!(page["sections"][0]["type"], json!("gallery"));
}
