mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{Part, TestApp};

fn text_block(content: &str) -> Value {
    json!({ "content": content, "textAlignment": "left" })
}

#[tokio::test]
async fn test_order_is_unique_per_page() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;
    let other = app.create_page("Other", "other", None).await;

    let (status, first) = app
        .send_json(
            Method::POST,
            "/api/sections/json",
            json!({ "type": "text-block", "pageId": page, "order": 1, "content": text_block("first") }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    let first_id = first["id"].as_str().unwrap().to_string();

    let second = json!({ "type": "text-block", "pageId": page, "order": 1, "content": text_block("second") });
    let (status, _) = app.send_json(Method::POST, "/api/sections/json", second.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same order on another page is fine
    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/sections/json",
            json!({ "type": "text-block", "pageId": other, "order": 1, "content": text_block("x") }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, moved) = app
        .send_json(Method::PUT, &format!("/api/sections/{}", first_id), json!({ "order": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["order"], json!(2));

    let (status, _) = app.send_json(Method::POST, "/api/sections/json", second).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = app.get(&format!("/api/sections/page/{}", page)).await;
    let orders: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[tokio::test]
async fn test_invalid_json_content_lists_every_field() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/sections/json",
            json!({
                "type": "hero",
                "pageId": page,
                "order": 1,
                "content": { "title": "Only a title", "textAlignment": "middle" }
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    for expected in ["backgroundImage", "backgroundImageAlt", "subtitle", "ctaButton", "textAlignment"] {
        assert!(fields.contains(&expected), "{} missing from {:?}", expected, fields);
    }
    assert!(!fields.contains(&"title"));
}

#[tokio::test]
async fn test_gallery_delete_tolerates_missing_file() {
    let app = TestApp::new().await;
    let page = app.create_page("Gallery", "gallery", None).await;

    let (status, section) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "gallery"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("text_1", "Portfolio"),
                Part::File("images", "a.jpg", b"a"),
                Part::File("images", "b.png", b"b"),
                Part::File("images", "c.webp", b"c"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", section);

    let urls: Vec<String> = section["content"]["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["url"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(urls.len(), 3);
    assert_eq!(section["content"]["layout"], json!("grid"));
    assert_eq!(section["content"]["columns"], json!(3));

    std::fs::remove_file(app.dir.path().join(urls[1].trim_start_matches('/'))).unwrap();

    let id = section["id"].as_str().unwrap();
    let (status, _) = app.delete(&format!("/api/sections/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = urls.clone();
    expected.sort();
    assert_eq!(app.files.removed(), expected);
    assert!(app.stored_files().is_empty());

    let (status, _) = app.get(&format!("/api/sections/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_slider_form_merges_slide_data() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;

    let slide_data = json!([
        { "title": "First", "description": "One" },
        { "title": "Second", "description": "Two" }
    ])
    .to_string();

    let (status, section) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "slider"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("autoPlay", "true"),
                Part::Text("duration", "4"),
                Part::Text("slideData", &slide_data),
                Part::File("images", "one.jpg", b"1"),
                Part::File("images", "two.jpg", b"2"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", section);

    let slides = section["content"]["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0]["title"], json!("First"));
    assert_eq!(slides[1]["description"], json!("Two"));
    assert_eq!(slides[1]["imageAlt"], json!("two.jpg"));
    assert!(app.file_exists(slides[0]["imageUrl"].as_str().unwrap()));
    assert_eq!(section["content"]["autoPlay"], json!(true));
}

#[tokio::test]
async fn test_malformed_slide_data_persists_nothing() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;

    let (status, body) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "slider"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("slideData", "[{\"title\": "),
                Part::File("images", "one.jpg", b"1"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], json!("slideData"));
    assert!(app.stored_files().is_empty());

    let (_, sections) = app.get(&format!("/api/sections/page/{}", page)).await;
    assert_eq!(sections, json!([]));
}

#[tokio::test]
async fn test_form_metadata_is_checked_first() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;

    let (status, body) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[Part::Text("type", "hero"), Part::Text("pageId", &page)],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("order"));

    let (status, _) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "hero"),
                Part::Text("pageId", "12345"),
                Part::Text("order", "1"),
                Part::File("backgroundImage", "bg.jpg", b"x"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.stored_files().is_empty());

    let (status, body) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "hero"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("text_1", "Title"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("backgroundImage"));

    let (status, _) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "text-block"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("text_2", "Body"),
                Part::File("image", "script.exe", b"x"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_update_replaces_and_cleans_up_image() {
    let app = TestApp::new().await;
    let page = app.create_page("Home", "home", None).await;

    let (status, created) = app
        .send_multipart(
            Method::POST,
            "/api/sections",
            &[
                Part::Text("type", "hero"),
                Part::Text("pageId", &page),
                Part::Text("order", "1"),
                Part::Text("text_1", "Welcome"),
                Part::Text("text_2", "Subtitle"),
                Part::Text("text_3", "Start"),
                Part::Text("ctaButtonUrl", "/start"),
                Part::Text("textAlignment", "center"),
                Part::File("backgroundImage", "old.jpg", b"old"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let id = created["id"].as_str().unwrap().to_string();
    let old_url = created["content"]["backgroundImage"].as_str().unwrap().to_string();

    // Text-only update keeps the stored image
    let (status, updated) = app
        .send_multipart(
            Method::PUT,
            &format!("/api/sections/{}/form", id),
            &[Part::Text("text_1", "Hello")],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["content"]["title"], json!("Hello"));
    assert_eq!(updated["content"]["subtitle"], json!("Subtitle"));
    assert_eq!(updated["content"]["backgroundImage"], json!(old_url));
    assert!(app.file_exists(&old_url));

    let (status, updated) = app
        .send_multipart(
            Method::PUT,
            &format!("/api/sections/{}/form", id),
            &[Part::File("backgroundImage", "new.jpg", b"new")],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    let new_url = updated["content"]["backgroundImage"].as_str().unwrap();
    assert_ne!(new_url, old_url);
    assert_eq!(updated["content"]["title"], json!("Hello"));
    assert!(app.file_exists(new_url));
    assert!(!app.file_exists(&old_url));
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn test_section_type_catalogue() {
    let app = TestApp::new().await;
    let (status, types) = app.get("/api/sections/types").await;
    assert_eq!(status, StatusCode::OK);

    let tags: Vec<&str> = types
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(tags.len(), 6);
    assert!(tags.contains(&"contact-form"));
}
