//! Note endpoint behavior, exercised through the full router.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{titles, TestApp};

fn timestamp(value: &serde_json::Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/api/notes",
            &json!({"title": "Test Note", "content": "This is a test note"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Note created successfully");

    let note = &body["data"];
    let id = Uuid::parse_str(note["id"].as_str().unwrap()).unwrap();
    assert_eq!(id.get_version_num(), 4);
    assert_eq!(note["title"], "Test Note");
    assert_eq!(note["category"], "general");
    assert_eq!(note["tags"], json!([]));
    assert_eq!(note["isPinned"], false);
    assert_eq!(note["isArchived"], false);
    assert_eq!(note["priority"], "medium");
    assert_eq!(note["createdAt"], note["updatedAt"]);
}

#[tokio::test]
async fn test_create_ignores_client_timestamps() {
    let app = TestApp::new();
    let note = app
        .create(json!({
            "title": "T",
            "content": "C",
            "createdAt": "2001-01-01T00:00:00Z",
            "id": "123e4567-e89b-12d3-a456-426614174000"
        }))
        .await;
    assert_ne!(note["createdAt"], "2001-01-01T00:00:00Z");
    assert_ne!(note["id"], "123e4567-e89b-12d3-a456-426614174000");
}

#[tokio::test]
async fn test_create_rejects_whitespace_title() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json("/api/notes", &json!({"title": "   ", "content": "Valid"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "Validation Error");
    assert!(body["message"].as_str().unwrap().contains("empty"));
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_create_rejects_unknown_priority() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/api/notes",
            &json!({"title": "T", "content": "C", "priority": "urgent"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Priority must be"));
    assert_eq!(body["received"], "urgent");
}

#[tokio::test]
async fn test_create_validation_messages() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api/notes", &json!({"title": "T"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and content are required");

    let (_, body) = app
        .post_json("/api/notes", &json!({"title": 5, "content": "C"}))
        .await;
    assert_eq!(body["message"], "Title and content must be strings");

    let long_title = "x".repeat(201);
    let (_, body) = app
        .post_json("/api/notes", &json!({"title": long_title, "content": "C"}))
        .await;
    assert_eq!(body["message"], "Title must be less than 200 characters");
    assert_eq!(body["currentLength"], 201);

    let (_, body) = app
        .post_json(
            "/api/notes",
            &json!({"title": "T", "content": "C", "tags": ["ok", 1]}),
        )
        .await;
    assert_eq!(body["message"], "Tags must be an array of strings");

    let (_, body) = app
        .post_json(
            "/api/notes",
            &json!({"title": "T", "content": "C", "category": "c".repeat(51)}),
        )
        .await;
    assert_eq!(
        body["message"],
        "Category must be a string with less than 50 characters"
    );

    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_default_listing_excludes_archived() {
    let app = TestApp::new();
    app.create(json!({"title": "Active", "content": "C"})).await;
    app.create(json!({"title": "Old", "content": "C", "isArchived": true}))
        .await;

    let (status, body) = app.get("/api/notes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Active"]);
    assert_eq!(body["pagination"]["totalItems"], 1);

    let (_, body) = app.get("/api/notes?archived=true").await;
    assert_eq!(titles(&body), vec!["Old"]);
}

#[tokio::test]
async fn test_pinned_notes_come_first_for_every_sort() {
    let app = TestApp::new();
    app.create(json!({"title": "a", "content": "C", "category": "z", "priority": "high"}))
        .await;
    app.create(json!({"title": "b", "content": "C", "category": "y", "priority": "low", "isPinned": true}))
        .await;
    app.create(json!({"title": "c", "content": "C", "category": "x", "priority": "medium"}))
        .await;
    app.create(json!({"title": "d", "content": "C", "category": "w", "priority": "low", "isPinned": true}))
        .await;

    for sort_by in ["title", "createdAt", "updatedAt", "category", "priority"] {
        for sort_order in ["ASC", "DESC"] {
            let uri = format!("/api/notes?sortBy={}&sortOrder={}", sort_by, sort_order);
            let (status, body) = app.get(&uri).await;
            assert_eq!(status, StatusCode::OK);

            let pinned: Vec<bool> = body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|n| n["isPinned"].as_bool().unwrap())
                .collect();
            assert_eq!(pinned, vec![true, true, false, false], "{}", uri);
        }
    }

    let (_, body) = app.get("/api/notes?sortBy=title&sortOrder=asc").await;
    assert_eq!(titles(&body), vec!["b", "d", "a", "c"]);

    let (_, body) = app.get("/api/notes?sortBy=title&sortOrder=desc").await;
    assert_eq!(titles(&body), vec!["d", "b", "c", "a"]);

    let (_, body) = app.get("/api/notes?sortBy=priority&sortOrder=DESC").await;
    let by_priority = titles(&body);
    assert_eq!(&by_priority[2..], ["a", "c"]);
}

#[tokio::test]
async fn test_unknown_sort_field_falls_back() {
    let app = TestApp::new();
    app.create(json!({"title": "only", "content": "C"})).await;
    let (status, body) = app.get("/api/notes?sortBy=password&sortOrder=sideways").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["only"]);
}

#[tokio::test]
async fn test_listing_filters() {
    let app = TestApp::new();
    app.create(json!({"title": "w1", "content": "C", "category": "work", "priority": "high"}))
        .await;
    app.create(json!({"title": "w2", "content": "C", "category": "work", "isPinned": true}))
        .await;
    app.create(json!({"title": "p1", "content": "C", "category": "personal", "priority": "high"}))
        .await;

    let (_, body) = app.get("/api/notes?category=work&sortBy=title&sortOrder=ASC").await;
    assert_eq!(titles(&body), vec!["w2", "w1"]);

    let (_, body) = app.get("/api/notes?pinned=false&sortBy=title&sortOrder=ASC").await;
    assert_eq!(titles(&body), vec!["p1", "w1"]);

    let (_, body) = app.get("/api/notes?priority=high&sortBy=title&sortOrder=ASC").await;
    assert_eq!(titles(&body), vec!["p1", "w1"]);

    let (status, body) = app.get("/api/notes?priority=urgent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Priority must be"));
}

#[tokio::test]
async fn test_search_parameter_ignores_other_filters() {
    let app = TestApp::new();
    app.create(json!({"title": "Meeting", "content": "C", "category": "work"}))
        .await;
    app.create(json!({"title": "Meeting prep", "content": "C", "category": "home"}))
        .await;
    app.create(json!({"title": "Meeting old", "content": "C", "isArchived": true}))
        .await;

    let (status, body) = app
        .get("/api/notes?search=Meeting&category=work&archived=true")
        .await;
    assert_eq!(status, StatusCode::OK);
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec!["Meeting", "Meeting prep"]);
    assert_eq!(body["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn test_pagination_metadata() {
    let app = TestApp::new();
    for i in 0..25 {
        app.create(json!({"title": format!("note {:02}", i), "content": "C"}))
            .await;
    }

    let (status, body) = app
        .get("/api/notes?page=3&limit=10&sortBy=title&sortOrder=ASC")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 3, "totalPages": 3, "totalItems": 25, "itemsPerPage": 10})
    );
    assert_eq!(
        titles(&body),
        (20..25).map(|i| format!("note {:02}", i)).collect::<Vec<_>>()
    );

    let (_, body) = app.get("/api/notes?page=9").await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalItems"], 25);
}

#[tokio::test]
async fn test_pagination_rejects_non_positive_values() {
    let app = TestApp::new();
    for uri in [
        "/api/notes?page=0",
        "/api/notes?limit=0",
        "/api/notes?limit=-5",
        "/api/notes?page=abc",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("must be a positive integer"));
    }
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = TestApp::new();
    app.create(json!({"title": "Groceries", "content": "buy milk"}))
        .await;
    app.create(json!({"title": "Dairy", "content": "milk and cheese", "isPinned": true}))
        .await;
    app.create(json!({"title": "Archived milk", "content": "C", "isArchived": true}))
        .await;
    app.create(json!({"title": "Unrelated", "content": "nothing"}))
        .await;

    let (status, body) = app.get("/api/notes/search?q=milk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "milk");
    assert_eq!(body["count"], 2);
    assert_eq!(titles(&body)[0], "Dairy");

    let (_, body) = app.get("/api/notes/search?q=Groceries").await;
    assert_eq!(titles(&body), vec!["Groceries"]);

    // case-sensitive
    let (_, body) = app.get("/api/notes/search?q=MILK").await;
    assert_eq!(body["count"], 0);

    for uri in ["/api/notes/search", "/api/notes/search?q="] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Search query is required");
    }
}

#[tokio::test]
async fn test_get_note() {
    let app = TestApp::new();
    let note = app.create(json!({"title": "T", "content": "C"})).await;
    let id = note["id"].as_str().unwrap();

    let (status, body) = app.get(&format!("/api/notes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], note);

    let (status, body) = app.get(&format!("/api/notes/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");
}

#[tokio::test]
async fn test_update_note() {
    let app = TestApp::new();
    let note = app
        .create(json!({"title": "Old", "content": "C", "category": "work", "tags": ["a"]}))
        .await;
    let id = note["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (status, body) = app
        .put_json(
            &format!("/api/notes/{}", id),
            &json!({"title": "New", "content": "C2", "priority": "low"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note updated successfully");
    let updated = &body["data"];
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["priority"], "low");
    assert_eq!(updated["category"], "work");
    assert_eq!(updated["tags"], json!(["a"]));
    assert_eq!(updated["createdAt"], note["createdAt"]);
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&note["updatedAt"]));

    let (status, body) = app
        .put_json(&format!("/api/notes/{}", id), &json!({"title": "Only title"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and content are required");
}

#[tokio::test]
async fn test_update_unknown_and_malformed_ids() {
    let app = TestApp::new();
    let payload = json!({"title": "T", "content": "C"});

    let (status, body) = app
        .put_json(&format!("/api/notes/{}", Uuid::new_v4()), &payload)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");

    let (status, body) = app.put_json("/api/notes/not-a-uuid", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid note ID format");
    assert_eq!(body["received"], "not-a-uuid");
    assert!(body["expected"].as_str().unwrap().contains("UUID format"));
}

#[tokio::test]
async fn test_malformed_ids_rejected_on_every_id_route() {
    let app = TestApp::new();
    let bad = "/api/notes/1234";
    assert_eq!(app.get(bad).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(app.delete(bad).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(app.patch(&format!("{}/pin", bad)).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.patch(&format!("{}/archive", bad)).await.0,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = TestApp::new();
    let note = app.create(json!({"title": "T", "content": "C"})).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Note deleted successfully"}));

    assert_eq!(app.get(&uri).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_pin_twice() {
    let app = TestApp::new();
    let note = app.create(json!({"title": "T", "content": "C"})).await;
    let uri = format!("/api/notes/{}/pin", note["id"].as_str().unwrap());

    let (status, body) = app.patch(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isPinned"], true);
    assert_eq!(body["message"], "Note pinned successfully");

    let (_, body) = app.patch(&uri).await;
    assert_eq!(body["data"]["isPinned"], false);
    assert_eq!(body["message"], "Note unpinned successfully");
}

#[tokio::test]
async fn test_toggle_archive() {
    let app = TestApp::new();
    let note = app.create(json!({"title": "T", "content": "C"})).await;
    let uri = format!("/api/notes/{}/archive", note["id"].as_str().unwrap());

    let (_, body) = app.patch(&uri).await;
    assert_eq!(body["data"]["isArchived"], true);
    assert_eq!(body["message"], "Note archived successfully");
    assert_eq!(app.get("/api/notes").await.1["data"], json!([]));

    let (_, body) = app.patch(&uri).await;
    assert_eq!(body["data"]["isArchived"], false);
    assert_eq!(body["message"], "Note unarchived successfully");

    let missing = format!("/api/notes/{}/archive", Uuid::new_v4());
    assert_eq!(app.patch(&missing).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggles_refresh_updated_at() {
    let app = TestApp::new();
    let note = app.create(json!({"title": "T", "content": "C"})).await;
    let id = note["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (_, pinned) = app.patch(&format!("/api/notes/{}/pin", id)).await;
    let pinned = &pinned["data"];
    assert!(timestamp(&pinned["updatedAt"]) > timestamp(&note["updatedAt"]));
    assert_eq!(pinned["createdAt"], note["createdAt"]);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let (_, archived) = app.patch(&format!("/api/notes/{}/archive", id)).await;
    let archived = &archived["data"];
    assert!(timestamp(&archived["updatedAt"]) > timestamp(&pinned["updatedAt"]));
    assert_eq!(archived["createdAt"], note["createdAt"]);
}

#[tokio::test]
async fn test_categories_are_distinct_sorted_and_stable() {
    let app = TestApp::new();
    app.create(json!({"title": "1", "content": "C", "category": "work"}))
        .await;
    app.create(json!({"title": "2", "content": "C", "category": "ideas"}))
        .await;
    app.create(json!({"title": "3", "content": "C", "category": "work"}))
        .await;
    app.create(json!({"title": "4", "content": "C", "category": "attic", "isArchived": true}))
        .await;

    let (status, first) = app.get("/api/notes/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"], json!(["attic", "ideas", "work"]));

    let (_, second) = app.get("/api/notes/categories").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_notes_by_category() {
    let app = TestApp::new();
    app.create(json!({"title": "a", "content": "C", "category": "work"}))
        .await;
    app.create(json!({"title": "b", "content": "C", "category": "work", "isPinned": true}))
        .await;
    app.create(json!({"title": "c", "content": "C", "category": "work", "isArchived": true}))
        .await;
    app.create(json!({"title": "d", "content": "C", "category": "home"}))
        .await;

    let (status, body) = app.get("/api/notes/category/work").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "work");
    assert_eq!(body["count"], 2);
    assert_eq!(titles(&body)[0], "b");

    let (_, body) = app.get("/api/notes/category/none").await;
    assert_eq!(body["count"], 0);
}
