mod common;

use axum::http::{Method, StatusCode};

async fn seeded() -> (axum::Router, String) {
    let app = common::test_app();
    let token = common::sign_up(&app, "search@example.com").await;
    common::add_note(&app, &token, "Gym", "5pm", &["fitness"]).await;
    common::add_note(&app, &token, "Groceries", "Milk and eggs", &["home"]).await;
    common::add_note(&app, &token, "Reading", "Finish the GYMNASTICS book", &[]).await;
    common::add_note(&app, &token, "Budget", "Save 50% of bonus", &["money"]).await;
    (app, token)
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn matches_title_content_and_tags_case_insensitively() {
    let (app, token) = seeded().await;

    let (status, body) = common::send(&app, Method::GET, "/search-notes?query=gym", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalNotes"], 2);
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec!["Gym", "Reading"]);

    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=HOME", Some(&token), None).await;
    assert_eq!(titles(&body), vec!["Groceries"]);
}

#[tokio::test]
async fn search_term_is_literal() {
    let (app, token) = seeded().await;

    // `.*` would match everything as a regex
    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=.*", Some(&token), None).await;
    assert_eq!(body["totalNotes"], 0);

    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=50%25", Some(&token), None).await;
    assert_eq!(titles(&body), vec!["Budget"]);
}

#[tokio::test]
async fn empty_query_matches_unfiltered_listing() {
    let (app, token) = seeded().await;

    for query in ["", "%20%20"] {
        let (status, searched) = common::send(
            &app,
            Method::GET,
            &format!("/search-notes?query={}&page=1&limit=3", query),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, listed) = common::send(&app, Method::GET, "/get-all-notes?page=1&limit=3", Some(&token), None).await;

        assert_eq!(searched["notes"], listed["notes"]);
        assert_eq!(searched["totalNotes"], listed["totalCount"]);
        assert_eq!(searched["totalPages"], 2);
    }
}

#[tokio::test]
async fn search_paginates_with_default_page_size_ten() {
    let app = common::test_app();
    let token = common::sign_up(&app, "many@example.com").await;
    for i in 0..12 {
        common::add_note(&app, &token, &format!("todo {i}"), "body", &[]).await;
    }

    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=todo", Some(&token), None).await;
    assert_eq!(body["notes"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalNotes"], 12);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 1);

    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=todo&page=2", Some(&token), None).await;
    assert_eq!(body["notes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn trailing_slash_route_is_served() {
    let (app, token) = seeded().await;
    let (status, body) = common::send(&app, Method::GET, "/search-notes/?query=milk", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Groceries"]);
}

#[tokio::test]
async fn search_never_returns_other_users_notes() {
    let (app, _) = seeded().await;
    let other = common::sign_up(&app, "other@example.com").await;
    let (_, body) = common::send(&app, Method::GET, "/search-notes?query=gym", Some(&other), None).await;
    assert_eq!(body["totalNotes"], 0);
}

#[tokio::test]
async fn repeated_query_key_gets_json_error() {
    let (app, token) = seeded().await;
    let (status, body) = common::send(&app, Method::GET, "/search-notes?query=a&query=b", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].is_string(), "{}", body);
}
