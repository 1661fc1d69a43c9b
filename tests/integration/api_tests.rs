//! API integration tests
//!
//! These run against a live server with a seeded admin account:
//! start one locally, then `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin bearer token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a member account (no staff rights) and log it in
async fn get_member_token(client: &Client, login: &str) -> String {
    let admin_token = get_admin_token(client).await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&json!({
            "login": login,
            "password": "helloworld",
            "account_type": "member"
        }))
        .send()
        .await
        .expect("Failed to create member");
    assert!(
        response.status() == 201 || response.status() == 409,
        "Unexpected status creating member: {}",
        response.status()
    );

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "helloworld"
        }))
        .send()
        .await
        .expect("Failed to log member in");
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a book with one copy, returning (book_id, copy_id)
async fn create_book_with_copy(client: &Client, token: &str) -> (i64, String) {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Integration Test Book",
            "summary": "Very long book summary. Very, very long.",
            "isbn": "1234567890123"
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    let book_id = body["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "imprint": "Test Imprint 2042" }))
        .send()
        .await
        .expect("Failed to create copy");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse copy response");
    let copy_id = body["id"].as_str().expect("No copy ID").to_string();

    (book_id, copy_id)
}

/// Helper to delete a book and its copy
async fn delete_book_with_copy(client: &Client, token: &str, book_id: i64, copy_id: &str) {
    let _ = client
        .delete(format!("{}/copies/{}", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_author_list_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert!(body["is_paginated"].is_boolean());
    assert_eq!(body["per_page"], 10);
}

#[tokio::test]
#[ignore]
async fn test_author_pagination_is_ten() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Thirteen authors give a full first page and a remainder of three
    let mut author_ids = Vec::new();
    for i in 0..13 {
        let response = client
            .post(format!("{}/authors", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "first_name": format!("Charles {}", i),
                "last_name": format!("Pagination {}", i)
            }))
            .send()
            .await
            .expect("Failed to create author");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("Failed to parse response");
        author_ids.push(body["id"].as_i64().expect("No author ID"));
    }

    let response = client
        .get(format!("{}/authors?name=pagination", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_paginated"], true);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let response = client
        .get(format!("{}/authors?name=pagination&page=2", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    // Cleanup
    for id in author_ids {
        let _ = client
            .delete(format!("{}/authors/{}", BASE_URL, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_renewal_permission_matrix() {
    let client = Client::new();
    let admin_token = get_admin_token(&client).await;
    let member_token = get_member_token(&client, "renewal_matrix_member").await;
    let (book_id, copy_id) = create_book_with_copy(&client, &admin_token).await;

    // Unauthenticated
    let response = client
        .get(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Authenticated without the permission
    let response = client
        .get(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", member_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // With the permission
    let response = client
        .get(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Unknown copy
    let response = client
        .get(format!(
            "{}/copies/00000000-0000-0000-0000-000000000000/renewal",
            BASE_URL
        ))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    delete_book_with_copy(&client, &admin_token, book_id, &copy_id).await;
}

#[tokio::test]
#[ignore]
async fn test_renewal_proposes_three_weeks_ahead() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (book_id, copy_id) = create_book_with_copy(&client, &token).await;

    let response = client
        .get(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    let expected = (Utc::now().date_naive() + Duration::weeks(3)).to_string();
    assert_eq!(body["proposed_due_back"], expected.as_str());

    delete_book_with_copy(&client, &token, book_id, &copy_id).await;
}

#[tokio::test]
#[ignore]
async fn test_renewal_date_validation() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (book_id, copy_id) = create_book_with_copy(&client, &token).await;

    let today = Utc::now().date_naive();

    // A week in the past
    let response = client
        .post(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": (today - Duration::weeks(1)).to_string() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid date - renewal in past");

    // Five weeks ahead
    let response = client
        .post(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": (today + Duration::weeks(5)).to_string() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid date - renewal more than 4 weeks ahead");

    // Two weeks ahead is accepted and applied
    let valid_date = (today + Duration::weeks(2)).to_string();
    let response = client
        .post(format!("{}/copies/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": valid_date }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due_back"], valid_date.as_str());

    delete_book_with_copy(&client, &token, book_id, &copy_id).await;
}

#[tokio::test]
#[ignore]
async fn test_author_create_requires_permission() {
    let client = Client::new();
    let member_token = get_member_token(&client, "author_create_member").await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token))
        .json(&json!({
            "first_name": "Charles",
            "last_name": "Dieterle"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_author_create_and_detail() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "John",
            "last_name": "Smith",
            "date_of_birth": "1963-05-20",
            "date_of_death": "2024-03-04"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let author_id = body["id"].as_i64().expect("No author ID");

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["last_name"], "Smith");
    assert!(body["books"].is_array());

    // Cleanup
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats?keyword=history", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_number());
    assert!(body["copies"].is_number());
    assert!(body["copies_available"].is_number());
    assert!(body["authors"].is_number());
    assert!(body["books_matching"].is_number());
    assert!(body["genres_matching"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_book_list_pagination_is_three() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["per_page"], 3);
    assert!(body["items"].as_array().unwrap().len() <= 3);
}
