//! API integration tests
//!
//! These run against a live server with a clean database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:9090/api/v1";
const USER_HEADER: &str = "X-Sharer-User-Id";

/// Unique email suffix so tests can be re-run against the same database
fn unique(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", tag, nanos)
}

async fn create_user(client: &Client, tag: &str) -> i64 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": tag,
            "email": format!("{}@example.com", unique(tag)),
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No user ID")
}

async fn create_item(client: &Client, owner_id: i64, name: &str) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for sharing", name),
            "available": true,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No item ID")
}

async fn create_booking(
    client: &Client,
    booker_id: i64,
    item_id: i64,
    start_h: i64,
    end_h: i64,
) -> reqwest::Response {
    let start = chrono::Utc::now() + chrono::Duration::hours(start_h);
    let end = chrono::Utc::now() + chrono::Duration::hours(end_h);

    client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, booker_id)
        .json(&json!({
            "item_id": item_id,
            "start": start,
            "end": end,
        }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore]
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
async fn test_duplicate_email_is_conflict() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("dup"));

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({"name": "First", "email": email}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({"name": "Second", "email": email}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_partial_user_update_keeps_omitted_fields() {
    let client = Client::new();
    let user_id = create_user(&client, "patchme").await;

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user_id))
        .json(&json!({"name": "Renamed"}))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed");
    assert!(body["email"]
        .as_str()
        .expect("email missing")
        .contains("patchme"));
}

#[tokio::test]
#[ignore]
async fn test_missing_sharer_header_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();
    let owner = create_user(&client, "selfbook-owner").await;
    let item = create_item(&client, owner, "Ladder").await;

    let response = create_booking(&client, owner, item, 1, 2).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_inverted_window_is_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "window-owner").await;
    let booker = create_user(&client, "window-booker").await;
    let item = create_item(&client, owner, "Tent").await;

    // end before start
    let response = create_booking(&client, booker, item, 2, 1).await;
    assert_eq!(response.status(), 400);

    // window entirely in the past
    let response = create_booking(&client, booker, item, -3, -2).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle_and_overlap() {
    let client = Client::new();
    let owner = create_user(&client, "lifecycle-owner").await;
    let booker = create_user(&client, "lifecycle-booker").await;
    let item = create_item(&client, owner, "Projector").await;

    // First booking starts WAITING
    let response = create_booking(&client, booker, item, 10, 20).await;
    assert_eq!(response.status(), 201);
    let first: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(first["status"], "WAITING");
    let first_id = first["id"].as_i64().expect("No booking ID");

    // Owner approves
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, first_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // An overlapping request is still accepted as WAITING
    let response = create_booking(&client, booker, item, 15, 25).await;
    assert_eq!(response.status(), 201);
    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["status"], "WAITING");
    let second_id = second["id"].as_i64().expect("No booking ID");

    // Approving the overlapping one fails with Conflict
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, second_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The second booking is still WAITING after the failed approval
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, second_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "WAITING");

    // Re-deciding the approved booking fails with Validation
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, first_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_only_owner_may_decide() {
    let client = Client::new();
    let owner = create_user(&client, "decide-owner").await;
    let booker = create_user(&client, "decide-booker").await;
    let stranger = create_user(&client, "decide-stranger").await;
    let item = create_item(&client, owner, "Bicycle").await;

    let response = create_booking(&client, booker, item, 1, 2).await;
    let booking: Value = response.json().await.expect("Failed to parse response");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    for caller in [booker, stranger] {
        let response = client
            .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
            .header(USER_HEADER, caller)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 403);
    }
}

#[tokio::test]
#[ignore]
async fn test_cancel_rules() {
    let client = Client::new();
    let owner = create_user(&client, "cancel-owner").await;
    let booker = create_user(&client, "cancel-booker").await;
    let item = create_item(&client, owner, "Kayak").await;

    let response = create_booking(&client, booker, item, 1, 2).await;
    let booking: Value = response.json().await.expect("Failed to parse response");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    // Owner cannot cancel someone else's booking
    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Booker cancels
    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CANCELED");

    // Canceling again fails: CANCELED is terminal
    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_list_bookings_future_filter() {
    let client = Client::new();
    let owner = create_user(&client, "list-owner").await;
    let booker = create_user(&client, "list-booker").await;
    let item = create_item(&client, owner, "Tripod").await;

    let response = create_booking(&client, booker, item, 5, 6).await;
    assert_eq!(response.status(), 201);
    let response = create_booking(&client, booker, item, 50, 60).await;
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/bookings?state=FUTURE", BASE_URL))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let bookings = body.as_array().expect("Expected an array");
    assert_eq!(bookings.len(), 2);
    // Ordered by start descending: the later window comes first
    let first_start = bookings[0]["start"].as_str().expect("start missing");
    let second_start = bookings[1]["start"].as_str().expect("start missing");
    assert!(first_start > second_start);

    // Unknown filter is rejected
    let response = client
        .get(format!("{}/bookings?state=SOON", BASE_URL))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // A user with no bookings gets an empty list, not an error
    let idle = create_user(&client, "list-idle").await;
    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, idle)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected an array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_decide_after_cancel_is_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "late-owner").await;
    let booker = create_user(&client, "late-booker").await;
    let item = create_item(&client, owner, "Chainsaw").await;

    let response = create_booking(&client, booker, item, 1, 2).await;
    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.expect("Failed to parse response");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    // Booker cancels before the owner gets around to deciding
    let response = client
        .patch(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // The late approval must not resurrect the canceled booking
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CANCELED");
}

#[tokio::test]
#[ignore]
async fn test_comment_after_completed_rental() {
    let client = Client::new();
    let owner = create_user(&client, "done-owner").await;
    let booker = create_user(&client, "done-booker").await;
    let item = create_item(&client, owner, "Heat gun").await;

    // A short rental that completes while the test waits
    let start = chrono::Utc::now() + chrono::Duration::seconds(2);
    let end = start + chrono::Duration::seconds(2);
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, booker)
        .json(&json!({"item_id": item, "start": start, "end": end}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let booking: Value = response.json().await.expect("Failed to parse response");
    let booking_id = booking["id"].as_i64().expect("No booking ID");

    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Wait until the rental window has passed
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_HEADER, booker)
        .json(&json!({"text": "Stripped paint in minutes"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["text"], "Stripped paint in minutes");
    assert_eq!(body["author_name"], "done-booker");

    // The owner's detail view now shows the finished window and the comment
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["last_booking"].is_string());
    assert_eq!(body["comments"].as_array().expect("Expected an array").len(), 1);

    // A non-owner viewing the same item does not see the booking window
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, booker)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["last_booking"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_completed_rental() {
    let client = Client::new();
    let owner = create_user(&client, "comment-owner").await;
    let booker = create_user(&client, "comment-booker").await;
    let stranger = create_user(&client, "comment-stranger").await;
    let item = create_item(&client, owner, "Sander").await;

    // No booking at all
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_HEADER, stranger)
        .json(&json!({"text": "Great sander"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // A WAITING booking is not enough
    let response = create_booking(&client, booker, item, 1, 2).await;
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_HEADER, booker)
        .json(&json!({"text": "Great sander"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_item_search_and_update() {
    let client = Client::new();
    let owner = create_user(&client, "search-owner").await;
    let tag = unique("widget");
    let item = create_item(&client, owner, &tag).await;

    // Substring search, case-insensitive
    let response = client
        .get(format!("{}/items/search?text={}", BASE_URL, tag.to_uppercase()))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected an array").len(), 1);

    // Blank text yields an empty list
    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected an array").len(), 0);

    // Unlisting the item hides it from search
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, owner)
        .json(&json!({"available": false}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/items/search?text={}", BASE_URL, tag))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected an array").len(), 0);

    // A non-owner updating the item gets NotFound
    let other = create_user(&client, "search-other").await;
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, other)
        .json(&json!({"name": "Hijacked"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_requests_and_answers() {
    let client = Client::new();
    let requester = create_user(&client, "req-requester").await;
    let answerer = create_user(&client, "req-answerer").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_HEADER, requester)
        .json(&json!({"description": "Need a pressure washer"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_i64().expect("No request ID");

    // Answer the request with an item
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, answerer)
        .json(&json!({
            "name": "Pressure washer",
            "description": "2000 psi",
            "available": true,
            "request_id": request_id,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // The requester sees the answer on their request
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_HEADER, requester)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().expect("Expected an array").len(), 1);

    // The answerer sees the request under /requests/all
    let response = client
        .get(format!("{}/requests/all", BASE_URL))
        .header(USER_HEADER, answerer)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}
