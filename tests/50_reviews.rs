mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{create_book, get, send, token_for};
use virtual_bookshelf::database::Collection;

async fn create_review(router: &axum::Router, book_id: &str, email: &str, text: &str) -> String {
    let res = send(
        router,
        Method::POST,
        "/reviews",
        Some(json!({"book_id": book_id, "user_email": email, "review": text, "rating": 4})),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["acknowledged"], true);
    res.body["insertedId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn reviews_are_listed_per_book() {
    let (router, _) = common::router();
    create_review(&router, "book-1", "a@x.com", "great").await;
    create_review(&router, "book-1", "b@x.com", "fine").await;
    create_review(&router, "book-2", "a@x.com", "meh").await;

    let res = get(&router, "/reviews?book_id=book-1").await;
    assert_eq!(res.status, StatusCode::OK);
    let reviews = res.body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert!(reviews.iter().all(|r| r["book_id"] == "book-1"));

    let res = get(&router, "/reviews?book_id=none").await;
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn listing_without_book_id_is_rejected() {
    let (router, _) = common::router();
    let res = get(&router, "/reviews").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviews_update_and_delete_without_ownership() {
    let (router, store) = common::router();
    let id = create_review(&router, "book-1", "a@x.com", "great").await;
    let uri = format!("/reviews/{}", id);

    let res = send(&router, Method::PUT, &uri, Some(json!({"review": "changed my mind", "rating": 2})), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["matchedCount"], 1);
    assert_eq!(res.body["modifiedCount"], 1);

    let res = get(&router, "/reviews?book_id=book-1").await;
    assert_eq!(res.body[0]["review"], "changed my mind");
    assert_eq!(res.body[0]["user_email"], "a@x.com");

    let res = send(&router, Method::DELETE, &uri, None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"acknowledged": true, "deletedCount": 1}));
    assert_eq!(store.len(Collection::Reviews).await, 0);

    let res = send(&router, Method::DELETE, &uri, None, None).await;
    assert_eq!(res.body["deletedCount"], 0);

    let res = send(&router, Method::DELETE, "/reviews/nope", None, None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_requires_both_fields_to_match() {
    let (router, _) = common::router();
    create_review(&router, "book-1", "a@x.com", "great").await;

    let res = get(&router, "/reviews/check?book_id=book-1&user_email=a@x.com").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"exist": true}));

    let res = get(&router, "/reviews/check?book_id=book-1&user_email=b@x.com").await;
    assert_eq!(res.body, json!({"exist": false}));

    let res = get(&router, "/reviews/check?book_id=book-2&user_email=a@x.com").await;
    assert_eq!(res.body, json!({"exist": false}));

    let res = get(&router, "/reviews/check?book_id=book-1&user_email=A@x.com").await;
    assert_eq!(res.body, json!({"exist": false}));
}

#[tokio::test]
async fn deleting_a_book_leaves_its_reviews() {
    let (router, store) = common::router();
    let book_id = create_book(&router, json!({"book_title": "Dune", "user_email": "a@x.com"})).await;
    create_review(&router, &book_id, "b@x.com", "classic").await;

    let res = send(&router, Method::DELETE, &format!("/books/{}", book_id), None, Some(token_for("a@x.com").as_str())).await;
    assert_eq!(res.status, StatusCode::OK);

    assert_eq!(store.len(Collection::Books).await, 0);
    let res = get(&router, &format!("/reviews?book_id={}", book_id)).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);
}
