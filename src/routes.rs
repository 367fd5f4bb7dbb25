use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{books, health, reviews, users};
use crate::middleware::{require_bearer, require_email_match};
use crate::state::AppState;

/// Full application router with its shared state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(user_routes())
        .merge(book_routes(&state))
        .merge(review_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(users::create_user))
}

fn book_routes(state: &AppState) -> Router<AppState> {
    // PUT and DELETE on a book need a verified owner; GET and PATCH stay open
    let owner_only = put(books::replace_book)
        .delete(books::delete_book)
        .route_layer(from_fn_with_state(state.clone(), require_bearer));

    // layers run outermost-last: token first, then the email check
    let my_books = get(books::my_books)
        .route_layer(from_fn(require_email_match))
        .route_layer(from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).patch(books::patch_book).merge(owner_only),
        )
        .route("/books/:id/upvote", put(books::upvote_book))
        .route("/my-books", my_books)
        .route("/top-books", get(books::top_books))
        .route("/search", get(books::search_books))
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(reviews::list_reviews).post(reviews::create_review))
        .route("/reviews/check", get(reviews::check_review))
        .route(
            "/reviews/:id",
            put(reviews::update_review).delete(reviews::delete_review),
        )
}
