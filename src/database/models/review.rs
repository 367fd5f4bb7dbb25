use crate::filter::{DocFilter, FindQuery};

pub const BOOK_ID: &str = "book_id";
pub const USER_EMAIL: &str = "user_email";

pub fn for_book(book_id: &str) -> FindQuery {
    FindQuery::all().filter(DocFilter::eq(BOOK_ID, book_id))
}

/// Matches reviews written by `user_email` for `book_id`, both exactly.
pub fn by_user_for_book(book_id: &str, user_email: &str) -> DocFilter {
    DocFilter::and(vec![
        DocFilter::eq(BOOK_ID, book_id),
        DocFilter::eq(USER_EMAIL, user_email),
    ])
}
