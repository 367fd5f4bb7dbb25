use crate::filter::{DocFilter, FindQuery};

pub const TITLE: &str = "book_title";
pub const AUTHOR: &str = "book_author";
pub const STATUS: &str = "reading_status";
/// Owner of the book; compared against the verified identity on mutation.
pub const OWNER: &str = "user_email";
pub const UPVOTE: &str = "upvote";

pub const TOP_BOOKS_LIMIT: i64 = 8;

/// Books whose title, author or reading status contains `term`, ignoring case.
pub fn search(term: &str) -> FindQuery {
    FindQuery::all().filter(DocFilter::or(
        [TITLE, AUTHOR, STATUS]
            .into_iter()
            .map(|field| DocFilter::contains(field, term))
            .collect(),
    ))
}

pub fn owned_by(email: &str) -> FindQuery {
    FindQuery::all().filter(DocFilter::eq(OWNER, email))
}

pub fn top_voted() -> FindQuery {
    FindQuery::all().sort_desc(UPVOTE).limit(TOP_BOOKS_LIMIT)
}
