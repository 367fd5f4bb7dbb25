//! Field names and query shapes for the three collections. Documents stay
//! free-form JSON; only the keys the API relies on are named here.

pub mod book;
pub mod review;
pub mod user;
