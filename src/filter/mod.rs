pub mod types;
pub mod filter_match;
pub mod filter_order;
pub mod filter_where;

pub use types::*;
pub use filter_where::FilterWhere;
