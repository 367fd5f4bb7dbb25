/// Unique key of the users collection.
pub const EMAIL: &str = "email";
