use crate::auth::Identity;
use crate::error::ApiError;

/// Allow a mutation only when the record's owner field names the caller.
/// A record without an owner is never mutable through this check.
pub fn ensure_owner(owner: Option<&str>, identity: &Identity) -> Result<(), ApiError> {
    match owner {
        Some(owner) if owner == identity.email => Ok(()),
        _ => {
            tracing::warn!("{} denied: not the record owner", identity.email);
            Err(ApiError::forbidden("forbidden access"))
        }
    }
}

/// Allow only when the request-supplied email is the caller's own.
pub fn ensure_email_match(requested: Option<&str>, identity: &Identity) -> Result<(), ApiError> {
    match requested {
        Some(email) if email == identity.email => Ok(()),
        _ => {
            tracing::warn!(
                "{} denied: requested email {:?} does not match",
                identity.email,
                requested
            );
            Err(ApiError::forbidden("forbidden access"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Identity {
        Identity { email: email.to_string(), subject: None }
    }

    #[test]
    fn owner_must_match_exactly() {
        let me = identity("a@x.com");
        assert!(ensure_owner(Some("a@x.com"), &me).is_ok());
        assert!(ensure_owner(Some("A@x.com"), &me).is_err());
        assert!(ensure_owner(None, &me).is_err());
    }

    #[test]
    fn missing_email_query_is_forbidden() {
        let me = identity("a@x.com");
        assert!(ensure_email_match(Some("a@x.com"), &me).is_ok());
        assert!(ensure_email_match(Some("b@x.com"), &me).is_err());
        assert!(ensure_email_match(None, &me).is_err());
    }
}
