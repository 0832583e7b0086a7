//! Caller identity.

use common::UserId;

use crate::error::{CallError, Result};

/// The authenticated caller of an operation.
///
/// Produced by the transport layer from a verified token. `None` at an
/// operation boundary means the call was anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub uid: UserId,
    pub admin: bool,
}

impl AuthContext {
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            admin: false,
        }
    }

    pub fn admin(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            admin: true,
        }
    }
}

/// Rejects anonymous callers with the operation's own message.
pub fn require_auth<'a>(
    auth: Option<&'a AuthContext>,
    message: &str,
) -> Result<&'a AuthContext> {
    auth.ok_or_else(|| CallError::unauthenticated(message))
}

/// Rejects anonymous callers and callers without the admin flag, each with
/// the operation's own message.
pub fn require_admin<'a>(
    auth: Option<&'a AuthContext>,
    login_message: &str,
    permission_message: &str,
) -> Result<&'a AuthContext> {
    let auth = require_auth(auth, login_message)?;
    if !auth.admin {
        return Err(CallError::permission_denied(permission_message));
    }
    Ok(auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_require_auth_rejects_anonymous() {
        let err = require_auth(None, "You must be authenticated.").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, "You must be authenticated.");

        let caller = AuthContext::new("user-1");
        assert!(require_auth(Some(&caller), "ignored").is_ok());
    }

    #[test]
    fn test_require_admin_rejects_plain_users() {
        let caller = AuthContext::new("user-1");
        let err = require_admin(Some(&caller), "log in", "not allowed").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert_eq!(err.message, "not allowed");

        let admin = AuthContext::admin("admin-1");
        assert!(require_admin(Some(&admin), "log in", "not allowed").is_ok());

        let err = require_admin(None, "log in", "not allowed").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, "log in");
    }
}
