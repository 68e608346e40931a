//! Authorization policies gating write access to resources.

use crate::error::DomainError;

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub username: String,
}

/// Whether an operation only reads (GET, HEAD, OPTIONS) or mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Permission policy attached to a resource.
///
/// Checks run in two phases: [`Policy::check`] before any object is
/// loaded, then [`Policy::check_object`] once the target is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone may read; writes need an authenticated caller.
    AuthenticatedOrReadOnly,
    /// Anyone may read; writes need an authenticated caller who authored
    /// the object.
    AuthorOrReadOnly,
    /// Every operation needs an authenticated caller.
    Authenticated,
}

impl Policy {
    /// View-level check.
    pub fn check(self, access: Access, caller: Option<&Caller>) -> Result<(), DomainError> {
        match (self, access, caller) {
            (_, _, Some(_)) => Ok(()),
            (Policy::Authenticated, _, None) => Err(DomainError::AuthenticationRequired),
            (_, Access::Read, None) => Ok(()),
            (_, Access::Write, None) => Err(DomainError::AuthenticationRequired),
        }
    }

    /// Object-level check against the object's owner.
    pub fn check_object(
        self,
        access: Access,
        caller: Option<&Caller>,
        owner_id: i32,
    ) -> Result<(), DomainError> {
        self.check(access, caller)?;
        match (self, access, caller) {
            (Policy::AuthorOrReadOnly, Access::Write, Some(caller))
                if caller.user_id != owner_id =>
            {
                Err(DomainError::PermissionDenied)
            }
            _ => Ok(()),
        }
    }

    /// View-level check that also demands an authenticated caller.
    pub fn require(self, access: Access, caller: Option<&Caller>) -> Result<&Caller, DomainError> {
        self.check(access, caller)?;
        caller.ok_or(DomainError::AuthenticationRequired)
    }

    /// Shorthand for `require(Access::Write, ..)`.
    pub fn writer(self, caller: Option<&Caller>) -> Result<&Caller, DomainError> {
        self.require(Access::Write, caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i32) -> Caller {
        Caller {
            user_id: id,
            username: format!("user{id}"),
        }
    }

    #[test]
    fn test_reads_are_open_except_authenticated_policy() {
        assert!(Policy::AuthenticatedOrReadOnly.check(Access::Read, None).is_ok());
        assert!(Policy::AuthorOrReadOnly.check(Access::Read, None).is_ok());
        assert!(matches!(
            Policy::Authenticated.check(Access::Read, None),
            Err(DomainError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_anonymous_writes_rejected() {
        for policy in [
            Policy::AuthenticatedOrReadOnly,
            Policy::AuthorOrReadOnly,
            Policy::Authenticated,
        ] {
            assert!(matches!(
                policy.check(Access::Write, None),
                Err(DomainError::AuthenticationRequired)
            ));
            assert!(policy.writer(None).is_err());
        }
    }

    #[test]
    fn test_author_only_object_writes() {
        let alice = caller(1);
        let bob = caller(2);

        assert!(
            Policy::AuthorOrReadOnly
                .check_object(Access::Write, Some(&alice), 1)
                .is_ok()
        );
        assert!(matches!(
            Policy::AuthorOrReadOnly.check_object(Access::Write, Some(&bob), 1),
            Err(DomainError::PermissionDenied)
        ));
        assert!(
            Policy::AuthorOrReadOnly
                .check_object(Access::Read, Some(&bob), 1)
                .is_ok()
        );
        assert!(
            Policy::AuthorOrReadOnly
                .check_object(Access::Read, None, 1)
                .is_ok()
        );
    }

    #[test]
    fn test_authenticated_or_read_only_ignores_ownership() {
        let bob = caller(2);
        assert!(
            Policy::AuthenticatedOrReadOnly
                .check_object(Access::Write, Some(&bob), 1)
                .is_ok()
        );
    }

    #[test]
    fn test_writer_returns_caller() {
        let alice = caller(1);
        let writer = Policy::AuthorOrReadOnly.writer(Some(&alice)).unwrap();
        assert_eq!(writer.username, "user1");
    }

    #[test]
    fn test_require_demands_caller_for_any_access() {
        let alice = caller(1);
        assert!(matches!(
            Policy::AuthorOrReadOnly.require(Access::Read, None),
            Err(DomainError::AuthenticationRequired)
        ));
        assert_eq!(
            Policy::Authenticated
                .require(Access::Read, Some(&alice))
                .unwrap()
                .user_id,
            1
        );
    }
}
