//! Identity boundary.
//!
//! The real account system lives elsewhere; the core only needs a nullable
//! user id. No user means no persistence, but calculation always works.

/// Supplies the current user, if any.
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<String>;
}

/// No signed-in user.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn current_user(&self) -> Option<String> {
        None
    }
}

/// A fixed, always-signed-in user (CLI `--user` flag, tests).
#[derive(Clone, Debug)]
pub struct FixedUser(pub String);

impl Identity for FixedUser {
    fn current_user(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
