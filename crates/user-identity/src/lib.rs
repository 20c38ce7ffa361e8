//! User identity resolution
//!
//! Users are addressable in two identifier spaces. Authorized callers name a
//! user by its canonical UUID; everyone else names it by its position in the
//! repository's ordered list. [`IdentityResolver`] is the single place that
//! picks the space and translates results back, so the canonical UUID is never
//! echoed to an unauthorized caller.

mod error;
mod repository;
mod resolver;
mod types;

pub use error::{RepositoryError, ResolveError, Result};
pub use repository::{JsonUserRepository, UserRepository};
pub use resolver::IdentityResolver;
pub use types::{CallerIdentifier, ResolvedIdentity, UpdateTarget, User};
