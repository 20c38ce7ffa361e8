use serde::{Deserialize, Serialize};
use std::fmt;

/// A user record as stored by the repository and sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_b64: Option<String>,
    #[serde(default)]
    pub chat_phrase: Option<String>,
}

impl User {
    /// Copy of this record carrying `identifier` in place of its UUID
    pub fn with_identifier(&self, identifier: impl Into<String>) -> User {
        User {
            uuid: identifier.into(),
            ..self.clone()
        }
    }
}

/// Identifier supplied by a caller, interpreted in the space its
/// authorization allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentifier {
    ByUuid(String),
    ByIndex(i64),
}

impl CallerIdentifier {
    /// Index used for anything that does not parse; never matches a user
    pub const MISSING_INDEX: i64 = -1;

    /// Authorized callers address users by UUID, everyone else by position.
    /// Unparsable positions fall back to [`Self::MISSING_INDEX`].
    pub fn parse(raw: &str, authorized: bool) -> Self {
        if authorized {
            CallerIdentifier::ByUuid(raw.to_string())
        } else {
            CallerIdentifier::ByIndex(parse_index(raw).unwrap_or(Self::MISSING_INDEX))
        }
    }

    /// The identifier echoed back to this caller
    pub fn exposed(&self) -> String {
        match self {
            CallerIdentifier::ByUuid(uuid) => uuid.clone(),
            CallerIdentifier::ByIndex(index) => index.to_string(),
        }
    }
}

pub(crate) fn parse_index(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// Where an update should land once the caller's identifier space is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateTarget {
    /// Replace the user with this UUID; the record carries the same UUID
    ByUuid(User),
    /// Replace the user at this position, keeping its stored UUID
    ByIndex(usize, User),
}

/// A caller identifier resolved against the repository.
///
/// The canonical UUID is only reachable through [`Self::canonical_uuid`].
/// Not serializable; `Debug` prints the exposed identifier only.
#[derive(Clone)]
pub struct ResolvedIdentity {
    canonical_uuid: String,
    exposed_identifier: String,
    user: User,
}

impl ResolvedIdentity {
    pub(crate) fn new(user: User, exposed_identifier: String) -> Self {
        Self {
            canonical_uuid: user.uuid.clone(),
            exposed_identifier,
            user,
        }
    }

    /// UUID for storage and cache keys. Never send this to the caller.
    pub fn canonical_uuid(&self) -> &str {
        &self.canonical_uuid
    }

    pub fn exposed_identifier(&self) -> &str {
        &self.exposed_identifier
    }

    pub fn name(&self) -> &str {
        &self.user.name
    }

    pub fn profile_b64(&self) -> Option<&str> {
        self.user.profile_b64.as_deref()
    }

    /// The record as this caller may see it
    pub fn visible_user(&self) -> User {
        self.user.with_identifier(self.exposed_identifier.clone())
    }
}

impl fmt::Debug for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedIdentity")
            .field("exposed_identifier", &self.exposed_identifier)
            .finish_non_exhaustive()
    }
}
