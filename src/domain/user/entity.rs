//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::UserValidationError;

/// User identifier - positive integer assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct UserId(u32);

impl UserId {
    /// Create a new UserId, rejecting the unassigned value 0
    pub fn new(id: u32) -> Result<Self, UserValidationError> {
        if id == 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Get the inner numeric value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for u32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted user record
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    nickname: String,
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Rebuild a user from stored columns
    pub fn restore(
        id: UserId,
        nickname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply resolved changes in place
    pub fn apply(&mut self, changes: &UserChanges) {
        if let Some(nickname) = &changes.nickname {
            self.nickname = nickname.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            self.password_hash = hash.clone();
        }
        self.updated_at = changes.updated_at;
    }
}

/// A user ready to be inserted; storage assigns the ID
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column-level changes for an existing user, password already hashed
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Untrusted user payload as received from a client
#[derive(Clone, Default, Deserialize)]
pub struct UserInput {
    /// Ignored on write; storage assigns identities
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserInput {
    pub fn new(
        nickname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: None,
            nickname: nickname.into(),
            email: email.into(),
            password: password.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl std::fmt::Debug for UserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInput")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Partial profile update; only provided fields change
#[derive(Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl From<UserInput> for UserPatch {
    fn from(input: UserInput) -> Self {
        Self {
            nickname: Some(input.nickname),
            email: Some(input.email),
            password: Some(input.password),
        }
    }
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        let now = Utc::now();
        User::restore(UserId::new(1).unwrap(), "alice", "a@x.com", "hashed_password", now, now)
    }

    #[test]
    fn test_user_id_valid() {
        let id = UserId::new(7).unwrap();
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_user_id_rejects_zero() {
        assert_eq!(UserId::new(0), Err(UserValidationError::InvalidId));
        assert!(serde_json::from_str::<UserId>("0").is_err());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"nickname\":\"alice\""));
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_apply_changes() {
        let mut user = create_test_user();
        let later = user.updated_at() + chrono::Duration::seconds(5);

        user.apply(&UserChanges {
            nickname: None,
            email: Some("new@x.com".to_string()),
            password_hash: Some("new_hash".to_string()),
            updated_at: later,
        });

        assert_eq!(user.nickname(), "alice");
        assert_eq!(user.email(), "new@x.com");
        assert_eq!(user.password_hash(), "new_hash");
        assert_eq!(user.updated_at(), later);
    }

    #[test]
    fn test_input_debug_hides_password() {
        let input = UserInput::new("alice", "a@x.com", "secret");
        let debug = format!("{:?}", input);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("[hidden]"));
    }

    #[test]
    fn test_input_deserialize_defaults() {
        let input: UserInput = serde_json::from_str(r#"{"nickname": "alice"}"#).unwrap();

        assert_eq!(input.nickname, "alice");
        assert!(input.email.is_empty());
        assert!(input.id.is_none());
    }

    #[test]
    fn test_patch_from_input() {
        let patch = UserPatch::from(UserInput::new("alice", "a@x.com", "secret"));

        assert_eq!(patch.nickname.as_deref(), Some("alice"));
        assert_eq!(patch.password.as_deref(), Some("secret"));
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());
        assert!(!format!("{:?}", patch).contains("secret"));
    }
}
