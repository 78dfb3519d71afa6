//! Account entity and its request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Case-folded form of an email address. Emails are unique and looked up by
/// this key, matching the `lower(email)` index.
pub fn email_key(email: &str) -> String {
    email.to_lowercase()
}

/// Account tier carried in issued tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Anonymous,
    #[default]
    Authenticated,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Anonymous => write!(f, "ANONYMOUS"),
            Role::Authenticated => write!(f, "AUTHENTICATED"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANONYMOUS" => Ok(Role::Anonymous),
            "AUTHENTICATED" => Ok(Role::Authenticated),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Stored account. `hashed_password` is an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub hashed_password: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Build a fresh account from a validated registration and an already hashed password.
    pub fn new(input: RegisterAccount, hashed_password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: input.nickname,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: Role::Authenticated,
            hashed_password,
            bio: input.bio,
            profile_picture_url: input.profile_picture_url,
            linkedin_profile_url: input.linkedin_profile_url,
            github_profile_url: input.github_profile_url,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Replace exactly the fields present in `update`.
    pub fn apply_update(&mut self, update: UpdateAccount, now: DateTime<Utc>) {
        let UpdateAccount {
            nickname,
            email,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
        } = update;

        if let Some(v) = nickname {
            self.nickname = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = first_name {
            self.first_name = Some(v);
        }
        if let Some(v) = last_name {
            self.last_name = Some(v);
        }
        if let Some(v) = bio {
            self.bio = Some(v);
        }
        if let Some(v) = profile_picture_url {
            self.profile_picture_url = Some(v);
        }
        if let Some(v) = linkedin_profile_url {
            self.linkedin_profile_url = Some(v);
        }
        if let Some(v) = github_profile_url {
            self.github_profile_url = Some(v);
        }
        self.updated_at = now;
    }
}

/// Public view of an account (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            nickname: a.nickname,
            email: a.email,
            first_name: a.first_name,
            last_name: a.last_name,
            role: a.role,
            bio: a.bio,
            profile_picture_url: a.profile_picture_url,
            linkedin_profile_url: a.linkedin_profile_url,
            github_profile_url: a.github_profile_url,
            created_at: a.created_at,
            updated_at: a.updated_at,
            last_login_at: a.last_login_at,
        }
    }
}

/// POST /users/register body. Absent identity fields decode as empty strings
/// so validation reports them as `missing` alongside every other violation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAccount {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::nickname"))]
    pub nickname: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::password"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub linkedin_profile_url: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub github_profile_url: Option<String>,
}

/// PUT /users/update/:id body. Only the listed fields are updatable; anything
/// else in the payload is rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccount {
    #[validate(custom(function = "crate::validation::nickname"))]
    pub nickname: Option<String>,
    #[validate(custom(function = "crate::validation::email"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub profile_picture_url: Option<String>,
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub linkedin_profile_url: Option<String>,
    #[validate(custom(function = "crate::validation::profile_url"))]
    pub github_profile_url: Option<String>,
}

/// POST /users/login body. `username` matches either nickname or email.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "nickname", alias = "email")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
