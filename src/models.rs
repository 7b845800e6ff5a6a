use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{Validate, require_email, require_non_blank};

/// Text served by `GET /about` until an admin stores a replacement.
pub const DEFAULT_ABOUT_CONTENT: &str = "Dhadak is the official dance committee of our college. We are a vibrant community of dancers passionate about various dance forms and cultural expression.";

// --- Stored Records ---

/// Admin
///
/// Administrator account. Created once at registration and never mutated through the API.
/// Never serialized to clients: only the token and email leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    // Argon2 PHC string (algorithm, parameters, salt and digest).
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// GalleryPhoto
///
/// One photo on the public gallery page. The image itself is hosted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct GalleryPhoto {
    pub id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Free-form date label, e.g. "March 2024".
    pub date: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// TeamMember
///
/// Committee member profile. Listed by `order` ascending, which admins set by hand.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub image_url: String,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub order: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct Workshop {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: String,
    pub registration_link: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ContactSubmission
///
/// A message left through the public contact form. Readable by admins only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// AboutContent
///
/// Singleton record backing the "about" section. At most one exists; every write
/// replaces it entirely.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct AboutContent {
    pub id: Uuid,
    pub content: String,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// AdminCredentials
///
/// Body of `POST /admin/register`.
/// The password is hashed immediately and never persisted or logged in clear.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminCredentials {
    #[schema(example = "admin@dhadak.example")]
    pub email: String,
    pub password: String,
}

impl Validate for AdminCredentials {
    fn validate(&self) -> Result<(), String> {
        require_email("email", &self.email)?;
        if self.password.is_empty() {
            return Err("password must not be empty".to_string());
        }
        Ok(())
    }
}

/// AdminLoginRequest
///
/// Body of `POST /admin/login`. Any password, the empty one included, is checked against
/// the stored hash, so a mismatch always ends in `Invalid credentials`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminLoginRequest {
    #[schema(example = "admin@dhadak.example")]
    pub email: String,
    pub password: String,
}

impl Validate for AdminLoginRequest {
    fn validate(&self) -> Result<(), String> {
        require_email("email", &self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct GalleryPhotoRequest {
    #[schema(example = "https://images.example/performance.jpg")]
    pub image_url: String,
    pub caption: Option<String>,
}

impl Validate for GalleryPhotoRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AchievementRequest {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub date: String,
}

impl Validate for AchievementRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TeamMemberRequest {
    pub name: String,
    pub role: String,
    pub image_url: String,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl Validate for TeamMemberRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct WorkshopRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub registration_link: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for WorkshopRequest {}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContactRequest {
    pub name: String,
    #[schema(example = "visitor@example.com")]
    pub email: String,
    pub message: String,
}

impl Validate for ContactRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("name", &self.name)?;
        require_email("email", &self.email)?;
        require_non_blank("message", &self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AboutUpdateRequest {
    pub content: String,
}

impl Validate for AboutUpdateRequest {}

// --- Responses (Output Schemas) ---

/// AuthResponse
///
/// Returned by register and login: a bearer token valid for seven days.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
}

/// Identity behind the presented token (GET /admin/me).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// AboutResponse
///
/// `GET /about` payload. `id` and `updated_at` are omitted while the fallback text is served.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct AboutResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<Uuid>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AboutResponse {
    pub fn fallback() -> Self {
        Self {
            id: None,
            content: DEFAULT_ABOUT_CONTENT.to_string(),
            updated_at: None,
        }
    }
}

impl From<AboutContent> for AboutResponse {
    fn from(about: AboutContent) -> Self {
        Self {
            id: Some(about.id),
            content: about.content,
            updated_at: Some(about.updated_at),
        }
    }
}
