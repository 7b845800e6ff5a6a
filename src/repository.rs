use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        AboutContent, Achievement, AchievementRequest, Admin, ContactRequest, ContactSubmission,
        GalleryPhoto, GalleryPhotoRequest, TeamMember, TeamMemberRequest, Workshop,
        WorkshopRequest,
    },
    storage::{Sort, StorageState, StoreError},
};

/// Upper bound on the number of records a listing returns.
pub const LIST_LIMIT: i64 = 1000;

const ADMINS: &str = "admins";
const ABOUT: &str = "about";

/// Resource
///
/// A record kind stored in its own collection with uniform create/list/update/delete
/// semantics. `Fields` is the client-supplied part; the id and creation timestamp are
/// generated server-side by `from_fields`.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Fields: Serialize + Send + Sync;

    const COLLECTION: &'static str;
    /// Human label used in response messages, e.g. "Photo deleted".
    const LABEL: &'static str;
    const SORT: Sort;

    fn from_fields(fields: Self::Fields) -> Self;
}

impl Resource for GalleryPhoto {
    type Fields = GalleryPhotoRequest;
    const COLLECTION: &'static str = "gallery";
    const LABEL: &'static str = "Photo";
    const SORT: Sort = Sort::newest_first("created_at");

    fn from_fields(fields: GalleryPhotoRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_url: fields.image_url,
            caption: fields.caption,
            created_at: Utc::now(),
        }
    }
}

impl Resource for Achievement {
    type Fields = AchievementRequest;
    const COLLECTION: &'static str = "achievements";
    const LABEL: &'static str = "Achievement";
    const SORT: Sort = Sort::newest_first("created_at");

    fn from_fields(fields: AchievementRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            image_url: fields.image_url,
            date: fields.date,
            created_at: Utc::now(),
        }
    }
}

impl Resource for TeamMember {
    type Fields = TeamMemberRequest;
    const COLLECTION: &'static str = "team";
    const LABEL: &'static str = "Team member";
    const SORT: Sort = Sort::ascending("order");

    fn from_fields(fields: TeamMemberRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            role: fields.role,
            image_url: fields.image_url,
            instagram: fields.instagram,
            linkedin: fields.linkedin,
            twitter: fields.twitter,
            order: fields.order,
            created_at: Utc::now(),
        }
    }
}

impl Resource for Workshop {
    type Fields = WorkshopRequest;
    const COLLECTION: &'static str = "workshops";
    const LABEL: &'static str = "Workshop";
    const SORT: Sort = Sort::newest_first("created_at");

    fn from_fields(fields: WorkshopRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            registration_link: fields.registration_link,
            image_url: fields.image_url,
            is_active: fields.is_active,
            created_at: Utc::now(),
        }
    }
}

impl Resource for ContactSubmission {
    type Fields = ContactRequest;
    const COLLECTION: &'static str = "contact_submissions";
    const LABEL: &'static str = "Contact submission";
    const SORT: Sort = Sort::newest_first("created_at");

    fn from_fields(fields: ContactRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            message: fields.message,
            created_at: Utc::now(),
        }
    }
}

/// Repository
///
/// Typed access to the document store. It is the only component that mutates records,
/// holds no cache, and performs exactly one store round trip per operation.
#[derive(Clone)]
pub struct Repository {
    store: StorageState,
}

impl Repository {
    pub fn new(store: StorageState) -> Self {
        Self { store }
    }

    // --- Uniform Resource Operations ---

    /// Stamps a new id and creation time onto `fields`, persists and returns the record.
    pub async fn create<R: Resource>(&self, fields: R::Fields) -> Result<R, AppError> {
        let record = R::from_fields(fields);
        self.store
            .insert(R::COLLECTION, serde_json::to_value(&record).map_err(StoreError::from)?)
            .await?;
        Ok(record)
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, AppError> {
        let documents = self.store.find(R::COLLECTION, R::SORT, LIST_LIMIT).await?;
        decode_all(documents)
    }

    /// Overwrites every mutable field of the record with `fields`.
    /// The id and creation timestamp are untouched.
    pub async fn update<R: Resource>(&self, id: &str, fields: &R::Fields) -> Result<(), AppError> {
        let fields = serde_json::to_value(fields).map_err(StoreError::from)?;
        if self.store.update(R::COLLECTION, id, fields).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(R::LABEL))
        }
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<(), AppError> {
        if self.store.delete(R::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(R::LABEL))
        }
    }

    /// Removes every record of the kind. Used by the seeding binary.
    pub async fn clear<R: Resource>(&self) -> Result<u64, AppError> {
        Ok(self.store.clear(R::COLLECTION).await?)
    }

    // --- Admins ---

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        self.store
            .find_one(ADMINS, "email", email)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert_admin(&self, admin: &Admin) -> Result<(), AppError> {
        let document = serde_json::to_value(admin).map_err(StoreError::from)?;
        self.store.insert(ADMINS, document).await?;
        Ok(())
    }

    // --- About (singleton) ---

    pub async fn about(&self) -> Result<Option<AboutContent>, AppError> {
        self.store.first(ABOUT).await?.map(decode).transpose()
    }

    /// Replaces the about record wholesale with a fresh id and timestamp.
    pub async fn replace_about(&self, content: String) -> Result<AboutContent, AppError> {
        let about = AboutContent {
            id: Uuid::new_v4(),
            content,
            updated_at: Utc::now(),
        };
        let document = serde_json::to_value(&about).map_err(StoreError::from)?;
        self.store.replace_all(ABOUT, document).await?;
        Ok(about)
    }
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, AppError> {
    serde_json::from_value(document)
        .map_err(StoreError::from)
        .map_err(AppError::from)
}

fn decode_all<T: DeserializeOwned>(documents: Vec<Value>) -> Result<Vec<T>, AppError> {
    documents.into_iter().map(decode).collect()
}
