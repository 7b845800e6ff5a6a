use serde::Deserialize;

use crate::{
    error::AppError,
    models::{
        Achievement, AchievementRequest, GalleryPhoto, GalleryPhotoRequest, TeamMember,
        TeamMemberRequest, Workshop, WorkshopRequest,
    },
    repository::{Repository, Resource},
};

/// Placeholder website content bundled into the `seed` binary.
pub const BUNDLED_CONTENT: &str = include_str!("../seed/content.json");

/// SeedContent
///
/// Replacement public content: one list per resource kind plus the about text.
#[derive(Debug, Deserialize)]
pub struct SeedContent {
    pub gallery: Vec<GalleryPhotoRequest>,
    pub achievements: Vec<AchievementRequest>,
    pub team: Vec<TeamMemberRequest>,
    pub workshops: Vec<WorkshopRequest>,
    pub about: String,
}

impl SeedContent {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED_CONTENT)
    }
}

/// seed
///
/// Replaces the public website content (gallery, achievements, team, workshops, about)
/// with `content`. Admin accounts and contact submissions are not touched.
pub async fn seed(repo: &Repository, content: SeedContent) -> Result<(), AppError> {
    replace_all::<GalleryPhoto>(repo, content.gallery).await?;
    replace_all::<Achievement>(repo, content.achievements).await?;
    replace_all::<TeamMember>(repo, content.team).await?;
    replace_all::<Workshop>(repo, content.workshops).await?;

    repo.replace_about(content.about).await?;
    tracing::info!("about content replaced");

    Ok(())
}

async fn replace_all<R: Resource>(
    repo: &Repository,
    records: Vec<R::Fields>,
) -> Result<(), AppError> {
    let removed = repo.clear::<R>().await?;
    let inserted = records.len();
    for fields in records {
        repo.create::<R>(fields).await?;
    }
    tracing::info!(collection = R::COLLECTION, removed, inserted, "collection seeded");
    Ok(())
}
