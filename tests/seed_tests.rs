use dhadak_api::{
    MemoryDocumentStore, Repository, StorageState,
    auth::{self, TokenIssuer},
    models::{
        Achievement, AdminCredentials, ContactRequest, ContactSubmission, GalleryPhoto,
        GalleryPhotoRequest, TeamMember, Workshop,
    },
    seed::{self, SeedContent},
};
use std::sync::Arc;

fn memory_repo() -> (Repository, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let repo = Repository::new(store.clone() as StorageState);
    (repo, store)
}

#[test]
fn test_bundled_content_parses() {
    let content = SeedContent::bundled().unwrap();

    assert_eq!(content.gallery.len(), 6);
    assert_eq!(content.achievements.len(), 4);
    assert_eq!(content.team.len(), 8);
    assert_eq!(content.workshops.len(), 2);
    assert!(!content.about.trim().is_empty());
}

#[tokio::test]
async fn test_seed_replaces_public_content_only() {
    let (repo, store) = memory_repo();
    let tokens = TokenIssuer::new("seed-test-secret");

    // Existing state: an admin, a contact message and a stale photo.
    auth::register_admin(
        &repo,
        &tokens,
        AdminCredentials {
            email: "admin@dhadak.example".to_string(),
            password: "pw".to_string(),
        },
    )
    .await
    .unwrap();
    let message = repo
        .create::<ContactSubmission>(ContactRequest {
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            message: "Still there?".to_string(),
        })
        .await
        .unwrap();
    let stale = repo
        .create::<GalleryPhoto>(GalleryPhotoRequest {
            image_url: "https://images.example/stale.jpg".to_string(),
            caption: None,
        })
        .await
        .unwrap();

    let content = SeedContent::bundled().unwrap();
    let about_text = content.about.clone();
    seed::seed(&repo, content).await.unwrap();

    let gallery = repo.list::<GalleryPhoto>().await.unwrap();
    assert_eq!(gallery.len(), 6);
    assert!(gallery.iter().all(|photo| photo.id != stale.id));
    assert_eq!(repo.list::<Achievement>().await.unwrap().len(), 4);
    assert_eq!(repo.list::<Workshop>().await.unwrap().len(), 2);

    let team = repo.list::<TeamMember>().await.unwrap();
    assert_eq!(team.len(), 8);
    assert!(team.windows(2).all(|pair| pair[0].order <= pair[1].order));

    assert_eq!(repo.about().await.unwrap().unwrap().content, about_text);
    assert_eq!(store.count("about").await, 1);

    assert!(repo.find_admin_by_email("admin@dhadak.example").await.unwrap().is_some());
    assert_eq!(repo.list::<ContactSubmission>().await.unwrap(), vec![message]);
}

#[tokio::test]
async fn test_seeding_twice_does_not_duplicate() {
    let (repo, _) = memory_repo();

    seed::seed(&repo, SeedContent::bundled().unwrap()).await.unwrap();
    seed::seed(&repo, SeedContent::bundled().unwrap()).await.unwrap();

    assert_eq!(repo.list::<GalleryPhoto>().await.unwrap().len(), 6);
    assert_eq!(repo.list::<TeamMember>().await.unwrap().len(), 8);
}
