use crate::{
    AppState, auth,
    auth::AuthAdmin,
    error::AppError,
    models::{
        AboutResponse, AboutUpdateRequest, Achievement, AchievementRequest, AdminCredentials,
        AdminLoginRequest, AdminProfile, AuthResponse, ContactRequest, ContactSubmission,
        GalleryPhoto, GalleryPhotoRequest, MessageResponse, TeamMember, TeamMemberRequest,
        Workshop, WorkshopRequest,
    },
    repository::Resource,
    validation::ValidatedJson,
};
use axum::{
    Json,
    extract::{Path, State},
};

// --- Shared Resource Plumbing ---

async fn list_records<R: Resource>(state: &AppState) -> Result<Json<Vec<R>>, AppError> {
    Ok(Json(state.repo.list::<R>().await?))
}

async fn create_record<R: Resource>(
    state: &AppState,
    fields: R::Fields,
) -> Result<Json<R>, AppError> {
    let record = state.repo.create::<R>(fields).await?;
    tracing::info!(collection = R::COLLECTION, "record created");
    Ok(Json(record))
}

async fn update_record<R: Resource>(
    state: &AppState,
    id: &str,
    fields: R::Fields,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.update::<R>(id, &fields).await?;
    Ok(Json(MessageResponse::new(format!("{} updated", R::LABEL))))
}

async fn delete_record<R: Resource>(
    state: &AppState,
    id: &str,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete::<R>(id).await?;
    tracing::info!(collection = R::COLLECTION, id, "record deleted");
    Ok(Json(MessageResponse::new(format!("{} deleted", R::LABEL))))
}

// --- Admin Accounts ---

/// register_admin
///
/// [Public Route] Creates an admin account and returns a token for it.
#[utoipa::path(
    post,
    path = "/api/admin/register",
    request_body = AdminCredentials,
    responses(
        (status = 200, description = "Registered", body = AuthResponse),
        (status = 400, description = "Admin already exists"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn register_admin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AdminCredentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = auth::register_admin(&state.repo, &state.tokens, payload).await?;
    Ok(Json(response))
}

/// login_admin
///
/// [Public Route] Exchanges credentials for a token. The failure response is identical
/// for an unknown email and a wrong password.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_admin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AdminLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = auth::login_admin(&state.repo, &state.tokens, payload).await?;
    Ok(Json(response))
}

/// get_me
///
/// [Gated Route] Echoes the identity carried by the presented token.
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Token holder", body = AdminProfile),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn get_me(AuthAdmin { id, email }: AuthAdmin) -> Json<AdminProfile> {
    Json(AdminProfile { id, email })
}

// --- Gallery ---

/// [Public Route] Gallery photos, newest first.
#[utoipa::path(
    get,
    path = "/api/gallery",
    responses((status = 200, description = "Photos", body = [GalleryPhoto]))
)]
pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryPhoto>>, AppError> {
    list_records(&state).await
}

#[utoipa::path(
    post,
    path = "/api/gallery",
    request_body = GalleryPhotoRequest,
    responses((status = 200, description = "Created", body = GalleryPhoto))
)]
pub async fn create_gallery_photo(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GalleryPhotoRequest>,
) -> Result<Json<GalleryPhoto>, AppError> {
    create_record::<GalleryPhoto>(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/gallery/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    request_body = GalleryPhotoRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn update_gallery_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<GalleryPhotoRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    update_record::<GalleryPhoto>(&state, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_gallery_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record::<GalleryPhoto>(&state, &id).await
}

// --- Achievements ---

#[utoipa::path(
    get,
    path = "/api/achievements",
    responses((status = 200, description = "Achievements", body = [Achievement]))
)]
pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    list_records(&state).await
}

#[utoipa::path(
    post,
    path = "/api/achievements",
    request_body = AchievementRequest,
    responses((status = 200, description = "Created", body = Achievement))
)]
pub async fn create_achievement(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AchievementRequest>,
) -> Result<Json<Achievement>, AppError> {
    create_record::<Achievement>(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/achievements/{id}",
    params(("id" = String, Path, description = "Achievement ID")),
    request_body = AchievementRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Achievement not found")
    )
)]
pub async fn update_achievement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<AchievementRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    update_record::<Achievement>(&state, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/achievements/{id}",
    params(("id" = String, Path, description = "Achievement ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Achievement not found")
    )
)]
pub async fn delete_achievement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record::<Achievement>(&state, &id).await
}

// --- Team ---

/// [Public Route] Team members by their manual `order`, ascending.
#[utoipa::path(
    get,
    path = "/api/team",
    responses((status = 200, description = "Team", body = [TeamMember]))
)]
pub async fn list_team(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    list_records(&state).await
}

#[utoipa::path(
    post,
    path = "/api/team",
    request_body = TeamMemberRequest,
    responses((status = 200, description = "Created", body = TeamMember))
)]
pub async fn create_team_member(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TeamMemberRequest>,
) -> Result<Json<TeamMember>, AppError> {
    create_record::<TeamMember>(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/team/{id}",
    params(("id" = String, Path, description = "Team member ID")),
    request_body = TeamMemberRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn update_team_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<TeamMemberRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    update_record::<TeamMember>(&state, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/team/{id}",
    params(("id" = String, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn delete_team_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record::<TeamMember>(&state, &id).await
}

// --- Workshops ---

#[utoipa::path(
    get,
    path = "/api/workshop",
    responses((status = 200, description = "Workshops", body = [Workshop]))
)]
pub async fn list_workshops(
    State(state): State<AppState>,
) -> Result<Json<Vec<Workshop>>, AppError> {
    list_records(&state).await
}

#[utoipa::path(
    post,
    path = "/api/workshop",
    request_body = WorkshopRequest,
    responses((status = 200, description = "Created", body = Workshop))
)]
pub async fn create_workshop(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<WorkshopRequest>,
) -> Result<Json<Workshop>, AppError> {
    create_record::<Workshop>(&state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/workshop/{id}",
    params(("id" = String, Path, description = "Workshop ID")),
    request_body = WorkshopRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn update_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<WorkshopRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    update_record::<Workshop>(&state, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/workshop/{id}",
    params(("id" = String, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn delete_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record::<Workshop>(&state, &id).await
}

// --- Contact ---

/// submit_contact
///
/// [Public Route] Stores a contact-form message. The stored record is not echoed back.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Stored", body = MessageResponse),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.create::<ContactSubmission>(payload).await?;
    Ok(Json(MessageResponse::new("Message sent successfully")))
}

/// [Gated Route] Contact submissions, newest first.
#[utoipa::path(
    get,
    path = "/api/contact",
    responses(
        (status = 200, description = "Submissions", body = [ContactSubmission]),
        (status = 401, description = "Invalid token")
    )
)]
pub async fn list_contact_submissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactSubmission>>, AppError> {
    list_records(&state).await
}

// --- About ---

/// get_about
///
/// [Public Route] The about text, or the built-in fallback while none has been stored.
#[utoipa::path(
    get,
    path = "/api/about",
    responses((status = 200, description = "About", body = AboutResponse))
)]
pub async fn get_about(State(state): State<AppState>) -> Result<Json<AboutResponse>, AppError> {
    let about = state
        .repo
        .about()
        .await?
        .map_or_else(AboutResponse::fallback, AboutResponse::from);
    Ok(Json(about))
}

/// update_about
///
/// [Gated Route] Replaces the singleton about record.
#[utoipa::path(
    put,
    path = "/api/about",
    request_body = AboutUpdateRequest,
    responses((status = 200, description = "Replaced", body = MessageResponse))
)]
pub async fn update_about(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AboutUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.replace_about(payload.content).await?;
    Ok(Json(MessageResponse::new("About content updated")))
}
