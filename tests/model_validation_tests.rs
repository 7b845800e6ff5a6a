use chrono::{TimeZone, Utc};
use dhadak_api::{
    models::{
        AboutContent, AboutResponse, AdminCredentials, AdminLoginRequest, ContactRequest,
        DEFAULT_ABOUT_CONTENT, GalleryPhoto, TeamMemberRequest, WorkshopRequest,
    },
    validation::Validate,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn test_about_fallback_omits_identity_fields() {
    let value = serde_json::to_value(AboutResponse::fallback()).unwrap();

    assert_eq!(value, json!({ "content": DEFAULT_ABOUT_CONTENT }));
}

#[test]
fn test_stored_about_exposes_identity_fields() {
    let id = Uuid::new_v4();
    let updated_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let response = AboutResponse::from(AboutContent {
        id,
        content: "We dance.".to_string(),
        updated_at,
    });

    let value = serde_json::to_value(response).unwrap();

    assert_eq!(value["id"], id.to_string());
    assert_eq!(value["updated_at"], "2024-03-01T12:00:00Z");
}

#[test]
fn test_records_serialize_timestamps_as_iso_strings() {
    let photo = GalleryPhoto {
        id: Uuid::nil(),
        image_url: "https://images.example/1.jpg".to_string(),
        caption: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
    };

    let value = serde_json::to_value(&photo).unwrap();

    assert_eq!(
        value,
        json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "image_url": "https://images.example/1.jpg",
            "caption": null,
            "created_at": "2024-01-15T09:30:00Z"
        })
    );
}

#[test]
fn test_workshop_is_active_defaults_to_true() {
    let request: WorkshopRequest = serde_json::from_value(json!({
        "title": "Hip Hop",
        "description": "Footwork drills",
        "date": "Fridays"
    }))
    .unwrap();

    assert!(request.is_active);
    assert_eq!(request.registration_link, None);
}

#[test]
fn test_team_member_order_defaults_to_zero() {
    let request: TeamMemberRequest = serde_json::from_value(json!({
        "name": "Riya",
        "role": "Choreographer",
        "image_url": "https://images.example/riya.jpg"
    }))
    .unwrap();

    assert_eq!(request.order, 0);
    assert_eq!(request.instagram, None);
}

#[test]
fn test_contact_validation() {
    let valid = ContactRequest {
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        message: "Hello".to_string(),
    };
    assert!(valid.validate().is_ok());

    let blank_message = ContactRequest {
        message: "   ".to_string(),
        ..valid.clone()
    };
    assert_eq!(blank_message.validate().unwrap_err(), "message must not be blank");

    let bad_email = ContactRequest {
        email: "visitor@localhost".to_string(),
        ..valid
    };
    assert_eq!(bad_email.validate().unwrap_err(), "email is not a valid email address");
}

#[test]
fn test_admin_credentials_validation() {
    let empty_password = AdminCredentials {
        email: "admin@dhadak.example".to_string(),
        password: String::new(),
    };
    assert!(empty_password.validate().is_err());

    let ok = AdminCredentials {
        password: "pw".to_string(),
        ..empty_password
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn test_login_request_only_checks_email_shape() {
    let empty_password = AdminLoginRequest {
        email: "admin@dhadak.example".to_string(),
        password: String::new(),
    };
    assert!(empty_password.validate().is_ok());

    let bad_email = AdminLoginRequest {
        email: "admin".to_string(),
        ..empty_password
    };
    assert_eq!(bad_email.validate().unwrap_err(), "email is not a valid email address");
}
