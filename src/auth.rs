use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Admin, AdminCredentials, AdminLoginRequest, AuthResponse},
    repository::Repository,
    validation::normalize_email,
};

/// Lifetime of an issued token. Expiry is the only way a token stops being valid.
pub const TOKEN_TTL_DAYS: i64 = 7;

// --- Password Hashing ---

/// Hash a password with Argon2id and a fresh random salt.
/// Two calls on the same input produce different strings that both verify.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash string.
/// The digest comparison is constant-time; a malformed hash verifies as false.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// --- Tokens ---

/// Claims
///
/// Payload of an admin bearer token. Self-contained: verifying it needs only the
/// server secret, never a database lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin id.
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// TokenIssuer
///
/// Signs and verifies HS256 tokens with the process-wide secret. Keys are derived once at
/// startup and the issuer is shared read-only through `AppState`.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Accepted up to and including `exp`, rejected strictly after.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for the admin, expiring seven days from now.
    pub fn issue(&self, admin_id: Uuid, email: &str) -> Result<String, AppError> {
        self.issue_at(admin_id, email, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn issue_at(
        &self,
        admin_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: admin_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// verify
    ///
    /// Checks the signature and the expiry. Every failure collapses into
    /// `AppError::Unauthorized` so callers cannot tell which check rejected the token.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "token rejected");
                AppError::Unauthorized
            })
    }
}

// --- Authorization Gate ---

/// AuthAdmin
///
/// Resolved identity of a request that presented a valid token. There is a single flat
/// admin role: any valid token grants every gated operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub email: String,
}

/// Extracts the credential from `Authorization: Bearer <token>`.
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// AuthAdmin Extractor Implementation
///
/// Usable as a handler argument or as the argument of the gate middleware.
/// Rejects with `AppError::Unauthorized` (401) before the handler runs when the header is
/// missing or the token does not verify.
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    Arc<TokenIssuer>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenIssuer>::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = tokens.verify(token)?;

        Ok(AuthAdmin {
            id: claims.sub,
            email: claims.email,
        })
    }
}

// --- Registration / Login ---

/// register_admin
///
/// Check-then-insert: two concurrent registrations for the same email can both pass the
/// existence check. The store has no unique constraint on email, so that window is open.
pub async fn register_admin(
    repo: &Repository,
    tokens: &TokenIssuer,
    credentials: AdminCredentials,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&credentials.email);
    if repo.find_admin_by_email(&email).await?.is_some() {
        return Err(AppError::Duplicate);
    }

    let admin = Admin {
        id: Uuid::new_v4(),
        email,
        password_hash: hash_password(&credentials.password)?,
        created_at: Utc::now(),
    };
    repo.insert_admin(&admin).await?;
    tracing::info!(admin_id = %admin.id, "admin registered");

    let token = tokens.issue(admin.id, &admin.email)?;
    Ok(AuthResponse {
        token,
        email: admin.email,
    })
}

/// login_admin
///
/// Unknown email and wrong password both yield `InvalidCredentials`.
pub async fn login_admin(
    repo: &Repository,
    tokens: &TokenIssuer,
    credentials: AdminLoginRequest,
) -> Result<AuthResponse, AppError> {
    let admin = repo
        .find_admin_by_email(&normalize_email(&credentials.email))
        .await?
        .filter(|admin| verify_password(&credentials.password, &admin.password_hash))
        .ok_or_else(|| {
            tracing::warn!("rejected admin login");
            AppError::InvalidCredentials
        })?;

    let token = tokens.issue(admin.id, &admin.email)?;
    Ok(AuthResponse {
        token,
        email: admin.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("correct horse", &first));
        assert!(verify_password("correct horse", &second));
        assert!(!verify_password("wrong horse", &first));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let issuer = TokenIssuer::new(SECRET);
        let id = Uuid::new_v4();
        let token = issuer.issue(id, "admin@dhadak.example").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "admin@dhadak.example");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn token_valid_until_seven_days_after_issue() {
        let issuer = TokenIssuer::new(SECRET);
        let id = Uuid::new_v4();

        let almost_expired = Utc::now() - Duration::days(TOKEN_TTL_DAYS) + Duration::minutes(1);
        let token = issuer.issue_at(id, "a@b.co", almost_expired).unwrap();
        assert!(issuer.verify(&token).is_ok());

        let expired = Utc::now() - Duration::days(TOKEN_TTL_DAYS) - Duration::seconds(2);
        let token = issuer.issue_at(id, "a@b.co", expired).unwrap();
        assert!(matches!(issuer.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(Uuid::new_v4(), "a@b.co").unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let forged = format!("{unsigned}.{}", chars.into_iter().collect::<String>());

        assert!(matches!(issuer.verify(&forged), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = TokenIssuer::new("old-secret")
            .issue(Uuid::new_v4(), "a@b.co")
            .unwrap();
        assert!(TokenIssuer::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        assert!(matches!(issuer.verify("not.a.token"), Err(AppError::Unauthorized)));
        assert!(matches!(issuer.verify(""), Err(AppError::Unauthorized)));
    }

    #[test]
    fn bearer_scheme_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
