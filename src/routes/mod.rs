//! Router Module Index
//!
//! Routes are split by access level, and the gate is attached to a whole module at the
//! router layer rather than per handler. A route's required guard is therefore decided by
//! the file it is declared in:
//!
//! | Module          | Guard                      |
//! |-----------------|----------------------------|
//! | `public`        | none                       |
//! | `authenticated` | valid admin bearer token   |
//!
//! Both routers are merged under the `/api` prefix by `create_router`.

/// Routes open to anonymous visitors of the club website.
pub mod public;

/// Routes that require `Authorization: Bearer <token>`.
pub mod authenticated;
