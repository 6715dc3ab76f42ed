//! Remote record-service boundary for the Foyer auth client
//!
//! The session core talks to a PocketBase-style record/auth HTTP API. This
//! crate is everything that crosses that boundary: the wire types, the typed
//! failure produced when a call is rejected, the client-held auth store
//! (token + cached user record), the `RecordService` contract, and its
//! reqwest implementation. The remote service itself — password policy,
//! record persistence, token issuance — lives on the other side.
//!
//! Call flow:
//! 1. The session core invokes a `RecordService` operation
//! 2. `HttpRecordService` performs the round trip and maps any rejection
//!    into a `RemoteFailure` at the boundary
//! 3. Successful `auth_with_password` / `auth_refresh` calls write the
//!    shared `AuthStore` (the only writers besides sign-out's `clear`)
//! 4. `AuthStore` notifies its change listeners synchronously

pub mod failure;
pub mod http;
pub mod record;
pub mod service;
pub mod store;

pub use failure::RemoteFailure;
pub use http::HttpRecordService;
pub use record::{AuthResponse, NewUser, PhoneField, ProfilePatch, UserRecord};
pub use service::{BoxFuture, RecordService, ServiceResult};
pub use store::{AuthSnapshot, AuthStore};
