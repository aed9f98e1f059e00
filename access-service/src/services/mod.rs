//! Services layer: the session/authorization core.
//!
//! Every operation either returns a success record or fails with a
//! `ServiceError` kind; callers must treat the first failure as terminal
//! for the request. Nothing here signals denial through a return value.

mod accounts;
mod email;
mod google;
mod groups;
mod members;
mod permissions;
mod sessions;

pub mod error;

pub use accounts::{AccountDraft, AccountService};
pub use email::{EmailProvider, MockMailer, SmtpMailer};
pub use error::ServiceError;
pub use google::{GoogleClaim, GoogleTokenVerifier, GoogleVerifier, MockGoogleVerifier};
pub use groups::{GroupDraft, GroupService};
pub use members::MemberService;
pub use permissions::{GroupPermission, PermissionGrant, PermissionService};
pub use sessions::{AuthenticatedSession, Credentials, SessionService};
