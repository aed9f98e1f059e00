pub mod account;
pub mod group;
pub mod member;
pub mod session;

pub use account::{Account, SanitizedAccount};
pub use group::Group;
pub use member::{Member, Right};
pub use session::{AuthMethod, Session};
