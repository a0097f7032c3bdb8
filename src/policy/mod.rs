//! Platform policy gates.
//!
//! Independent single-purpose filters. Each composes in any order relative
//! to the others; the only constraint is running after the authentication
//! gate where the principal is needed.
//!
//! - mobile_payment.rs: blocks payment initiation from mobile clients
//! - parent_readonly.rs: parents may not send mutating verbs
//! - chat.rs: private teacher–student chat permission check
//! - locale.rs: locale selection and session persistence
//! - headers.rs: CSP and hardening headers on HTML responses

pub mod chat;
pub mod headers;
pub mod locale;
pub mod mobile_payment;
pub mod parent_readonly;

pub use chat::{AllowListChatPermissions, ChatPermissions, GROUP_CHAT_PATH};
pub use headers::security_headers;
pub use locale::{request_locale, select_locale, RequestLocale};
pub use mobile_payment::mobile_payment_blocker;
pub use parent_readonly::parent_read_only;
