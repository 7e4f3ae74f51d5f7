//! Authentication session domain module.
//!
//! # Module Structure
//!
//! - `identity`: the signed-in user identifier
//! - `source`: the session source contract and its subscription handle

mod identity;
mod source;

pub use identity::Identity;
pub use source::{AuthSessionSource, IdentityListener, Subscription};
