//! Request handlers

mod entitlement;
mod generate;
mod health;
mod redirect;

pub use entitlement::get_entitlement;
pub use generate::generate_gift_link;
pub use health::{health, ready};
pub use redirect::redeem_redirect;
