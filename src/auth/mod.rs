//! Cookie based authentication.
//!
//! Logging in stores a [Token] in a private cookie, which is decrypted and
//! validated on every request that extracts the current user.

mod cookie;
mod current_user;
mod log_out;
mod token;

pub(crate) use cookie::{get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie};
pub use current_user::get_current_user;
pub use log_out::post_log_out;
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
