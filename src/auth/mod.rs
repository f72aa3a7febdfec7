//! Authentication module
//!
//! Planning Center personal access tokens are an application id and a
//! secret sent as HTTP Basic credentials on every request.

mod authenticator;

pub use authenticator::{build_auth_header, BasicAuthenticator, AUTHORIZATION};

#[cfg(test)]
mod tests;
