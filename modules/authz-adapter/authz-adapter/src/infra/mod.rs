//! Infrastructure adapters.

pub mod identity_client;

pub use identity_client::HttpIdentityClient;
