//! # QoD Gateway Library
//!
//! Mediates access to a telco Quality-on-Demand API: obtains short-lived
//! bearer tokens (client credentials, scoped admin, CIBA with a signed
//! identity assertion) and translates session, purpose and app operations
//! into the configured upstream API dialect.
//!
//! Modules:
//! - `config`: service configuration, validation and the credential bundle
//! - `auth`: token broker and identity assertion signer
//! - `dialect`: versioned request building and response normalization
//! - `telco`: the client exposing one method per QoD operation
//! - `cache`: optional token cache
//! - `server`: HTTP front door

pub mod auth;
pub mod cache;
pub mod config;
pub mod dialect;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod telco;
pub mod tests;
pub mod utils;

pub use crate::config::telco::ServiceConfig;
pub use crate::errors::{TelcoError, TelcoResult};
pub use crate::telco::TelcoClient;
