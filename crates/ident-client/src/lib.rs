//! # ident-client
//!
//! Client for the identity service's sid and sip resources.
//!
//! - [`types`] - resource shapes, request bodies and filters
//! - [`client`] - the [`IdentityClient`] trait and its REST implementation
//! - [`find`] - name-or-id resolution
//! - `fake` - an in-memory service for tests (`test-util` feature)
//!
//! ```text
//! ┌────────────┐   IdentityClient   ┌──────────────────────┐    HTTPS/JSON    ┌──────────┐
//! │ ident-cli  │───────────────────►│  HttpIdentityClient  │─────────────────►│ identity │
//! └────────────┘                    └──────────────────────┘                  └──────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod find;
pub mod types;

pub use auth::{Credentials, PasswordAuth};
pub use client::{ClientConfig, HttpIdentityClient, IdentityClient};
pub use error::ClientError;
#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeIdentityClient;
pub use find::{find_sid, find_sip};
pub use types::{
    Resource, ResourceKind, Sid, SidCreate, SidFilter, SidId, SidUpdate, Sip, SipCreate,
    SipFilter, SipId, SipUpdate,
};
