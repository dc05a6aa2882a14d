//! # ident-cli
//!
//! Command-line interface for managing sids and sips in an identity
//! service.
//!
//! Provides commands for:
//! - Creating, deleting, listing, changing and showing sids
//! - The same operations on sips, optionally scoped to a sid
//!
//! # Architecture
//!
//! Command handlers talk to the service through the
//! [`ident_client::IdentityClient`] trait. The binary hands them a
//! [`session::Session`], which resolves flags, environment and config file
//! into connection settings and connects on the first remote call.
//!
//! ```text
//! ┌───────────┐      REST (v3)       ┌──────────────────┐
//! │   ident   │◄────────────────────►│ identity service │
//! └───────────┘    X-Auth-Token      └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod properties;
pub mod session;

pub use cli::{Cli, Commands, Format, SidCommands, SipCommands};
pub use error::CliError;
pub use output::OutputFormat;
pub use session::Session;
