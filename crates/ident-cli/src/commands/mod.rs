//! CLI command implementations.
//!
//! - [`sid`] - Sid create, delete, list, set and show
//! - [`sip`] - Sip create, delete, list, set and show

pub mod sid;
pub mod sip;

pub use sid::SidCommand;
pub use sip::SipCommand;

/// Treats an empty option value the same as an absent one.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
