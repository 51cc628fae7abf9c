//! Auth types shared across Labdesk services.
//!
//! Provides JWT claims, bearer-token validation, and the `BearerIdentity` extractor.

pub mod identity;
pub mod token;
