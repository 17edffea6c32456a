//! Foundation types for the Capsule time-lock ledger.
//!
//! This crate provides the identity and record types used throughout the
//! Capsule system. Every other capsule crate depends on `capsule-types`.
//!
//! # Key Types
//!
//! - [`Address`] — Fixed-length account identity derived from key material
//! - [`ContentType`] — Informational classification of a capsule's payload
//! - [`Capsule`] — The immutable time-locked record held by the ledger
//! - [`CapsuleMeta`] — The public, ungated projection of a capsule

pub mod address;
pub mod capsule;
pub mod content;
pub mod error;

pub use address::{AccountMaterial, Address};
pub use capsule::{Capsule, CapsuleMeta};
pub use content::ContentType;
pub use error::TypeError;
