//! Append-only capsule ledger.
//!
//! This crate is the heart of the Capsule system. It provides:
//! - The singleton capsule store with its `uninitialized → initialized`
//!   lifecycle and gapless id assignment
//! - `CapsuleWriter` / `CapsuleReader` trait boundaries
//! - `InMemoryCapsuleLedger` implementation for tests and embedding
//! - Time-lock and authorization gating at every reveal
//! - An injectable [`Clock`] so unlock checks never trust the caller
//!
//! Reveal has two layers: the wire-compatible methods return an empty value
//! on any time or authorization failure (the original's anti-probing
//! behavior), while [`CapsuleReader::reveal`] returns a typed [`Reveal`] for
//! application code that needs to know why.

pub mod clock;
pub mod error;
pub mod memory;
pub mod store;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LedgerError;
pub use memory::InMemoryCapsuleLedger;
pub use store::{CapsuleStore, LedgerSnapshot};
pub use traits::{CapsuleReader, CapsuleWriter, Reveal};
