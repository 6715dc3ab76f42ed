//! Common types for the Foyer auth client workspace

mod secret;
mod error;

pub use secret::Secret;
pub use error::{Error, Result};
