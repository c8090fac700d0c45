//! Types shared by every crate in the Recruitsss client workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
