//! CLI command implementations

pub mod open;

pub use open::OpenArgs;
