//! Domain logic for the Restyle workflow.
//!
//! Pure types and functions shared by the Leonardo client, the API
//! server, and the CLI: generation presets, polling policy arithmetic,
//! and input validation. No I/O lives here.

pub mod error;
pub mod poll;
pub mod presets;
pub mod prompt;
