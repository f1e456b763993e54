//! Leonardo.ai REST client and the Restyle generation workflow.
//!
//! Provides typed wire-format parsing, HTTP API wrappers for the four
//! endpoints the workflow touches (init-image, presigned upload,
//! generations, generation status), the linear upload → generate →
//! combine orchestration, and result download.

pub mod api;
pub mod config;
pub mod download;
pub mod types;
pub mod workflow;
