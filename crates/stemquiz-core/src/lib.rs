//! stemquiz-core: Question sets, quiz sessions, and statistics.
//!
//! This crate defines the data model, schema validation, math-text
//! segmentation, the session state machine, and the statistics that the
//! stemquiz front ends build on. It renders nothing itself; see
//! [`traits::Renderer`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod schema;
pub mod segment;
pub mod statistics;
pub mod traits;
