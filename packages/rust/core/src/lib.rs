//! Core traversal and pipeline orchestration for docgen.
//!
//! This crate ties module resolution, the recursive import-graph traversal,
//! and document formatting/merging into the end-to-end `generate` workflow.

pub mod pipeline;
pub mod resolver;
