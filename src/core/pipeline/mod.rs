//! # Pipeline Module
//!
//! Orchestrates a full run against the library.
//!
//! ## Pipeline Stages
//! 1. **Find** - Query every configured section for duplicated items,
//!    normalize each copy and score it
//! 2. **Resolve** - Choose a keeper per group (automatically or by asking)
//! 3. **Remove** - Apply the skip list, delete the other copies and append
//!    the decision to the log
//!
//! All groups are collected before the first one is resolved, so a long
//! scan never interleaves with operator prompts.

mod executor;

pub use executor::{
    Pipeline, PipelineBuilder, PipelineResult, ScanResult, DEFAULT_DELETION_PAUSE,
};
