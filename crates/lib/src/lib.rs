//! ariadist-lib: build and packaging pipeline for the AriaJDK distribution
//!
//! This crate turns the outputs of the AriaJDK subprojects into one archive:
//! - `build`: run each subproject's toolchain in dependency order
//! - `collect`: lay out `bin/`, `lib/` and `include/`, synthesizing placeholders
//! - `metadata`: the `release` descriptor
//! - `verify`: smoke-test the assembled launcher
//! - `package`: zip or gzip'd tar, chosen by platform
//! - `install`: put the distribution's `bin/` on the user's `PATH`
//! - `pipeline`: run all of the above, cleaning up on failure

pub mod build;
pub mod collect;
pub mod config;
pub mod environment;
pub mod error;
pub mod install;
pub mod metadata;
pub mod package;
pub mod pipeline;
pub mod verify;
pub mod version;

pub use config::DistConfig;
pub use error::DistError;
pub use pipeline::{Pipeline, PipelineReport};
