//! End-to-end pipeline runs against a fake AriaJDK source tree.
//!
//! The toolchains are replaced by small shell scripts, so these tests only
//! run on Unix.

#![cfg(unix)]

mod common;
mod failure_tests;
mod success_tests;
