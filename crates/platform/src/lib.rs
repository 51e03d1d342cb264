//! Host platform detection for the AriaJDK distribution builder.
//!
//! This crate answers every "which platform are we on" question exactly once:
//! - OS and architecture detection
//! - Platform capabilities (archive format, PATH install strategy, file naming)
//! - Interactive shell detection and startup-file syntax
//! - Home directory resolution

mod arch;
mod capabilities;
mod error;
mod os;
mod paths;
mod shell;

pub use arch::Arch;
pub use capabilities::{ArchiveFormat, Capabilities, PathInstallStrategy, ScriptKind};
pub use error::PlatformError;
pub use os::Os;
pub use paths::{home_dir, home_dir_from};
pub use shell::Shell;
