mod build;
mod info;
mod install;

pub use build::cmd_build;
pub use info::cmd_info;
pub use install::cmd_install;
