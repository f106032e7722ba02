pub mod deployment;
pub mod hostname;
mod prompt;

pub use prompt::StdinConfirm;
