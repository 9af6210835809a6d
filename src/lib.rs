pub mod cli;
pub mod command;
pub mod error;
pub mod origin;
pub mod output;
pub mod parser;
pub mod vcs;

pub use error::{ClparseError, Result};
pub use parser::{Changelog, Parser};
