pub mod cli;
pub mod logging;

pub use cli::{exit_code, one_line, run, Cli};
