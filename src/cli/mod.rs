//! CLI argument parsing.

mod args;

pub use args::{Cli, Command, ConfigAction, NamingArgs, SessionsAction};
