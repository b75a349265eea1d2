//! Command-line interface: arguments, the interactive session and single-shot mode.

pub mod args;
pub mod ask;
pub mod repl;

pub use args::{Cli, Commands};
pub use ask::handle_ask_command;
pub use repl::handle_chat_command;
