pub mod args;
pub mod helpers;

pub use args::{Cli, Commands, SubmitArgs, TokenCommand};
pub use helpers::{execute_token_command, format_config};
