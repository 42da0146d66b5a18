//! Terminal front end: console rendering and interactive line commands

pub mod commands;
pub mod console;

pub use commands::{parse_command, Command, CommandError};
pub use console::ConsoleView;
