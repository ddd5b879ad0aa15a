//! Bot module for handling Telegram interactions
//!
//! This module is split into two submodules:
//! - `command_handlers`: one handler per bot command
//! - `message_handler`: routes incoming text messages to the commands

pub mod command_handlers;
pub mod message_handler;

// Re-export main handler functions for use in main.rs
pub use command_handlers::{handle_cure_command, handle_supported_units_command};
pub use message_handler::message_handler;
