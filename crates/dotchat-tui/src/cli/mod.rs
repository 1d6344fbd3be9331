// ABOUTME: Non-interactive subcommands
// ABOUTME: send, models and init

pub mod init;
pub mod models;
pub mod send;
