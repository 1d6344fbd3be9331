// ABOUTME: dotchat terminal interface for the blockchain agent
// ABOUTME: Channel-based async architecture with Ratatui

pub mod app;
pub mod cli;
pub mod run;
pub mod types;
pub mod ui;
