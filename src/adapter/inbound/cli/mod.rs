//! CLI module graph.

pub mod check;
pub mod command;
pub mod handler;
pub mod output;
pub mod run;
pub mod shell;
