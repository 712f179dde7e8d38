#![allow(clippy::uninlined_format_args)]

pub mod command;
pub mod config;
pub mod logger;
pub mod settings;
