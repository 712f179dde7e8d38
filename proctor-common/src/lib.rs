#![allow(clippy::uninlined_format_args)]

pub mod atlas;
pub mod classroom;
pub mod controller;
pub mod error;
pub mod progress;
pub mod provider;
