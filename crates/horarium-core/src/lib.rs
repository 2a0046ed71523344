//! Shared types for the horarium workspace, kept free of heavyweight
//! dependencies so every crate can use them.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
