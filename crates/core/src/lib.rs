//! Core library for Remote Todo
//!
//! This crate contains the domain types and the remote collection client:
//! - Task model and display filters
//! - Task collection HTTP client
//! - Authentication collaborator

pub mod auth;
pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
