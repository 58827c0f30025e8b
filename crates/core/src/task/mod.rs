//! Task module
//!
//! This module contains task-related types and the remote collection client.

mod client;
mod filter;
mod model;

pub use client::{HttpTaskClient, TaskApi};
pub use filter::Filter;
pub use model::*;
