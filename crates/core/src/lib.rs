//! Core library for the task manager
//!
//! This crate contains the task model and its persistence:
//! - Personal, work and plain tasks
//! - The JSON record format used on disk
//! - An ordered, in-memory task store with whole-file load/save

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
