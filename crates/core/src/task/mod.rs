//! Task module
//!
//! This module contains the task model, its record format and the task store.

mod model;
mod record;
mod store;

pub use model::*;
pub use record::TaskRecord;
pub use store::TaskStore;
