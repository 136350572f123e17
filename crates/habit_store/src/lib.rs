pub mod adapter;
pub mod config;
pub mod disk;
pub mod service;
pub mod session;

pub use crate::adapter::{Scope, StorageAdapter};
pub use crate::config::{StorageKind, StoreConfig};
pub use crate::disk::DiskStore;
pub use crate::service::{HabitService, ImportMode, ImportReport, ServiceError};
pub use crate::session::SessionStore;
