//! Office Shortage Requests
//!
//! Requests for missing office resources, scoped by room and category, with
//! priority-based conflict resolution and per-user visibility.

pub mod domain;
pub use domain::{
    Actor, Category, Config, InvalidPriority, NewRequest, Priority, Request, Room, Title,
};

pub mod storage;
pub use storage::{JsonStore, MemoryStore, Store, StoreError};

pub mod service;
pub use service::{Error as ServiceError, Filter, Registered, RequestService};
