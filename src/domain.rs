//! Domain models for shortage requests.
//!
//! This module contains the request record and the value types it is built
//! from, along with the tool configuration.

/// The request record and its value types.
pub mod request;
pub use request::{
    Actor, Category, EmptyTitleError, InvalidPriority, NewRequest, ParseCategoryError,
    ParseRoomError, Priority, Request, Room, Title,
};

mod config;
pub use config::{CONFIG_FILE, Config};
