//! Data Transfer Objects for REST request/response serialization.

pub mod item_dto;
pub mod system_dto;

pub use item_dto::*;
pub use system_dto::*;
