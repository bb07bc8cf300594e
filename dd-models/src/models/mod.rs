//! Entity model definitions.

pub mod container;
pub mod blueprint;
pub mod message;
pub mod token;
