//! DICE deployment models - wire records exchanged with the service.
//!
//! Every record uses snake_case field names on the wire. Only declared fields
//! are read; unset optional fields are written as explicit `null`.

pub mod models;

// Re-export key types
pub use models::blueprint::Blueprint;
pub use models::container::Container;
pub use models::message::Message;
pub use models::token::Token;
