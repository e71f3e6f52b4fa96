//! Chat between mission parties

mod model;
mod service;

pub use model::{Message, SendMessageRequest, UnreadCount};
pub use service::MessageService;
