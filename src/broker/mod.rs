pub mod engine;
pub mod janitor;
pub mod message;
pub mod queue;

pub use engine::Broker;
pub use message::{Message, MessageId};
