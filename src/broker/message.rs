/// Identifier generated for a message when it is pushed.
pub type MessageId = String;

/// A message handed back to a consumer by `Broker::pull`.
///
/// By the time a caller holds a `Message`, its payload has already been
/// removed from the store and its id can never be pulled again.
///
/// # Fields
///
/// - `id` - The id returned by the push that created the message.
/// - `priority` - Delivery priority; larger values are pulled first.
/// - `payload` - The bytes supplied by the producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub priority: i64,
    pub payload: Vec<u8>,
}
