//! Identifier generation for new articles.

use uuid::Uuid;

use crate::application::services::IdGenerator;

/// Generates UUIDv7 identifiers rendered as lowercase hyphenated text.
///
/// The leading 48 bits are a millisecond timestamp, so the textual form sorts
/// by creation time. Ids minted within the same millisecond stay unique and
/// ordered thanks to the counter bits `Uuid::now_v7` maintains.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIdGenerator;

impl IdGenerator for TimeOrderedIdGenerator {
    fn next_id(&self) -> String {
        Uuid::now_v7().hyphenated().to_string()
    }
}
