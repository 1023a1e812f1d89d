use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Document properties read from the PDF container itself.
///
/// Every field is optional: a missing or unreadable property is `None`, never an error.
/// `title`, `author` and `subject` may later be backfilled from AI output, but only
/// where they are still empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<FixedOffset>>,
    pub modification_date: Option<DateTime<FixedOffset>>,
}

impl EmbeddedMetadata {
    /// True when no property at all could be read.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.creator.is_none()
            && self.producer.is_none()
            && self.creation_date.is_none()
            && self.modification_date.is_none()
    }
}
