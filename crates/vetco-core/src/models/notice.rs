//! User-facing acknowledgments.

use serde::{Deserialize, Serialize};

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NoticeVariant {
    #[default]
    Default,
    /// A refused operation
    Destructive,
}

/// A transient acknowledgment shown after an operation (a toast).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}

/// The result of a successful operation together with its acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Acknowledged<T> {
    pub value: T,
    pub notice: Notice,
}

impl<T> Acknowledged<T> {
    pub fn new(value: T, notice: Notice) -> Self {
        Self { value, notice }
    }
}
