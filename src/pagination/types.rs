//! Pagination types
//!
//! The cursor handed from one page to the next.

use serde::{Deserialize, Serialize};

/// Position of the next page, as advertised by the previous response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor {
    /// Offset to request next
    pub offset: u64,
}

impl PageCursor {
    /// Create a cursor at the given offset
    pub fn new(offset: u64) -> Self {
        Self { offset }
    }
}

/// Result of inspecting a page for a continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Another page exists at this cursor
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Build from an optional cursor
    pub fn from_cursor(cursor: Option<PageCursor>) -> Self {
        cursor.map_or(Self::Done, Self::Continue)
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The cursor to continue from, if any
    pub fn cursor(&self) -> Option<PageCursor> {
        match self {
            Self::Continue(cursor) => Some(*cursor),
            Self::Done => None,
        }
    }
}
