//! Engine types
//!
//! Traversal state, page results and the messages a read emits.

use crate::pagination::{NextPage, PageCursor};
use crate::types::Record;
use chrono::{DateTime, Utc};

/// Where a single traversal stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// No request made yet
    Start,
    /// Next request goes to this cursor
    Fetching(PageCursor),
    /// Last page seen
    Done,
}

impl TraversalState {
    /// State following a page with the given continuation
    pub fn after(next: NextPage) -> Self {
        match next {
            NextPage::Continue(cursor) => Self::Fetching(cursor),
            NextPage::Done => Self::Done,
        }
    }
}

/// One decoded response page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records of the page, in response order
    pub records: Vec<Record>,
    /// Continuation advertised by the page
    pub next: NextPage,
}

/// Lifecycle of a stream within a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// The stream is about to be read
    Started,
    /// The stream was read to the end
    Complete {
        /// Records emitted
        records: u64,
        /// Pages fetched, including those of a re-read parent stream
        pages: u64,
    },
}

impl StreamStatus {
    /// Protocol spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Started => "STARTED",
            StreamStatus::Complete { .. } => "COMPLETE",
        }
    }
}

/// A message emitted during a read
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A single record
    Record {
        /// Stream name
        stream: String,
        /// The record, as returned by the API
        data: Record,
        /// When the record was emitted
        emitted_at: DateTime<Utc>,
    },
    /// Stream lifecycle change
    StreamStatus {
        /// Stream name
        stream: String,
        /// New status
        status: StreamStatus,
    },
}

impl Message {
    /// Create a record message stamped with the current time
    pub fn record(stream: impl Into<String>, data: Record) -> Self {
        Self::Record {
            stream: stream.into(),
            data,
            emitted_at: Utc::now(),
        }
    }

    /// Create a stream-started message
    pub fn started(stream: impl Into<String>) -> Self {
        Self::StreamStatus {
            stream: stream.into(),
            status: StreamStatus::Started,
        }
    }

    /// Create a stream-complete message
    pub fn complete(stream: impl Into<String>, records: u64, pages: u64) -> Self {
        Self::StreamStatus {
            stream: stream.into(),
            status: StreamStatus::Complete { records, pages },
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Stream the message belongs to
    pub fn stream(&self) -> &str {
        match self {
            Self::Record { stream, .. } | Self::StreamStatus { stream, .. } => stream,
        }
    }
}

/// Statistics from a read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: u64,
    /// Total pages fetched
    pub pages_fetched: u64,
    /// Streams read to completion
    pub streams_synced: u64,
    /// Errors encountered
    pub errors: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one emitted message
    pub fn observe(&mut self, message: &Message) {
        match message {
            Message::Record { .. } => self.records_synced += 1,
            Message::StreamStatus {
                status: StreamStatus::Complete { pages, .. },
                ..
            } => {
                self.streams_synced += 1;
                self.pages_fetched += pages;
            }
            Message::StreamStatus { .. } => {}
        }
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
