//! Execution engine module
//!
//! Turns a [`ResourceDescriptor`] into an async stream of records.
//!
//! # Overview
//!
//! A top-level stream is one paginated traversal:
//!
//! ```text
//! Start -> Fetching(None) -> Fetching(offset) -> ... -> Done
//! ```
//!
//! A child stream first reads its parent stream to the end, collecting
//! parent ids, then runs one traversal per id against the rendered child
//! path. Everything is sequential: at most one request is in flight, and
//! all records of one parent are emitted before the next parent starts.
//! The parent stream is re-read every time a child stream is read.

mod types;

pub use types::{Message, Page, StreamStatus, SyncStats, TraversalState};

use crate::decode::parse_records;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{build_params, next_page_token, NextPage, PageCursor};
use crate::partition::ParentRouter;
use crate::streams::{self, ParentLink, ResourceDescriptor};
use crate::types::Record;
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt, TryStreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Async stream of records, ending at the first error
pub type RecordStream = BoxStream<'static, Result<Record>>;

/// Reads streams described by the static resource table
#[derive(Clone)]
pub struct StreamReader {
    client: Arc<HttpClient>,
    pages: Arc<AtomicU64>,
}

impl StreamReader {
    /// Create a reader over a shared client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            pages: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Pages fetched by this reader and its clones
    pub fn pages_fetched(&self) -> u64 {
        self.pages.load(Ordering::Relaxed)
    }

    /// Read every record of a stream
    pub fn read(&self, descriptor: &'static ResourceDescriptor) -> RecordStream {
        match descriptor.parent {
            None => self.traverse(descriptor, descriptor.request_path()),
            Some(link) => self.read_partitioned(descriptor, link),
        }
    }

    /// Read every record of a stream into memory
    pub async fn read_all(&self, descriptor: &'static ResourceDescriptor) -> Result<Vec<Record>> {
        self.read(descriptor).try_collect().await
    }

    /// Records of one paginated traversal of `path`
    pub fn traverse(&self, descriptor: &'static ResourceDescriptor, path: String) -> RecordStream {
        self.pages(descriptor, path)
            .map_ok(|page| stream::iter(page.records.into_iter().map(Ok::<Record, Error>)))
            .try_flatten()
            .boxed()
    }

    /// Pages of one paginated traversal of `path`
    pub fn pages(
        &self,
        descriptor: &'static ResourceDescriptor,
        path: String,
    ) -> BoxStream<'static, Result<Page>> {
        let reader = self.clone();

        stream::try_unfold(TraversalState::Start, move |state| {
            let reader = reader.clone();
            let path = path.clone();
            async move {
                let cursor = match state {
                    TraversalState::Start => None,
                    TraversalState::Fetching(cursor) => Some(cursor),
                    TraversalState::Done => return Ok(None),
                };
                let page = reader.fetch_page(descriptor, &path, cursor.as_ref()).await?;
                let next_state = TraversalState::after(page.next);
                Ok::<_, Error>(Some((page, next_state)))
            }
        })
        .boxed()
    }

    /// Fetch and decode a single page
    pub async fn fetch_page(
        &self,
        descriptor: &ResourceDescriptor,
        path: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<Page> {
        let (version_header, version) = descriptor.version_header();
        let request = RequestConfig::new()
            .queries(build_params(cursor))
            .header(version_header, version);

        let body = self.client.get_json(path, &request).await?;
        let records = parse_records(&body);
        let next = NextPage::from_cursor(next_page_token(&body));
        self.pages.fetch_add(1, Ordering::Relaxed);

        debug!(
            stream = descriptor.name,
            path,
            offset = cursor.map(|c| c.offset),
            records = records.len(),
            next_offset = next.cursor().map(|c| c.offset),
            last = next.is_done(),
            "Fetched page"
        );

        Ok(Page { records, next })
    }

    fn read_partitioned(
        &self,
        descriptor: &'static ResourceDescriptor,
        link: ParentLink,
    ) -> RecordStream {
        let Some(parent) = streams::find(link.stream) else {
            let err = Error::partition(
                descriptor.name,
                format!("unknown parent stream '{}'", link.stream),
            );
            return stream::once(future::ready(Err(err))).boxed();
        };

        let reader = self.clone();
        let children = stream::once(self.clone().collect_parents(parent, link))
            .map_ok(move |router| {
                let reader = reader.clone();
                let template = descriptor.request_path();
                stream::iter(router.partitions())
                    .map(move |partition| {
                        partition.render(&template).map(|path| {
                            info!(
                                stream = descriptor.name,
                                parent = %partition.value,
                                "Reading partition"
                            );
                            reader.traverse(descriptor, path)
                        })
                    })
                    .try_flatten()
            })
            .try_flatten()
            .boxed();

        stop_after_error(children)
    }

    async fn collect_parents(
        self,
        parent: &'static ResourceDescriptor,
        link: ParentLink,
    ) -> Result<ParentRouter> {
        let mut router = ParentRouter::new(parent.name, link.partition_field);
        let mut records = self.read(parent);
        while let Some(record) = records.try_next().await? {
            router.push(&record);
        }

        info!(
            stream = parent.name,
            parents = router.parent_ids().len(),
            skipped = router.skipped(),
            "Collected parent ids"
        );
        Ok(router)
    }
}

impl std::fmt::Debug for StreamReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamReader")
            .field("client", &self.client)
            .field("pages_fetched", &self.pages_fetched())
            .finish()
    }
}

/// End a stream right after its first error.
///
/// The upstream is not polled again once an error has been yielded, so no
/// further requests are started on its behalf.
pub fn stop_after_error<T: Send + 'static>(
    stream: BoxStream<'static, Result<T>>,
) -> BoxStream<'static, Result<T>> {
    stream::unfold((stream, false), |(mut upstream, failed)| async move {
        if failed {
            return None;
        }
        let item = upstream.next().await?;
        let failed = item.is_err();
        Some((item, (upstream, failed)))
    })
    .boxed()
}
