//! Pagination module
//!
//! Planning Center paginates with an offset the server hands back in
//! `meta.next.offset`. The client never computes offsets itself: it echoes
//! whatever the last page advertised, and stops when nothing is advertised.
//!
//! ```text
//! GET people/v2/people?per_page=100             -> meta.next.offset = 100
//! GET people/v2/people?per_page=100&offset=100  -> meta.next.offset = 200
//! GET people/v2/people?per_page=100&offset=200  -> (no meta.next)  => done
//! ```

mod offset;
mod types;

pub use offset::{build_params, next_page_token, LIMIT_PARAM, OFFSET_PARAM, PAGE_SIZE};
pub use types::{NextPage, PageCursor};

#[cfg(test)]
mod tests;
