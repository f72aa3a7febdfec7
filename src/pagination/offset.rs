//! Offset pagination driven by `meta.next.offset`

use super::types::PageCursor;
use crate::types::{JsonValue, StringMap};
use tracing::warn;

/// Records requested per page
pub const PAGE_SIZE: u32 = 100;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "per_page";

/// Query parameter carrying the offset
pub const OFFSET_PARAM: &str = "offset";

/// Extract the next page cursor from a response body.
///
/// Reads `meta.next.offset`. A missing key anywhere along the path, or a
/// non-object in the middle of it, means there is no next page. The offset
/// itself may be a non-negative integer or a string of digits; anything
/// else also ends pagination.
pub fn next_page_token(body: &JsonValue) -> Option<PageCursor> {
    let offset = body.get("meta")?.get("next")?.get("offset")?;

    let parsed = match offset {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        JsonValue::Null => return None,
        _ => None,
    };

    if parsed.is_none() {
        warn!("Ignoring unusable pagination offset {offset}, treating page as last");
    }

    parsed.map(PageCursor::new)
}

/// Query parameters for a page request.
///
/// The first request of a traversal has no cursor and so no offset.
pub fn build_params(cursor: Option<&PageCursor>) -> StringMap {
    let mut params = StringMap::new();
    params.insert(LIMIT_PARAM.to_string(), PAGE_SIZE.to_string());
    if let Some(cursor) = cursor {
        params.insert(OFFSET_PARAM.to_string(), cursor.offset.to_string());
    }
    params
}
