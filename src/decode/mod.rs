//! Response decoder module
//!
//! Planning Center answers with JSON:API envelopes:
//!
//! ```json
//! { "data": [ { "type": "Person", "id": "1", "attributes": { } } ],
//!   "included": [],
//!   "meta": { "total_count": 1, "count": 1 } }
//! ```
//!
//! Records are taken from `data` verbatim. Nothing inside a record is
//! interpreted except its `id`.

mod envelope;

pub use envelope::{parse_records, record_id, DATA_KEY, ID_KEY};
