//! Resource catalog
//!
//! Every stream the connector can read is described by one immutable
//! [`ResourceDescriptor`] in a static table. There is no per-stream code:
//! the engine reads any descriptor the same way, and child streams differ
//! from top-level ones only by carrying a [`ParentLink`].
//!
//! | stream                | path                              | parent              |
//! |-----------------------|-----------------------------------|---------------------|
//! | `groups_membership`   | `groups/{group_id}/memberships`   | `groups_group`      |
//! | `groups_attendance`   | `events/{event_id}/attendances`   | `groups_event`      |
//! | `people_phone_number` | `people/{person_id}/phone_numbers`| `people_person`     |

mod registry;
mod types;

pub use registry::*;
pub use types::{ApiFamily, ParentLink, ResourceDescriptor, API_VERSION_HEADER, PRIMARY_KEY};

#[cfg(test)]
mod tests;
