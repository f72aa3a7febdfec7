//! Partition routing module
//!
//! Child streams are addressed through their parent: memberships live under
//! a group, attendances under an event, phone numbers under a person. The
//! [`ParentRouter`] turns the records of a fully read parent stream into one
//! [`Partition`] per parent id, and each partition renders the child path
//! for its slice.

mod router;
mod types;

pub use router::ParentRouter;
pub use types::Partition;
