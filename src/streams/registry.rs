//! The static stream table

use super::types::{ApiFamily, ParentLink, ResourceDescriptor, PRIMARY_KEY};

const fn top_level(
    name: &'static str,
    family: ApiFamily,
    path: &'static str,
) -> ResourceDescriptor {
    ResourceDescriptor {
        name,
        family,
        path,
        primary_key: PRIMARY_KEY,
        parent: None,
    }
}

const fn child(
    name: &'static str,
    family: ApiFamily,
    path: &'static str,
    parent: &'static str,
    partition_field: &'static str,
) -> ResourceDescriptor {
    ResourceDescriptor {
        name,
        family,
        path,
        primary_key: PRIMARY_KEY,
        parent: Some(ParentLink {
            stream: parent,
            partition_field,
        }),
    }
}

pub const GROUPS_EVENT: ResourceDescriptor =
    top_level("groups_event", ApiFamily::Groups, "events");
pub const GROUPS_GROUP_TYPE: ResourceDescriptor =
    top_level("groups_group_type", ApiFamily::Groups, "group_types");
pub const GROUPS_GROUP: ResourceDescriptor =
    top_level("groups_group", ApiFamily::Groups, "groups");
pub const GROUPS_MEMBERSHIP: ResourceDescriptor = child(
    "groups_membership",
    ApiFamily::Groups,
    "groups/{group_id}/memberships",
    "groups_group",
    "group_id",
);
pub const GROUPS_ATTENDANCE: ResourceDescriptor = child(
    "groups_attendance",
    ApiFamily::Groups,
    "events/{event_id}/attendances",
    "groups_event",
    "event_id",
);
pub const PEOPLE_PERSON: ResourceDescriptor =
    top_level("people_person", ApiFamily::People, "people");
pub const PEOPLE_ADDRESS: ResourceDescriptor =
    top_level("people_address", ApiFamily::People, "addresses");
pub const PEOPLE_EMAIL: ResourceDescriptor =
    top_level("people_email", ApiFamily::People, "emails");
pub const PEOPLE_HOUSEHOLD: ResourceDescriptor =
    top_level("people_household", ApiFamily::People, "households");
pub const PEOPLE_CAMPUS: ResourceDescriptor =
    top_level("people_campus", ApiFamily::People, "campuses");
pub const PEOPLE_PHONE_NUMBER: ResourceDescriptor = child(
    "people_phone_number",
    ApiFamily::People,
    "people/{person_id}/phone_numbers",
    "people_person",
    "person_id",
);

/// Every stream the connector can read, in catalog order
pub static RESOURCES: &[ResourceDescriptor] = &[
    GROUPS_EVENT,
    GROUPS_GROUP_TYPE,
    GROUPS_GROUP,
    GROUPS_MEMBERSHIP,
    GROUPS_ATTENDANCE,
    PEOPLE_PERSON,
    PEOPLE_ADDRESS,
    PEOPLE_EMAIL,
    PEOPLE_HOUSEHOLD,
    PEOPLE_CAMPUS,
    PEOPLE_PHONE_NUMBER,
];

/// Look up a stream by name
pub fn find(name: &str) -> Option<&'static ResourceDescriptor> {
    RESOURCES.iter().find(|descriptor| descriptor.name == name)
}

/// Streams belonging to any of the given families
pub fn for_families(
    families: &[ApiFamily],
) -> impl Iterator<Item = &'static ResourceDescriptor> + '_ {
    RESOURCES
        .iter()
        .filter(move |descriptor| families.contains(&descriptor.family))
}

/// Names of all streams
pub fn names() -> Vec<&'static str> {
    RESOURCES.iter().map(|descriptor| descriptor.name).collect()
}
