//! Tests for the resource catalog

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use test_case::test_case;

#[test]
fn test_catalog_names() {
    assert_eq!(
        names(),
        vec![
            "groups_event",
            "groups_group_type",
            "groups_group",
            "groups_membership",
            "groups_attendance",
            "people_person",
            "people_address",
            "people_email",
            "people_household",
            "people_campus",
            "people_phone_number",
        ]
    );
}

#[test]
fn test_stream_names_are_unique_and_prefixed() {
    let mut seen = HashSet::new();
    for descriptor in RESOURCES {
        assert!(seen.insert(descriptor.name), "duplicate {}", descriptor.name);
        assert!(descriptor
            .name
            .starts_with(&format!("{}_", descriptor.family.as_str())));
        assert_eq!(descriptor.primary_key, "id");
    }
}

#[test]
fn test_parents_resolve_to_top_level_streams_of_same_family() {
    for descriptor in RESOURCES.iter().filter(|d| d.is_child()) {
        let link = descriptor.parent.unwrap();
        let parent = find(link.stream).expect("parent stream exists");
        assert!(!parent.is_child());
        assert_eq!(parent.family, descriptor.family);
        assert!(descriptor
            .path
            .contains(&format!("{{{}}}", link.partition_field)));
    }
}

#[test_case("groups_membership", "groups/v2/groups/{group_id}/memberships", Some("groups_group") ; "membership")]
#[test_case("groups_attendance", "groups/v2/events/{event_id}/attendances", Some("groups_event") ; "attendance")]
#[test_case("people_phone_number", "people/v2/people/{person_id}/phone_numbers", Some("people_person") ; "phone number")]
#[test_case("people_person", "people/v2/people", None ; "person")]
#[test_case("groups_group_type", "groups/v2/group_types", None ; "group type")]
#[test_case("people_campus", "people/v2/campuses", None ; "campus")]
fn test_request_paths(name: &str, path: &str, parent: Option<&str>) {
    let descriptor = find(name).unwrap();
    assert_eq!(descriptor.request_path(), path);
    assert_eq!(descriptor.parent.map(|link| link.stream), parent);
}

#[test]
fn test_version_headers() {
    for descriptor in RESOURCES {
        let (name, value) = descriptor.version_header();
        assert_eq!(name, "X-PCO-API-Version");
        match descriptor.family {
            ApiFamily::Groups => assert_eq!(value, "2018-08-01"),
            ApiFamily::People => assert_eq!(value, "2020-07-22"),
        }
    }
}

#[test]
fn test_find_unknown() {
    assert!(find("people_pet").is_none());
    assert!(find("").is_none());
}

#[test]
fn test_for_families() {
    let people: Vec<_> = for_families(&[ApiFamily::People]).map(|d| d.name).collect();
    assert_eq!(people.len(), 6);
    assert!(people.iter().all(|name| name.starts_with("people_")));

    assert_eq!(for_families(&ApiFamily::ALL).count(), RESOURCES.len());
    assert_eq!(for_families(&[]).count(), 0);
}

#[test]
fn test_family_serde() {
    let family: ApiFamily = serde_json::from_str("\"groups\"").unwrap();
    assert_eq!(family, ApiFamily::Groups);
    assert_eq!(serde_json::to_string(&ApiFamily::People).unwrap(), "\"people\"");
    assert_eq!(ApiFamily::People.to_string(), "people");
}
