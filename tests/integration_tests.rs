//! Integration tests using mock HTTP server
//!
//! Tests the full flow: config → connector → paginated, authenticated
//! requests → messages → Parquet output

use futures::TryStreamExt;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use source_planning_center::cli::{Cli, Runner};
use source_planning_center::config::{Catalog, CatalogStream, ConfiguredCatalog};
use source_planning_center::engine::{Message, StreamStatus};
use source_planning_center::output::ParquetSink;
use source_planning_center::{build_auth_header, streams, Connector, SourcePlanningCenter};
use std::fs::File;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUPS_VERSION: &str = "2018-08-01";
const PEOPLE_VERSION: &str = "2020-07-22";

fn config_for(server: &MockServer) -> Value {
    json!({
        "app_id": "abc",
        "secret": "xyz",
        "base_url": server.uri(),
        "http": {"max_retries": 0, "rate_limit_rps": null}
    })
}

fn configured(names: &[&str]) -> ConfiguredCatalog {
    Catalog {
        streams: names
            .iter()
            .map(|name| CatalogStream::from_descriptor(streams::find(name).unwrap()))
            .collect(),
    }
    .into_configured()
}

fn resources(kind: &str, ids: &[&str]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"type": kind, "id": id, "attributes": {"name": format!("{kind} {id}")}}))
        .collect()
}

/// Mount a single-page list endpoint that requires the family's headers
async fn mount_list(server: &MockServer, route: &str, version: &str, data: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("per_page", "100"))
        .and(header("X-PCO-API-Version", version))
        .and(header("Authorization", "Basic YWJjOnh5eg=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": data,
            "included": [],
            "meta": {"total_count": data.len(), "count": data.len()}
        })))
        .mount(server)
        .await;
}

fn record_ids(messages: &[Message], stream_name: &str) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { stream, data, .. } if stream == stream_name => {
                Some(data["id"].as_str().unwrap().to_string())
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_basic_auth_header() {
    let headers = build_auth_header("abc", "xyz");
    assert_eq!(headers["Authorization"], "Basic YWJjOnh5eg==");
}

#[tokio::test]
async fn test_read_all_groups_streams() {
    let server = MockServer::start().await;

    mount_list(&server, "/groups/v2/events", GROUPS_VERSION, resources("Event", &["e1", "e2"])).await;
    mount_list(&server, "/groups/v2/group_types", GROUPS_VERSION, resources("GroupType", &["t1"])).await;
    mount_list(&server, "/groups/v2/groups", GROUPS_VERSION, resources("Group", &["g1", "g2"])).await;
    mount_list(&server, "/groups/v2/groups/g1/memberships", GROUPS_VERSION, resources("Membership", &["m1", "m2"])).await;
    mount_list(&server, "/groups/v2/groups/g2/memberships", GROUPS_VERSION, resources("Membership", &["m3"])).await;
    mount_list(&server, "/groups/v2/events/e1/attendances", GROUPS_VERSION, resources("Attendance", &["a1"])).await;
    mount_list(&server, "/groups/v2/events/e2/attendances", GROUPS_VERSION, resources("Attendance", &["a2", "a3"])).await;

    let source = SourcePlanningCenter::new();
    let catalog = source
        .discover(&json!({"app_id": "abc", "secret": "xyz", "families": ["groups"]}))
        .await
        .unwrap()
        .into_configured();
    assert_eq!(catalog.streams.len(), 5);

    let messages: Vec<Message> = source
        .read(&config_for(&server), &catalog)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(record_ids(&messages, "groups_event"), vec!["e1", "e2"]);
    assert_eq!(record_ids(&messages, "groups_group_type"), vec!["t1"]);
    assert_eq!(record_ids(&messages, "groups_group"), vec!["g1", "g2"]);
    assert_eq!(record_ids(&messages, "groups_membership"), vec!["m1", "m2", "m3"]);
    assert_eq!(record_ids(&messages, "groups_attendance"), vec!["a1", "a2", "a3"]);

    let completed: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            Message::StreamStatus {
                stream,
                status: StreamStatus::Complete { records, pages },
            } => Some((stream.as_str(), *records, *pages)),
            _ => None,
        })
        .collect();
    assert_eq!(
        completed,
        vec![
            ("groups_event", 2, 1),
            ("groups_group_type", 1, 1),
            ("groups_group", 2, 1),
            ("groups_membership", 3, 3),
            ("groups_attendance", 3, 3),
        ]
    );
}

#[tokio::test]
async fn test_read_people_with_pagination_and_children() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/v2/people"))
        .and(query_param_is_missing("offset"))
        .and(header("X-PCO-API-Version", PEOPLE_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": resources("Person", &["1", "2"]),
            "meta": {"next": {"offset": 2}, "total_count": 3}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/people/v2/people"))
        .and(query_param("offset", "2"))
        .and(header("X-PCO-API-Version", PEOPLE_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": resources("Person", &["3"]),
            "meta": {"total_count": 3}
        })))
        .mount(&server)
        .await;

    for (person, phones) in [("1", vec!["p1"]), ("2", vec![]), ("3", vec!["p2", "p3"])] {
        mount_list(
            &server,
            &format!("/people/v2/people/{person}/phone_numbers"),
            PEOPLE_VERSION,
            resources("PhoneNumber", &phones),
        )
        .await;
    }

    let messages: Vec<Message> = SourcePlanningCenter::new()
        .read(
            &config_for(&server),
            &configured(&["people_person", "people_phone_number"]),
        )
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(record_ids(&messages, "people_person"), vec!["1", "2", "3"]);
    assert_eq!(
        record_ids(&messages, "people_phone_number"),
        vec!["p1", "p2", "p3"]
    );

    // started, 3 records, complete for each stream
    assert_eq!(messages.len(), 5 + 5);
    assert_eq!(messages[0], Message::started("people_person"));
    assert_eq!(messages[5], Message::started("people_phone_number"));
}

#[tokio::test]
async fn test_check_against_mock() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/v2/campuses"))
        .and(query_param("per_page", "1"))
        .and(header("Authorization", "Basic YWJjOnh5eg=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/people/v2/campuses"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let result = SourcePlanningCenter::new()
        .check(&config_for(&server))
        .await
        .unwrap();
    assert!(result.success);

    let mut wrong = config_for(&server);
    wrong["secret"] = json!("wrong");
    let result = SourcePlanningCenter::new().check(&wrong).await.unwrap();
    assert!(!result.success);
    assert!(result
        .message
        .as_deref()
        .unwrap_or_default()
        .starts_with("Invalid application id or secret"));
}

#[tokio::test]
async fn test_read_to_parquet() {
    let server = MockServer::start().await;
    mount_list(&server, "/people/v2/emails", PEOPLE_VERSION, resources("Email", &["1", "2", "3"])).await;
    mount_list(&server, "/people/v2/addresses", PEOPLE_VERSION, vec![]).await;

    let dir = tempfile::TempDir::new().unwrap();
    let mut sink = ParquetSink::new(dir.path()).unwrap();

    let messages: Vec<Message> = SourcePlanningCenter::new()
        .read(
            &config_for(&server),
            &configured(&["people_email", "people_address"]),
        )
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    for message in &messages {
        sink.push(message).unwrap();
    }

    let written = sink.finish().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].stream, "people_email");
    assert_eq!(written[0].rows, 3);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&written[0].path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    let schema = batches[0].schema();
    let columns: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(columns, vec!["attributes", "id", "type"]);
}

#[tokio::test]
async fn test_cli_read_writes_parquet_files() {
    let server = MockServer::start().await;
    mount_list(&server, "/groups/v2/group_types", GROUPS_VERSION, resources("GroupType", &["1"])).await;

    let dir = tempfile::TempDir::new().unwrap();
    let config = config_for(&server).to_string();
    let output = dir.path().to_str().unwrap().to_string();

    let cli = <Cli as clap::Parser>::try_parse_from([
        "source-planning-center",
        "--format",
        "parquet",
        "read",
        "--streams",
        "groups_group_type",
        "--config-json",
        config.as_str(),
        "--output",
        output.as_str(),
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
    assert!(dir.path().join("groups_group_type.parquet").exists());
}

#[tokio::test]
async fn test_cli_read_failure_returns_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/v2/groups"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = config_for(&server).to_string();
    let cli = <Cli as clap::Parser>::try_parse_from([
        "source-planning-center",
        "read",
        "--streams",
        "groups_membership",
        "--config-json",
        config.as_str(),
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err.is_auth_failure());
}
