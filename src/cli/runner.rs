//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::SourceConfig;
use crate::connector::{CheckResult, Connector, SourcePlanningCenter};
use crate::engine::{Message, StreamStatus, SyncStats};
use crate::error::{Error, Result};
use crate::output::ParquetSink;
use crate::streams;
use futures::StreamExt;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::error;

/// CLI runner
pub struct Runner {
    cli: Cli,
    connector: SourcePlanningCenter,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            connector: SourcePlanningCenter::new(),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Discover { config_json } => self.discover(config_json.as_deref()).await,
            Commands::Streams { config_json } => self.streams(config_json.as_deref()),
            Commands::Read {
                streams,
                config_json,
                output,
            } => {
                self.read(
                    streams.as_deref(),
                    config_json.as_deref(),
                    output.as_deref(),
                )
                .await
            }
        }
    }

    /// Load configuration if any was given; inline config takes precedence
    fn load_config(&self, inline: Option<&str>) -> Result<Option<Value>> {
        if let Some(json_str) = inline {
            return serde_json::from_str(json_str)
                .map(Some)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        if let Some(path) = &self.cli.config {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
            return serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        Ok(None)
    }

    fn require_config(&self, inline: Option<&str>) -> Result<Value> {
        self.load_config(inline)?.ok_or_else(|| {
            Error::config("No configuration given, use --config or --config-json")
        })
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        let spec = self.connector.spec();
        self.output_message(&json!({
            "type": "SPEC",
            "spec": {
                "documentationUrl": spec.documentation_url,
                "connectionSpecification": spec.connection_specification
            }
        }));
        Ok(())
    }

    /// Check connection
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.require_config(config_json)?;
        let result = self.connector.check(&config).await?;
        self.output_message(&connection_status(&result));
        Ok(())
    }

    /// Discover streams
    async fn discover(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.require_config(config_json)?;
        let catalog = self.connector.discover(&config).await?;
        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": catalog
        }));
        Ok(())
    }

    /// List available streams (lightweight, no schemas)
    fn streams(&self, config_json: Option<&str>) -> Result<()> {
        let names: Vec<&str> = match self.load_config(config_json)? {
            Some(value) => {
                let config = SourceConfig::from_value(&value)?;
                streams::for_families(&config.families)
                    .map(|d| d.name)
                    .collect()
            }
            None => streams::names(),
        };

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": names,
            "connector": crate::NAME
        }));
        Ok(())
    }

    /// Read streams
    async fn read(
        &self,
        streams: Option<&str>,
        config_json: Option<&str>,
        output: Option<&Path>,
    ) -> Result<()> {
        let sync_start = Instant::now();
        let config = self.require_config(config_json)?;

        let mut sink = match (self.cli.format, output) {
            (OutputFormat::Parquet, Some(dir)) => Some(ParquetSink::new(dir)?),
            (OutputFormat::Parquet, None) => {
                return Err(Error::config("--output is required with --format parquet"))
            }
            _ => None,
        };

        let mut catalog = self.connector.discover(&config).await?.into_configured();
        if let Some(names) = parse_stream_list(streams) {
            catalog = catalog.select(&names)?;
        }

        let mut messages = self.connector.read(&config, &catalog).await?;
        let mut stats = SyncStats::new();
        let mut stream_results: Vec<Value> = Vec::new();
        let mut failure = None;

        while let Some(item) = messages.next().await {
            let handled = item.and_then(|message| {
                stats.observe(&message);
                if let Message::StreamStatus {
                    stream,
                    status: StreamStatus::Complete { records, pages },
                } = &message
                {
                    stream_results.push(json!({
                        "stream": stream,
                        "status": "SUCCESS",
                        "records_synced": records,
                        "pages_fetched": pages
                    }));
                }

                let buffered = match sink.as_mut() {
                    Some(sink) => sink.push(&message)?,
                    None => false,
                };
                if !buffered {
                    self.output_message(&message_to_json(&message));
                }
                Ok(())
            });

            if let Err(e) = handled {
                stats.add_error();
                error!("Read failed: {e}");
                self.output_message(&json!({
                    "type": "TRACE",
                    "trace": {
                        "type": "ERROR",
                        "emitted_at": chrono::Utc::now().timestamp_millis(),
                        "error": {
                            "message": e.to_string(),
                            "failure_type": if e.is_auth_failure() { "config_error" } else { "system_error" }
                        }
                    }
                }));
                failure = Some(e);
                break;
            }
        }

        let files = match sink {
            Some(sink) if failure.is_none() => sink.finish()?,
            Some(sink) => {
                sink.abort();
                Vec::new()
            }
            None => Vec::new(),
        };

        stats.set_duration(sync_start.elapsed().as_millis() as u64);
        self.output_message(&json!({
            "type": "SYNC_SUMMARY",
            "summary": {
                "status": if failure.is_none() { "SUCCEEDED" } else { "FAILED" },
                "connector": crate::NAME,
                "total_records": stats.records_synced,
                "total_pages": stats.pages_fetched,
                "total_streams": stats.streams_synced,
                "errors": stats.errors,
                "duration_ms": stats.duration_ms,
                "output": {
                    "format": self.cli.format.as_str(),
                    "directory": output.map(|p| p.display().to_string()),
                    "files": files.iter().map(|f| json!({
                        "stream": f.stream,
                        "path": f.path.display().to_string(),
                        "rows": f.rows
                    })).collect::<Vec<_>>()
                },
                "streams": stream_results
            }
        }));

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json | OutputFormat::Parquet => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Split a comma-separated stream list, ignoring blanks
fn parse_stream_list(streams: Option<&str>) -> Option<Vec<String>> {
    let names: Vec<String> = streams?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!names.is_empty()).then_some(names)
}

fn connection_status(result: &CheckResult) -> Value {
    json!({
        "type": "CONNECTION_STATUS",
        "connectionStatus": {
            "status": if result.success { "SUCCEEDED" } else { "FAILED" },
            "message": result.message.clone().unwrap_or_else(|| "Connection successful".to_string())
        }
    })
}

/// Airbyte protocol representation of a message
pub fn message_to_json(message: &Message) -> Value {
    match message {
        Message::Record {
            stream,
            data,
            emitted_at,
        } => json!({
            "type": "RECORD",
            "record": {
                "stream": stream,
                "data": data,
                "emitted_at": emitted_at.timestamp_millis()
            }
        }),
        Message::StreamStatus { stream, status } => json!({
            "type": "TRACE",
            "trace": {
                "type": "STREAM_STATUS",
                "emitted_at": chrono::Utc::now().timestamp_millis(),
                "stream_status": {
                    "stream_descriptor": {"name": stream},
                    "status": status.as_str()
                }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("source-planning-center").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_read_command() {
        let cli = cli(&[
            "read",
            "--streams",
            "people_person,people_email",
            "--config-json",
            "{}",
            "--format",
            "parquet",
            "-o",
            "out",
        ]);
        assert_eq!(cli.format, OutputFormat::Parquet);
        match cli.command {
            Commands::Read {
                streams,
                config_json,
                output,
            } => {
                assert_eq!(streams.as_deref(), Some("people_person,people_email"));
                assert_eq!(config_json.as_deref(), Some("{}"));
                assert_eq!(output, Some(std::path::PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = cli(&["--verbose", "--config", "config.json", "spec"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(std::path::PathBuf::from("config.json")));
        assert!(matches!(cli.command, Commands::Spec));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_stream_list() {
        assert_eq!(
            parse_stream_list(Some("a, b,,c ")),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(parse_stream_list(Some(" , ")), None);
        assert_eq!(parse_stream_list(None), None);
    }

    #[test]
    fn test_load_config_inline_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"app_id": "from-file", "secret": "s"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let runner = Runner::new(cli(&["--config", path.as_str(), "spec"]));
        let from_file = runner.load_config(None).unwrap().unwrap();
        assert_eq!(from_file["app_id"], "from-file");

        let inline = runner
            .load_config(Some(r#"{"app_id": "inline", "secret": "s"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(inline["app_id"], "inline");
    }

    #[test]
    fn test_require_config_errors() {
        let runner = Runner::new(cli(&["spec"]));
        assert!(runner.load_config(None).unwrap().is_none());
        assert!(matches!(
            runner.require_config(None),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            runner.require_config(Some("{not json")),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_record_message_json() {
        let message = Message::record("people_email", json!({"id": "9"}));
        let value = message_to_json(&message);
        assert_eq!(value["type"], "RECORD");
        assert_eq!(value["record"]["stream"], "people_email");
        assert_eq!(value["record"]["data"], json!({"id": "9"}));
        assert!(value["record"]["emitted_at"].is_i64());
    }

    #[test]
    fn test_status_message_json() {
        let value = message_to_json(&Message::complete("groups_group", 1, 1));
        assert_eq!(value["type"], "TRACE");
        assert_eq!(value["trace"]["stream_status"]["status"], "COMPLETE");
        assert_eq!(
            value["trace"]["stream_status"]["stream_descriptor"]["name"],
            "groups_group"
        );
    }

    #[test]
    fn test_connection_status_json() {
        let value = connection_status(&CheckResult::success());
        assert_eq!(value["connectionStatus"]["status"], "SUCCEEDED");

        let value = connection_status(&CheckResult::failure("HTTP 401: nope"));
        assert_eq!(value["connectionStatus"]["status"], "FAILED");
        assert_eq!(value["connectionStatus"]["message"], "HTTP 401: nope");
    }

    #[tokio::test]
    async fn test_read_parquet_requires_output() {
        let runner = Runner::new(cli(&[
            "--format",
            "parquet",
            "read",
            "--config-json",
            r#"{"app_id": "a", "secret": "b"}"#,
        ]));
        let err = runner.run().await.unwrap_err();
        assert!(err.to_string().contains("--output"));
    }

    #[tokio::test]
    async fn test_read_unknown_stream_fails_before_requests() {
        let runner = Runner::new(cli(&[
            "read",
            "--streams",
            "people_pet",
            "--config-json",
            r#"{"app_id": "a", "secret": "b", "base_url": "http://127.0.0.1:9"}"#,
        ]));
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, Error::StreamNotFound { .. }));
    }
}
