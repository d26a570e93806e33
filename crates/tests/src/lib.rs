//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置文件 → sink → driver → checkpoint 的完整流程
//! - 基于进程内 axum 服务的 REST 投递验证

#[cfg(test)]
mod e2e_tests {
    use std::io::{Cursor, Write};
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use config_loader::ConfigLoader;
    use contracts::{TargetConfig, TargetError};
    use dispatcher::{create_sink, SinkKind};
    use engine::{emit_checkpoint, Driver, RunOutcome};
    use ingestion::LineSource;
    use serde_json::{json, Value};
    use tempfile::NamedTempFile;

    type Received = Arc<Mutex<Vec<Value>>>;

    const USERS_SCHEMA: &str = r#"{"type":"SCHEMA","stream":"users","schema":{"type":"object","properties":{"id":{"type":"integer"},"name":{"type":"string"}},"required":["id"]},"key_properties":["id"]}"#;

    /// Spawn a REST endpoint that records bodies and answers with `status`
    async fn spawn_api(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::clone(&received);

        let app = Router::new().route(
            "/test",
            post(move |Json(body): Json<Value>| {
                let state = Arc::clone(&state);
                async move {
                    state.lock().unwrap().push(body);
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/test"), received)
    }

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn input(lines: &[String]) -> LineSource<Cursor<Vec<u8>>> {
        LineSource::new(Cursor::new(format!("{}\n", lines.join("\n")).into_bytes()))
    }

    fn record(id: i64) -> String {
        format!(r#"{{"type":"RECORD","stream":"users","record":{{"id":{id},"name":"user{id}"}}}}"#)
    }

    async fn run_rest(config: &TargetConfig, lines: &[String]) -> Result<RunOutcome, TargetError> {
        let sink = create_sink(config, SinkKind::Rest).unwrap();
        let mut driver = Driver::from_config(sink, config);
        driver.run(input(lines)).await
    }

    async fn checkpoint_output(outcome: &RunOutcome) -> String {
        let mut out: Vec<u8> = Vec::new();
        emit_checkpoint(&mut out, outcome.checkpoint.as_ref())
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    /// SCHEMA / RECORD / STATE with no batch size: one object POST, state echoed
    #[tokio::test]
    async fn test_e2e_single_record_and_state() {
        let (url, received) = spawn_api(StatusCode::OK).await;
        let file = write_config(
            ".json",
            &format!(r#"{{"api_url": "{url}", "disable_collection": true}}"#),
        );
        let config = ConfigLoader::load_from_path(file.path()).unwrap();

        let lines = vec![
            USERS_SCHEMA.to_string(),
            r#"{"type":"RECORD","stream":"users","record":{"id":1}}"#.to_string(),
            r#"{"type":"STATE","value":{"users":1}}"#.to_string(),
        ];
        let outcome = run_rest(&config, &lines).await.unwrap();

        assert_eq!(*received.lock().unwrap(), vec![json!({"id": 1})]);
        assert_eq!(checkpoint_output(&outcome).await, "{\"users\":1}\n");
    }

    /// Seven records in batches of three: 3 + 3 + remainder 1, all as arrays
    #[tokio::test]
    async fn test_e2e_batched_delivery() {
        let (url, received) = spawn_api(StatusCode::CREATED).await;
        let file = write_config(
            ".toml",
            &format!("api_url = \"{url}\"\nbatch_size = 3\ndisable_collection = true\n"),
        );
        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.batch_size(), 3);

        let mut lines = vec![USERS_SCHEMA.to_string()];
        lines.extend((1..=7).map(record));
        lines.push(r#"{"type":"STATE","value":{"bookmark":7}}"#.to_string());

        let outcome = run_rest(&config, &lines).await.unwrap();

        let received = received.lock().unwrap();
        let sizes: Vec<usize> = received
            .iter()
            .map(|body| body.as_array().map(Vec::len).unwrap_or(0))
            .collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(received[2], json!([{"id": 7, "name": "user7"}]));
        assert_eq!(outcome.summary.records_sent, 7);
        assert_eq!(outcome.checkpoint, Some(json!({"bookmark": 7})));
    }

    /// State followed by a record leaves nothing to echo
    #[tokio::test]
    async fn test_e2e_trailing_record_clears_state() {
        let (url, _) = spawn_api(StatusCode::OK).await;
        let config = TargetConfig::new(url);

        let lines = vec![
            USERS_SCHEMA.to_string(),
            r#"{"type":"STATE","value":{"users":0}}"#.to_string(),
            record(1),
        ];
        let outcome = run_rest(&config, &lines).await.unwrap();

        assert_eq!(outcome.checkpoint, None);
        assert_eq!(checkpoint_output(&outcome).await, "");
    }

    /// A rejected POST ends the run before later lines are read
    #[tokio::test]
    async fn test_e2e_server_error_aborts() {
        let (url, received) = spawn_api(StatusCode::INTERNAL_SERVER_ERROR).await;
        let config = TargetConfig::new(url.clone());

        let lines = vec![USERS_SCHEMA.to_string(), record(1), record(2)];
        let err = run_rest(&config, &lines).await.unwrap_err();

        assert!(matches!(err, TargetError::Delivery { status: Some(500), .. }));
        assert!(err.to_string().contains(&url));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    /// Invalid batch_size values fall back to one request per record
    #[tokio::test]
    async fn test_e2e_invalid_batch_size_is_unbatched() {
        let (url, received) = spawn_api(StatusCode::OK).await;
        let config =
            ConfigLoader::load_from_str(
                &format!(r#"{{"api_url": "{url}", "batch_size": "ten"}}"#),
                config_loader::ConfigFormat::Json,
            )
            .unwrap();

        let lines = vec![USERS_SCHEMA.to_string(), record(1), record(2)];
        run_rest(&config, &lines).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert!(received.iter().all(Value::is_object));
    }

    /// Dry run delivers nothing but still echoes state
    #[tokio::test]
    async fn test_e2e_dry_run() {
        let (url, received) = spawn_api(StatusCode::OK).await;
        let config = TargetConfig::new(url);
        let sink = create_sink(&config, SinkKind::Log).unwrap();

        let lines = vec![
            USERS_SCHEMA.to_string(),
            record(1),
            r#"{"type":"STATE","value":"s1"}"#.to_string(),
        ];
        let mut driver = Driver::from_config(sink, &config);
        let outcome = driver.run(input(&lines)).await.unwrap();

        assert!(received.lock().unwrap().is_empty());
        assert_eq!(outcome.summary.sends, 1);
        assert_eq!(driver.sender().metrics().record_count, 1);
        assert_eq!(checkpoint_output(&outcome).await, "\"s1\"\n");
    }

    /// Large integers and decimal text reach the endpoint and stdout untouched
    #[tokio::test]
    async fn test_e2e_numbers_are_not_reshaped() {
        let (url, received) = spawn_api(StatusCode::OK).await;
        let config = TargetConfig::new(url);

        let lines = vec![
            r#"{"type":"SCHEMA","stream":"prices","schema":{"type":"object","properties":{"price":{"type":"number","multipleOf":0.01}}},"key_properties":["id"]}"#.to_string(),
            r#"{"type":"RECORD","stream":"prices","record":{"id":123456789012345678901234567890,"price":19.99}}"#.to_string(),
            r#"{"type":"STATE","value":{"bookmark":123456789012345678901234567890,"ratio":1.10}}"#.to_string(),
        ];
        let outcome = run_rest(&config, &lines).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(
            serde_json::to_string(&received[0]).unwrap(),
            r#"{"id":123456789012345678901234567890,"price":19.99}"#
        );
        assert_eq!(
            checkpoint_output(&outcome).await,
            "{\"bookmark\":123456789012345678901234567890,\"ratio\":1.10}\n"
        );
    }

    /// A config without api_url is rejected before anything runs
    #[test]
    fn test_e2e_missing_api_url() {
        let file = write_config(".json", r#"{"batch_size": 10}"#);
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, TargetError::Config { ref field, .. } if field == "api_url"));
    }
}
