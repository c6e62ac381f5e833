//! Integration tests for the devsimctl binary.
//!
//! The binary runs against a `wiremock` server speaking the simulation
//! service's JSON-RPC protocol.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to get a Command instance for devsimctl
fn devsimctl() -> Command {
    let mut cmd = Command::cargo_bin("devsimctl").expect("Failed to find devsimctl binary");
    let _ = cmd.env_remove("DEVSIM_CONFIG").env("RUST_LOG", "off");
    cmd
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": null
    }))
}

async fn mount(server: &MockServer, rpc_method: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a service hosting one model whose end-time bound is 5 and whose
/// events fall at t=1 and then t=8.
async fn mount_service(server: &MockServer, started: bool) {
    mount_service_with(server, started, 5.0, json!(8.0)).await;
}

/// Like [`mount_service`] with a custom bound and second next-event time.
async fn mount_service_with(server: &MockServer, started: bool, time_max: f64, second: Value) {
    mount(server, "session.open", ok(json!({ "session": "s-1" }))).await;
    mount(server, "object.isA", ok(json!(true))).await;
    mount(server, "modelHome.createWithConfig", ok(json!("model-1"))).await;
    mount(server, "modelHome.createFromDescriptor", ok(json!("model-1"))).await;
    mount(server, "modelHome.createSim", ok(json!("sim-1"))).await;
    mount(server, "modelHome.getModelList", ok(json!(["GenModel", "ZombieModel"]))).await;
    mount(
        server,
        "modelHome.getModelInfo",
        ok(json!(r#"{"modelName":"GenModel","time_max":100}"#)),
    )
    .await;
    mount(server, "model.getName", ok(json!("GenModel"))).await;
    mount(server, "model.ids", ok(json!(["::devsim::Model"]))).await;
    mount(server, "simulator.start", ok(json!(started))).await;
    mount(server, "simulator.execNextEvent", ok(Value::Null)).await;
    mount(server, "simulator.destroy", ok(Value::Null)).await;
    mount(server, "model.destroy", ok(Value::Null)).await;
    mount(server, "session.close", ok(Value::Null)).await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({ "method": "model.outputFunction" })))
        .respond_with(ok(json!([
            { "port": 0, "valueToJson": format!(r#"{{"clock":{{"time_max":{time_max}}}}}"#) }
        ])))
        .up_to_n_times(1)
        .mount(server)
        .await;
    mount(server, "model.outputFunction", ok(json!([]))).await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({ "method": "simulator.nextEventTime" })))
        .respond_with(ok(json!(1.0)))
        .up_to_n_times(1)
        .mount(server)
        .await;
    mount(server, "simulator.nextEventTime", ok(second)).await;
}

fn params_file(dir: &TempDir) -> String {
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"modelName":"GenModel"}"#).expect("Failed to write params");
    path.to_str().unwrap().to_owned()
}

fn summary_of(stdout: &[u8]) -> Value {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find(|value| value.get("steps").is_some())
        .expect("No summary in output")
}

// =============================================================================
// Argument handling
// =============================================================================

mod usage {
    use super::*;

    #[test]
    fn test_missing_parameter_file_is_usage_error() {
        devsimctl()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_too_many_positionals_is_usage_error() {
        devsimctl().args(["a", "b", "c"]).assert().code(1);
    }

    #[test]
    fn test_help_succeeds() {
        devsimctl()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--list-models"));
    }

    #[tokio::test]
    async fn test_unreadable_parameter_file_makes_no_remote_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ok(Value::Null))
            .expect(0)
            .mount(&mock_server)
            .await;

        let temp = tempdir().expect("Failed to create temp dir");
        let missing = temp.path().join("missing.json");

        devsimctl()
            .args([
                "--api",
                &mock_server.uri(),
                "--output-format",
                "json",
                missing.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("unable to read parameter file"));
    }
}

// =============================================================================
// Runs against a mock service
// =============================================================================

mod runs {
    use super::*;

    #[tokio::test]
    async fn test_named_model_run_succeeds() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let params = params_file(&temp);

        devsimctl()
            .args(["--api", &mock_server.uri(), "GenModel", &params])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps"))
            .stdout(predicate::str::contains("GenModel"));
    }

    #[tokio::test]
    async fn test_json_summary_reports_single_step() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let params = params_file(&temp);

        let assert = devsimctl()
            .args([
                "--api",
                &mock_server.uri(),
                "--output-format",
                "json",
                &params,
            ])
            .assert()
            .success();

        let summary = summary_of(&assert.get_output().stdout);

        assert_eq!(summary["steps"], json!(1));
        assert_eq!(summary["currentTime"], json!(1.0));
        assert_eq!(summary["timeMax"], json!(5.0));
        assert_eq!(summary["state"], json!("terminated"));
        assert_eq!(summary["origin"], json!({ "kind": "descriptor" }));
    }

    #[tokio::test]
    async fn test_exhausted_event_queue_ends_run() {
        let mock_server = MockServer::start().await;
        // +inf goes over the wire as null
        let exhausted = serde_json::to_value(f64::INFINITY).unwrap();
        mount_service_with(&mock_server, true, 100.0, exhausted).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let params = params_file(&temp);

        let assert = devsimctl()
            .args([
                "--api",
                &mock_server.uri(),
                "--output-format",
                "json",
                &params,
            ])
            .assert()
            .success();

        let summary = summary_of(&assert.get_output().stdout);

        assert_eq!(summary["steps"], json!(1));
        assert_eq!(summary["timeMax"], json!(100.0));
        assert_eq!(summary["state"], json!("terminated"));
    }

    #[tokio::test]
    async fn test_refused_start_fails_run() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, false).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let params = params_file(&temp);

        devsimctl()
            .args(["--api", &mock_server.uri(), &params])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("unable to start simulator"));
    }

    #[tokio::test]
    async fn test_wrong_capability_fails_run() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, "session.open", ok(json!({ "session": "s-1" }))).await;
        mount(&mock_server, "object.isA", ok(json!(false))).await;

        Mock::given(method("POST"))
            .and(path("/jsonrpc"))
            .and(body_partial_json(json!({ "method": "session.close" })))
            .respond_with(ok(Value::Null))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp = tempdir().expect("Failed to create temp dir");
        let params = params_file(&temp);

        devsimctl()
            .args(["--api", &mock_server.uri(), &params])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("does not expose capability"));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        devsimctl()
            .args(["--api", &mock_server.uri(), "--list-models"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ZombieModel"));
    }

    #[tokio::test]
    async fn test_endpoint_from_config_file() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let config = temp.path().join("config.toml");
        fs::write(&config, format!("api = \"{}\"\n", mock_server.uri()))
            .expect("Failed to write config");

        devsimctl()
            .args(["--config", config.to_str().unwrap(), "--list-models"])
            .assert()
            .success()
            .stdout(predicate::str::contains("GenModel"));
    }
}

// =============================================================================
// Parameter templates
// =============================================================================

mod model_info {
    use super::*;

    const TEMPLATE: &str = r#"{"modelName":"GenModel","time_max":100}"#;

    #[tokio::test]
    async fn test_writes_template_to_given_path() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        let temp = tempdir().expect("Failed to create temp dir");
        let out = temp.path().join("template.json");

        devsimctl()
            .args([
                "--api",
                &mock_server.uri(),
                "--model-info",
                "GenModel",
                "--out",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("time_max"));

        assert_eq!(fs::read_to_string(&out).unwrap(), TEMPLATE);
    }

    #[tokio::test]
    async fn test_default_path_follows_model_name() {
        let mock_server = MockServer::start().await;
        mount_service(&mock_server, true).await;

        let temp = tempdir().expect("Failed to create temp dir");

        devsimctl()
            .current_dir(temp.path())
            .args(["--api", &mock_server.uri(), "--model-info", "GenModel"])
            .assert()
            .success();

        let written = fs::read_to_string(temp.path().join("GenModel.json")).unwrap();
        assert_eq!(written, TEMPLATE);
    }

    #[test]
    fn test_out_requires_model_info() {
        devsimctl()
            .args(["--out", "template.json", "--list-models"])
            .assert()
            .code(1);
    }
}
