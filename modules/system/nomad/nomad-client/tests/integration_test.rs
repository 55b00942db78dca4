use httpmock::prelude::*;
use nomad_client::{
    Arguments, NomadClient, NomadClientConfig, NomadClientV1, NomadError, Output, StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

async fn create_mock_agent() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/status/leader");
            then.status(200).json_body(json!("127.0.0.1:4647"));
        })
        .await;
    server
}

async fn connect(server: &MockServer) -> NomadClient {
    NomadClient::connect(NomadClientConfig::remote(server.base_url(), None))
        .await
        .unwrap()
}

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("test arguments must be an object"),
    }
}

#[tokio::test]
async fn test_list_jobs_preserves_order() {
    let server = create_mock_agent().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/jobs");
            then.status(200).json_body(json!([
                {"ID": "test-job-1", "Name": "test-job-1", "Status": "running", "Type": "service"},
                {"ID": "test-job-2", "Name": "test-job-2", "Status": "pending", "Type": "batch"}
            ]));
        })
        .await;

    let client = connect(&server).await;
    let output = client
        .invoke("list_jobs", &args(json!({"namespace": "default", "prefix": ""})))
        .await
        .unwrap();

    match output {
        Output::Jobs(jobs) => {
            let ids: Vec<&str> = jobs.iter().map(|job| job.id.as_str()).collect();
            assert_eq!(ids, ["test-job-1", "test-job-2"]);
        }
        other => panic!("unexpected output: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_job_is_api_error() {
    let server = create_mock_agent().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/job/missing");
            then.status(404).json_body(json!({"error": "not found"}));
        })
        .await;

    let client = connect(&server).await;
    let err = client
        .invoke("get_job", &args(json!({"job_id": "missing", "namespace": "default"})))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.body_text().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_drain_node_sends_deadline() {
    let server = create_mock_agent().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/node/node-1/drain").json_body(json!({
                "NodeID": "node-1",
                "DrainSpec": {"Deadline": 300, "IgnoreSystemJobs": false},
                "MarkEligible": false
            }));
            then.status(200).json_body(json!({"EvalIDs": [], "NodeModifyIndex": 12}));
        })
        .await;

    let client = connect(&server).await;
    let output = client
        .invoke(
            "drain_node",
            &args(json!({"node_id": "node-1", "enable": true, "deadline": 300.0})),
        )
        .await
        .unwrap();

    let message = output.to_text().unwrap();
    assert!(message.contains("300 seconds"), "{message}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_variable_without_cas() {
    let server = create_mock_agent().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path("/v1/var/app/config").json_body(json!({
                "Namespace": "default",
                "Path": "app/config",
                "Items": {"database_url": "postgres://db:5432/app"}
            }));
            then.status(200).json_body(json!({
                "Namespace": "default",
                "Path": "app/config",
                "Items": {"database_url": "postgres://db:5432/app"},
                "ModifyIndex": 10
            }));
        })
        .await;

    let client = connect(&server).await;
    let result = client
        .invoke(
            "create_variable",
            &args(json!({
                "path": "app/config",
                "items": {"database_url": "postgres://db:5432/app"},
                "cas": 0
            })),
        )
        .await;

    assert!(result.is_ok(), "{result:?}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_variable_round_trip() {
    let server = create_mock_agent().await;
    let stored = json!({
        "Namespace": "default",
        "Path": "app/config",
        "Items": {"k": "v"},
        "CreateIndex": 7,
        "ModifyIndex": 7
    });
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/v1/var/app/config");
            then.status(200).json_body(stored.clone());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/var/app/config");
            then.status(200).json_body(stored.clone());
        })
        .await;

    let client = connect(&server).await;
    client
        .invoke(
            "create_variable",
            &args(json!({"path": "app/config", "items": {"k": "v"}})),
        )
        .await
        .unwrap();
    let output = client
        .invoke("get_variable", &args(json!({"path": "app/config"})))
        .await
        .unwrap();

    match output {
        Output::Variable(variable) => {
            assert_eq!(variable.items.len(), 1);
            assert_eq!(variable.items["k"], "v");
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_job_is_idempotent() {
    let server = create_mock_agent().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/job/X");
            then.status(200).json_body(json!({
                "ID": "X",
                "Name": "X",
                "Namespace": "default",
                "Type": "service",
                "TaskGroups": [{"Name": "web", "Count": 2}]
            }));
        })
        .await;

    let client = connect(&server).await;
    let call = args(json!({"job_id": "X", "namespace": "default"}));
    let first = client.invoke("get_job", &call).await.unwrap();
    let second = client.invoke("get_job", &call).await.unwrap();

    assert_eq!(first, second);
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_namespaced_routes() {
    let server = create_mock_agent().await;
    let job = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/namespace/billing/job/web");
            then.status(200).json_body(json!({"ID": "web", "Namespace": "billing"}));
        })
        .await;
    let allocations = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/allocations")
                .query_param("namespace", "billing");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = connect(&server).await;
    client
        .invoke("get_job", &args(json!({"job_id": "web", "namespace": "billing"})))
        .await
        .unwrap();
    client
        .invoke("list_allocations", &args(json!({"namespace": "billing"})))
        .await
        .unwrap();

    job.assert_async().await;
    allocations.assert_async().await;
}

#[tokio::test]
async fn test_bootstrap_installs_token() {
    let server = create_mock_agent().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/acl/bootstrap");
            then.status(200).json_body(json!({
                "AccessorID": "a1b2",
                "SecretID": "bootstrap-secret",
                "Name": "Bootstrap Token",
                "Type": "management",
                "Global": true
            }));
        })
        .await;
    let authed = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/acl/tokens")
                .header("x-nomad-token", "bootstrap-secret");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = connect(&server).await;
    assert!(!client.is_authenticated());

    let output = client
        .invoke("bootstrap_acl_token", &Arguments::new())
        .await
        .unwrap();
    assert!(matches!(output, Output::AclToken(ref token) if token.accessor_id == "a1b2"));
    assert_eq!(
        client.token().unwrap().expose_secret(),
        "bootstrap-secret"
    );

    client
        .invoke("list_acl_tokens", &Arguments::new())
        .await
        .unwrap();
    authed.assert_async().await;
}

#[tokio::test]
async fn test_configured_token_is_sent() {
    let server = create_mock_agent().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/nodes")
                .header("x-nomad-token", "operator-secret");
            then.status(200)
                .json_body(json!([{"ID": "n1", "Name": "client-1", "Status": "ready"}]));
        })
        .await;

    let config = NomadClientConfig::remote(
        server.base_url(),
        Some(SecretString::new("operator-secret".to_owned().into_boxed_str())),
    );
    let client = NomadClient::connect(config).await.unwrap();
    let output = client.invoke("list_nodes", &Arguments::new()).await.unwrap();

    assert!(matches!(output, Output::Nodes(ref nodes) if nodes.len() == 1));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_forbidden_probe_still_connects() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/status/leader");
            then.status(403).body("Permission denied");
        })
        .await;

    let client = NomadClient::connect(NomadClientConfig::remote(server.base_url(), None)).await;
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_failing_probe_is_connection_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/status/leader");
            then.status(500).body("No cluster leader");
        })
        .await;

    let err = NomadClient::connect(NomadClientConfig::remote(server.base_url(), None))
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert!(err.to_string().contains("No cluster leader"));
}

#[tokio::test]
async fn test_unreachable_agent_fails_construction() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = NomadClient::connect(NomadClientConfig::remote(address, None))
        .await
        .unwrap_err();
    assert!(matches!(err, NomadError::Connection { .. }));
}

#[tokio::test]
async fn test_malformed_address_fails_construction() {
    let err = NomadClient::connect(NomadClientConfig::remote("not an address", None))
        .await
        .unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn test_raw_logs_pass_through() {
    let server = create_mock_agent().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/client/fs/logs/a1")
                .query_param("task", "web")
                .query_param("type", "stderr")
                .query_param("plain", "true");
            then.status(200).body("panic: boom\n\tat main.go:12\n");
        })
        .await;

    let client = connect(&server).await;
    let output = client
        .invoke(
            "get_allocation_logs",
            &args(json!({"alloc_id": "a1", "task": "web", "log_type": "stderr"})),
        )
        .await
        .unwrap();

    assert_eq!(output, Output::Text("panic: boom\n\tat main.go:12\n".to_owned()));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = create_mock_agent().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/node/n1");
            then.status(200).body("<html>proxy error</html>");
        })
        .await;

    let client = connect(&server).await;
    let err = client
        .invoke("get_node", &args(json!({"node_id": "n1"})))
        .await
        .unwrap_err();
    assert!(matches!(err, NomadError::Decode(_)));
}

#[tokio::test]
async fn test_trait_object_dispatch() {
    let server = create_mock_agent().await;

    let client: Box<dyn NomadClientV1> = Box::new(connect(&server).await);
    let output = client
        .invoke("get_cluster_leader", &Arguments::new())
        .await
        .unwrap();
    assert_eq!(output, Output::Leader("127.0.0.1:4647".to_owned()));
}

#[tokio::test]
async fn test_from_env_uses_agent_address() {
    let server = create_mock_agent().await;
    let base_url = server.base_url();

    let config = temp_env::with_vars(
        [("NOMAD_ADDR", Some(base_url.as_str())), ("NOMAD_TOKEN", Some(""))],
        NomadClientConfig::from_env,
    );
    assert_eq!(config.address, base_url);
    assert!(config.token.is_none());

    let client = NomadClient::connect(config).await.unwrap();
    assert!(!client.is_authenticated());
}

#[test]
fn test_from_env_defaults() {
    temp_env::with_vars_unset(["NOMAD_ADDR", "NOMAD_TOKEN"], || {
        let config = NomadClientConfig::from_env();
        assert_eq!(config.address, nomad_client::DEFAULT_ADDRESS);
        assert!(config.token.is_none());
    });

    temp_env::with_var("NOMAD_TOKEN", Some("t0k3n"), || {
        let config = NomadClientConfig::from_env();
        assert_eq!(config.token.unwrap().expose_secret(), "t0k3n");
    });
}
