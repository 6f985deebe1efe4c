use grafana_alert_tf::{
    config::Grafana as GrafanaConfig,
    grafana::{Grafana, alert::Alert},
};
use serde_json::json;
use std::{io::Write, time::Duration};

const UID: &str = "cbb410f8-3d68-4eb6-9334-9e2b6e05226f";

fn client(url: String) -> Grafana {
    client_with_timeout(url, 5)
}

fn client_with_timeout(url: String, timeout_seconds: u64) -> Grafana {
    Grafana::new(GrafanaConfig {
        url,
        token: "test-api-key".to_string(),
        insecure: false,
        timeout_seconds,
    })
    .unwrap()
}

fn alert_body() -> String {
    json!({
        "id": 529,
        "uid": UID,
        "orgID": 1,
        "folderUID": "NiPuuXZVk",
        "ruleGroup": "devops",
        "title": "ECS Looping Test",
        "condition": "C",
        "data": [{
            "refId": "A",
            "queryType": "",
            "relativeTimeRange": { "from": 600, "to": 0 },
            "datasourceUid": "hsppouZ4z",
            "model": {
                "datasource": { "type": "cloudwatch", "uid": "hsppouZ4z" },
                "intervalMs": 1000,
                "maxDataPoints": 43200,
                "refId": "A"
            }
        }],
        "updated": "2024-03-01T10:15:00Z",
        "noDataState": "NoData",
        "execErrState": "Error",
        "for": "5m",
        "annotations": { "Account": "Development" },
        "labels": { "alert": "test" },
        "isPaused": false
    })
    .to_string()
}

#[tokio::test]
async fn test_get_alert() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .match_header("authorization", "Bearer test-api-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(alert_body())
        .create_async()
        .await;

    let alert = client(server.url()).get_alert(UID).await.unwrap();

    assert_eq!(alert.uid, UID);
    assert_eq!(alert.title, "ECS Looping Test");
    assert_eq!(alert.data.len(), 1);
    assert_eq!(alert.data[0].model.max_data_points, 43200);
    assert_eq!(alert.labels["alert"], "test");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_trailing_slash_in_url() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .with_status(200)
        .with_body(alert_body())
        .create_async()
        .await;

    let alert = client(format!("{}/", server.url())).get_alert(UID).await;

    assert!(alert.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_non_success_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/v1/provisioning/alert-rules/missing")
        .with_status(404)
        .with_body(r#"{"message":"not found"}"#)
        .create_async()
        .await;

    let err = client(server.url()).get_alert("missing").await.unwrap_err();

    assert!(err.to_string().contains("404"), "{err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_unauthorized() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .with_status(401)
        .create_async()
        .await;

    let err = client(server.url()).get_alert(UID).await.unwrap_err();

    assert!(err.to_string().contains("401"), "{err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_malformed_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .with_status(200)
        .with_body(r#"{"id": "not a number"}"#)
        .create_async()
        .await;

    let err = client(server.url()).get_alert(UID).await.unwrap_err();

    assert!(err.to_string().starts_with("Failed to decode alert"), "{err}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_matches_served_alert() {
    let mut server = mockito::Server::new_async().await;

    let alert: Alert = serde_json::from_str(&alert_body()).unwrap();
    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .with_status(200)
        .with_body(serde_json::to_string(&alert).unwrap())
        .create_async()
        .await;

    let fetched = client(server.url()).get_alert(UID).await.unwrap();

    assert_eq!(fetched, alert);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_alert_encodes_uid_as_one_segment() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/v1/provisioning/alert-rules/team%2Fdisk%3Ffull")
        .with_status(200)
        .with_body(alert_body())
        .create_async()
        .await;

    let alert = client(server.url()).get_alert("team/disk?full").await;

    assert!(alert.is_ok(), "{alert:?}");
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_alert_times_out() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", format!("/api/v1/provisioning/alert-rules/{UID}").as_str())
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(alert_body().as_bytes())
        })
        .create_async()
        .await;

    let started = std::time::Instant::now();
    let result = client_with_timeout(server.url(), 1).get_alert(UID).await;

    assert!(result.is_err(), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(3));
    mock.assert_async().await;
}
