//! End-to-end calls over the reqwest transport against a mockito server

use crate::mock_server::MockServerFixture;
use ym_lib_rust::{Error, Params, Session, YmClient};

#[tokio::test]
async fn test_session_create_over_http() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_envelope(
            "Session.Create",
            "<ErrCode>0</ErrCode><Session.Create><SessionID>HTTP-1</SessionID></Session.Create>",
        )
        .await;
    let client = fixture.create_test_client().unwrap();

    let session = Session::create(&client).await.unwrap();
    assert_eq!(session.session_id(), "HTTP-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_base_uri_path_is_kept() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/ym/api/")
        .with_status(200)
        .with_body(crate::scripted::envelope(
            "<ErrCode>0</ErrCode><Session.Create><SessionID>PATH-1</SessionID></Session.Create>",
        ))
        .create_async()
        .await;
    let client = YmClient::builder()
        .config(crate::scripted::test_config())
        .base_uri_override(format!("{}/ym/api", fixture.base_url))
        .build()
        .unwrap();

    let session = Session::create(&client).await.unwrap();
    assert_eq!(session.session_id(), "PATH-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_status_is_communication_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_http_error(500, "Internal Server Error").await;
    let client = fixture.create_test_client().unwrap();

    let err = Session::create(&client).await.unwrap_err();
    match err {
        Error::Communication(e) => assert_eq!(e.status(), Some(500)),
        other => panic!("unexpected error: {other}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_escaped_cdata_is_repaired_over_http() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_envelope(
            "Session.Ping",
            "<ErrCode>0</ErrCode>\
             <ExtendedErrorInfo>&lt;![CDATA[<p>details</p>]]&gt</ExtendedErrorInfo>\
             <Session.Ping>1</Session.Ping>",
        )
        .await;
    let client = fixture.create_test_client().unwrap();

    let envelope = client
        .call(
            "Session.Ping",
            ym_lib_rust::Identity::Session(&Session::from_id("S-1")),
            &Params::new(),
        )
        .await
        .unwrap();
    assert_eq!(envelope.extended_error_info.as_deref(), Some("<p>details</p>"));
    assert_eq!(envelope.result_for("Session.Ping"), Some(&serde_json::json!("1")));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    crate::scripted::init_tracing();
    let client = YmClient::builder()
        .config(crate::scripted::test_config())
        .base_uri_override("http://127.0.0.1:9")
        .build()
        .unwrap();
    let err = Session::create(&client).await.unwrap_err();
    assert!(err.is_communication());
}
