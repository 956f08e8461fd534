//! Request documents as they go over the wire

use crate::scripted::{client_with, ScriptedTransport};
use serde_json::json;
use std::sync::Arc;
use ym_lib_rust::{Error, Identity, Member, Params, Session};

#[tokio::test]
async fn test_admin_call_uses_private_key_and_generic_call_id() {
    let transport = ScriptedTransport::new();
    transport.push_result(
        "Sa.Members.All.GetIDs",
        "<Members><ID>57EEB598</ID><ID>9A1C7D20</ID></Members>",
    );
    let client = client_with(&transport);

    let ids = client
        .admin()
        .members_all_get_ids(&Params::new().with("Timestamp", "2014-01-01"))
        .await
        .unwrap();
    assert_eq!(ids, vec!["57EEB598", "9A1C7D20"]);

    let doc = transport.request(0);
    assert_eq!(doc["Version"], "2.00");
    assert_eq!(doc["ApiKey"], "PRIV-KEY");
    assert_eq!(doc["SaPasscode"], "SA-PASS");
    assert!(doc.get("SessionID").is_none());
    assert_eq!(doc["CallID"], "10000");
    assert_eq!(
        doc["Call"],
        json!({"Method": "Sa.Members.All.GetIDs", "Timestamp": "2014-01-01"})
    );
}

#[tokio::test]
async fn test_generic_call_ids_increase_across_calls() {
    let transport = ScriptedTransport::new();
    for _ in 0..3 {
        transport.push_result("Sa.People.All.GetIDs", "<People><ID>1</ID></People>");
    }
    let client = client_with(&transport);
    for _ in 0..3 {
        client.admin().people_all_get_ids(&Params::new()).await.unwrap();
    }
    let ids: Vec<String> = (0..3)
        .map(|i| transport.request(i)["CallID"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["10000", "10001", "10002"]);
    assert_eq!(client.generic_counter().peek(), 10_003);
}

#[tokio::test]
async fn test_member_call_uses_public_key_and_session_identity() {
    let transport = ScriptedTransport::new();
    transport.push_result(
        "Member.Profile.GetMini",
        "<ID>F8C2BEFD</ID><WebsiteID>16273406</WebsiteID><FirstName>Nate</FirstName>\
         <LastName>Flood</LastName><EmailAddr>nflood@echonet.org</EmailAddr>",
    );
    transport.push_result(
        "Member.Profile.Get",
        "<FirstName>Nate</FirstName><MiddleName/>\
         <CustomFieldResponses><CustomFieldResponse FieldCode=\"region\">\
         <Values><Value>North America</Value></Values></CustomFieldResponse></CustomFieldResponses>",
    );
    let client = Arc::new(client_with(&transport));

    let member = Member::create_from_session(client.clone(), Session::from_id("S-9"))
        .await
        .unwrap();
    assert_eq!(member.id(), "F8C2BEFD");
    assert_eq!(member.full_name(), "Nate Flood");

    let profile = member.profile_get().await.unwrap();
    assert_eq!(
        profile.custom_field("region"),
        Some(&ym_lib_rust::CustomValue::from("North America"))
    );
    assert!(!profile.to_flat().contains_key("MiddleName"));

    let first = transport.request(0);
    let keys: Vec<&String> = first.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["Version", "ApiKey", "SessionID", "CallID", "Call"]);
    assert_eq!(first["ApiKey"], "PUB-KEY");
    assert_eq!(first["SessionID"], "S-9");
    assert_eq!(first["CallID"], "1");
    assert_eq!(transport.request(1)["CallID"], "2");
    assert_eq!(transport.request(1)["Call"]["Method"], "Member.Profile.Get");
    // Session calls leave the generic counter alone.
    assert_eq!(client.generic_counter().peek(), 10_000);
}

#[tokio::test]
async fn test_bare_session_id_identity() {
    let transport = ScriptedTransport::new();
    transport.push_result("Session.Ping", "1");
    let client = client_with(&transport);
    let counter = ym_lib_rust::CallCounter::starting_at(5);

    client
        .call(
            "Session.Ping",
            Identity::SessionId {
                session_id: "RAW-ID",
                counter: &counter,
            },
            &Params::new(),
        )
        .await
        .unwrap();
    let doc = transport.request(0);
    assert_eq!(doc["SessionID"], "RAW-ID");
    assert_eq!(doc["CallID"], "5");
    assert_eq!(counter.peek(), 6);
}

#[test]
fn test_document_header_and_escaping() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);
    let session = Session::from_id("S-1");
    let xml = client
        .build_request(
            "Member.Messages.Message.Send",
            Identity::Session(&session),
            &Params::new()
                .with("Subject", "Fish & <Chips>")
                .with("Body", "\"quoted\""),
        )
        .unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("Fish &amp; &lt;Chips&gt;"));
    assert!(xml.contains("<Call Method=\"Member.Messages.Message.Send\">"));
    // Building consumed a call id but nothing was sent.
    assert_eq!(session.next_call_id(), 2);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_member_without_id_is_missing_path() {
    let transport = ScriptedTransport::new();
    transport.push_result("Member.Profile.GetMini", "<FirstName>Nate</FirstName>");
    transport.push_result("Session.Ping", "1");
    let client = Arc::new(client_with(&transport));

    let err = Member::create_from_session(client.clone(), Session::from_id("S-1"))
        .await
        .unwrap_err();
    match &err.error {
        Error::MissingPath { path } => assert_eq!(path, "Member.Profile.GetMini/ID"),
        other => panic!("unexpected error: {other}"),
    }

    // The session comes back with its counter intact.
    let session = err.session;
    assert!(session.ping(&client).await.unwrap());
    assert_eq!(transport.request(1)["CallID"], "2");
}
