//! Member, community and administrative calls

use crate::scripted::{client_with, ScriptedTransport};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use ym_lib_rust::{
    auth_authenticate, Authentication, Error, Member, OrderStatus, Params, Profile, Session,
    SessionBindError, YmClient,
};

async fn member(transport: &Arc<ScriptedTransport>) -> (Arc<YmClient>, Member) {
    transport.push_result(
        "Member.Profile.GetMini",
        "<ID>M-1</ID><WebsiteID>77</WebsiteID><FirstName>Nate</FirstName>\
         <LastName>Flood</LastName><EmailAddr>nate@example.org</EmailAddr>",
    );
    let client = Arc::new(client_with(transport));
    let member = Member::create_from_session(client.clone(), Session::from_id("S-1"))
        .await
        .unwrap();
    (client, member)
}

#[tokio::test]
async fn test_inbox_is_read_from_divergent_tag() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_envelope(
        "<ErrCode>0</ErrCode><Members.Messages.Get.Inbox>\
         <Message><ID>1</ID><Subject>Hello</Subject></Message>\
         </Members.Messages.Get.Inbox>",
    );
    transport.push_envelope(
        "<ErrCode>0</ErrCode><Members.Messages.Get.Sent>\
         <Message><ID>2</ID></Message><Message><ID>3</ID></Message>\
         </Members.Messages.Get.Sent>",
    );

    let inbox = member.messages_get_inbox(&Params::new()).await.unwrap();
    assert_eq!(inbox, vec![json!({"ID": "1", "Subject": "Hello"})]);
    let sent = member.messages_get_sent(&Params::new()).await.unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(transport.request(1)["Call"]["Method"], "Member.Messages.GetInbox");
}

#[tokio::test]
async fn test_message_read() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_envelope(
        "<ErrCode>0</ErrCode><Members.Messages.Message.Read>\
         <Message><ID>9</ID><Body>Hi</Body></Message></Members.Messages.Message.Read>",
    );
    let message = member.messages_message_read("9").await.unwrap();
    assert_eq!(message, Some(json!({"ID": "9", "Body": "Hi"})));
    assert_eq!(transport.request(1)["Call"]["MessageID"], "9");
}

#[tokio::test]
async fn test_order_ids_with_status_filter() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_result(
        "Member.Commerce.Store.GetOrderIDs",
        "<Orders><Order><InvoiceID>1001</InvoiceID></Order>\
         <Order><InvoiceID>1002</InvoiceID></Order></Orders>",
    );

    let ids = member
        .commerce_store_get_order_ids(Some(OrderStatus::Cancelled), Params::new())
        .await
        .unwrap();
    assert_eq!(ids, vec!["1001", "1002"]);
    assert_eq!(transport.request(1)["Call"]["Status"], "-1");
}

#[tokio::test]
async fn test_certifications_single_and_empty() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_result(
        "Member.Certifications.Get",
        "<Certification><ID>C1</ID><Name>CPR</Name></Certification>",
    );
    transport.push_result("Member.Certifications.Journal.Get", "");

    let certs = member.certifications_get(&Params::new()).await.unwrap();
    assert_eq!(certs, vec![json!({"ID": "C1", "Name": "CPR"})]);
    let journal = member
        .certifications_journal_get(&Params::new())
        .await
        .unwrap();
    assert!(journal.is_empty());
}

#[tokio::test]
async fn test_wall_post_and_connection_approve() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_result("Member.Wall.Post", "");
    transport.push_result("Member.Wall.Post", "");
    transport.push_result("Member.Connection.Approve", "");

    member.wall_post("Hello wall", None).await.unwrap();
    member.wall_post("Hello friend", Some("M-2")).await.unwrap();
    member.connection_approve("M-3", true).await.unwrap();

    assert_eq!(transport.request(1)["Call"], json!({"Method": "Member.Wall.Post", "PostText": "Hello wall"}));
    let keys: Vec<String> = transport.request(2)["Call"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["Method", "ID", "PostText"]);
    assert_eq!(transport.request(3)["Call"]["Approve"], "1");
}

#[tokio::test]
async fn test_media_upload_only_builds_document() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;

    let doc = member
        .media_gallery_upload(&Params::new().with("AlbumID", "A-1"))
        .unwrap();
    assert!(doc.contains("Member.MediaGallery.Upload"));
    assert!(doc.contains("<CallID>2</CallID>"));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(member.session().next_call_id(), 3);
}

#[tokio::test]
async fn test_password_update_appends_new_password() {
    let transport = ScriptedTransport::new();
    let (_, member) = member(&transport).await;
    transport.push_result("Member.Password.Update", "");

    member
        .password_update("n3w", Params::new().with("CurrentPassword", "old"))
        .await
        .unwrap();
    assert_eq!(
        transport.request(1)["Call"],
        json!({"Method": "Member.Password.Update", "CurrentPassword": "old", "NewPassword": "n3w"})
    );
}

#[tokio::test]
async fn test_community_searches() {
    let transport = ScriptedTransport::new();
    transport.push_result("People.All.Search", "<Results><ResultTotal>0</ResultTotal></Results>");
    transport.push_result(
        "Events.Event.Attendees.Get",
        "<Attendees><Attendee><ID>P-1</ID></Attendee></Attendees>",
    );
    transport.push_result(
        "Events.Event.Get",
        "<EventID>E-1</EventID><Name>Annual meeting</Name>",
    );
    let client = client_with(&transport);
    let session = Session::from_id("S-5");
    let community = client.community(&session);

    assert!(community
        .people_all_search(&Params::new().with("SearchText", "flood"))
        .await
        .unwrap()
        .is_empty());
    let attendees = community.events_event_attendees_get("E-1").await.unwrap();
    assert_eq!(attendees, vec![json!({"ID": "P-1"})]);
    let event = community.events_event_get("E-1").await.unwrap();
    assert_eq!(event["Name"], "Annual meeting");

    assert_eq!(transport.request(1)["Call"]["EventID"], "E-1");
    assert_eq!(transport.request(2)["CallID"], "3");
}

#[tokio::test]
async fn test_convert_to_eastern_time_formats_temporal() {
    let transport = ScriptedTransport::new();
    transport.push_result(
        "Convert.ToEasternTime",
        "<EasternTime>2014-06-12 09:53:30</EasternTime>",
    );
    let client = client_with(&transport);
    let session = Session::from_id("S-5");
    let local = NaiveDate::from_ymd_opt(2014, 6, 12)
        .and_then(|d| d.and_hms_opt(14, 53, 30))
        .unwrap();

    let converted = client
        .community(&session)
        .convert_to_eastern_time(local, 1)
        .await
        .unwrap();
    assert_eq!(converted, Some(json!({"EasternTime": "2014-06-12 09:53:30"})));
    let call = &transport.request(0)["Call"];
    assert_eq!(call["LocalTime"], "2014-06-12 14:53:30");
    assert_eq!(call["LocalGmtBias"], "1");
}

#[tokio::test]
async fn test_admin_profile_update_inlines_profile() {
    let transport = ScriptedTransport::new();
    transport.push_result("Sa.People.Profile.Update", "");
    let client = client_with(&transport);

    let mut profile = Profile::new();
    profile.set("FirstName", "Nathan").unwrap();
    profile.set_custom("region", "NA");
    client
        .admin()
        .people_profile_update("P-1", profile)
        .await
        .unwrap();

    let doc = transport.request(0);
    assert_eq!(doc["SaPasscode"], "SA-PASS");
    assert_eq!(
        doc["Call"],
        json!({
            "Method": "Sa.People.Profile.Update",
            "ID": "P-1",
            "FirstName": "Nathan",
            "CustomFieldResponses": {
                "CustomFieldResponse": {"FieldCode": "region", "Values": {"Value": "NA"}}
            }
        })
    );
}

#[tokio::test]
async fn test_admin_lookups() {
    let transport = ScriptedTransport::new();
    transport.push_result("Sa.People.Profile.FindID", "<ID>P-7</ID>");
    transport.push_result(
        "Sa.Members.Commerce.Store.GetOrderIDs",
        "<Orders><Order><InvoiceID>2001</InvoiceID></Order></Orders>",
    );
    transport.push_result(
        "Sa.Member.Certifications.Get",
        "<Certification><ID>C1</ID></Certification><Certification><ID>C2</ID></Certification>",
    );
    transport.push_error("406", "No unique record found.");
    let client = client_with(&transport);
    let admin = client.admin();

    let found = admin
        .people_profile_find_id(&Params::new().with("Email", "nate@example.org"))
        .await
        .unwrap();
    assert_eq!(found.as_deref(), Some("P-7"));

    let orders = admin
        .members_commerce_store_get_order_ids("M-1", Some(OrderStatus::Shipped), Params::new())
        .await
        .unwrap();
    assert_eq!(orders, vec!["2001"]);
    assert_eq!(transport.request(1)["Call"]["ID"], "M-1");
    assert_eq!(transport.request(1)["Call"]["Status"], "2");

    let certs = admin
        .member_certifications_get("M-1", Params::new())
        .await
        .unwrap();
    assert_eq!(certs.len(), 2);

    let err = admin
        .people_profile_find_id(&Params::new().with("Email", "dup@example.org"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_admin_authenticate_binds_member() {
    let transport = ScriptedTransport::new();
    transport.push_result("Sa.Auth.Authenticate", "<ID>M-1</ID>");
    transport.push_result("Member.IsAuthenticated", "<ID>M-1</ID>");
    transport.push_result(
        "Member.Profile.GetMini",
        "<ID>M-1</ID><FirstName>Nate</FirstName><LastName>Flood</LastName>",
    );
    let client = Arc::new(client_with(&transport));

    let member = auth_authenticate(
        client.clone(),
        Session::from_id("S-2"),
        "nflood",
        None,
        Some("1E10A122BDB35AN022FEJF617BE14527E72KA26E"),
    )
    .await
    .unwrap()
    .into_member()
    .unwrap();
    assert_eq!(member.id(), "M-1");
    assert_eq!(member.session().user_id(), Some("M-1"));

    let auth = transport.request(0);
    assert_eq!(auth["ApiKey"], "PRIV-KEY");
    assert_eq!(auth["SessionID"], "S-2");
    assert!(auth["Call"].get("Password").is_none());
    assert_eq!(
        auth["Call"]["PasswordHash"],
        "1E10A122BDB35AN022FEJF617BE14527E72KA26E"
    );
    assert_eq!(transport.request(2)["ApiKey"], "PUB-KEY");
}

#[tokio::test]
async fn test_admin_authenticate_without_payload_returns_session() {
    let transport = ScriptedTransport::new();
    transport.push_envelope("<ErrCode>0</ErrCode>");
    transport.push_result("Session.Ping", "1");
    let client = Arc::new(client_with(&transport));

    let outcome = auth_authenticate(
        client.clone(),
        Session::from_id("S-3"),
        "nflood",
        Some("pw"),
        None,
    )
    .await
    .unwrap();
    assert!(!outcome.is_bound());
    let Authentication::Unbound(session) = outcome else {
        panic!("expected an unbound session");
    };
    assert_eq!(session.session_id(), "S-3");
    assert_eq!(session.next_call_id(), 2);

    assert!(session.ping(&client).await.unwrap());
    let ping = transport.request(1);
    assert_eq!(ping["SessionID"], "S-3");
    assert_eq!(ping["CallID"], "2");
}

#[tokio::test]
async fn test_admin_authenticate_error_returns_session() {
    let transport = ScriptedTransport::new();
    transport.push_error("403", "Method requires authentication.");
    let client = Arc::new(client_with(&transport));

    let err = auth_authenticate(client, Session::from_id("S-4"), "nflood", Some("pw"), None)
        .await
        .unwrap_err();
    assert!(err.error.is_authorization());
    let (error, session) = err.into_parts();
    assert_eq!(error.code(), Some("403"));
    assert_eq!(session.session_id(), "S-4");
    assert_eq!(session.next_call_id(), 2);
    assert!(matches!(
        Error::from(SessionBindError::new(error, session)),
        Error::Api { .. }
    ));
}
