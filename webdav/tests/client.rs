// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use davlite::{Credentials, StatusPolicy, WebDavClient, WebDavConfig, WebDavError};
use jiff::Timestamp;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_root(server: &MockServer, root: &str) {
    Mock::given(method("HEAD"))
        .and(path(root))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer, root: &str) -> WebDavClient {
    mount_root(server, root).await;
    WebDavClient::connect(&format!("{}{root}", server.uri()), "alice", "secret")
        .await
        .expect("Failed to connect")
}

fn multistatus(hrefs: &[&str]) -> String {
    let responses: String = hrefs
        .iter()
        .map(|href| format!("  <d:response><d:href>{href}</d:href></d:response>\n"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<d:multistatus xmlns:d=\"DAV:\">\n{responses}</d:multistatus>"
    )
}

#[tokio::test]
async fn client_connect_sends_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/dav"))
        .and(header("Authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebDavClient::connect(&format!("{}/dav", server.uri()), "alice", "secret")
        .await
        .expect("Failed to connect");

    assert_eq!(client.root_url(), format!("{}/dav", server.uri()));
    assert_eq!(client.last_response().unwrap().status, Some(200));
}

#[tokio::test]
async fn client_connect_rejects_non_200_root() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/dav"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = WebDavClient::connect(&format!("{}/dav", server.uri()), "alice", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WebDavError::Initialization {
            status: Some(401),
            ..
        }
    ));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn client_connect_rejects_other_success_codes() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = WebDavClient::connect(&format!("{}/dav", server.uri()), "alice", "secret")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WebDavError::Initialization {
            status: Some(204),
            ..
        }
    ));
}

#[tokio::test]
async fn client_connect_invalid_url() {
    let err = WebDavClient::connect("not a url", "alice", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, WebDavError::Config(_)));
}

#[tokio::test]
async fn client_connect_unreachable_is_transport_error() {
    let err = WebDavClient::connect("http://127.0.0.1:1/dav", "alice", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, WebDavError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn client_list_root() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/root/").await;

    Mock::given(method("PROPFIND"))
        .and(path("/root/"))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_raw(multistatus(&["/root/", "/root/a.txt", "/root/sub/"]), "application/xml"),
        )
        .mount(&server)
        .await;

    let entries = client.list("").await.expect("Failed to list");
    assert_eq!(entries, vec!["a.txt".to_string(), "sub/".to_string()]);

    // PROPFIND is sent without a body or Depth header
    let requests = server.received_requests().await.unwrap();
    let propfind = requests.last().unwrap();
    assert!(propfind.body.is_empty());
    assert!(propfind.headers.get("depth").is_none());
}

#[tokio::test]
async fn client_list_bare_host_root_strips_leading_slash() {
    let server = MockServer::start().await;
    mount_root(&server, "/").await;
    let mut client = WebDavClient::connect(&server.uri(), "alice", "secret")
        .await
        .expect("Failed to connect");

    Mock::given(method("PROPFIND"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_raw(multistatus(&["/", "/a.txt", "/sub/"]), "application/xml"),
        )
        .mount(&server)
        .await;

    let entries = client.list("").await.expect("Failed to list");
    assert_eq!(entries, vec!["a.txt".to_string(), "sub/".to_string()]);
}

#[tokio::test]
async fn client_list_only_self_is_empty() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/root/").await;

    Mock::given(method("PROPFIND"))
        .and(path("/root/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(multistatus(&["/root/"]), "application/xml"))
        .mount(&server)
        .await;

    let entries = client.list("").await.expect("Failed to list");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn client_list_subfolder_keeps_foreign_hrefs() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/root").await;

    Mock::given(method("PROPFIND"))
        .and(path("/root/docs/"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            multistatus(&[
                "/root/docs/",
                "/root/docs/report.pdf",
                "/elsewhere/x",
                "/root/docs/",
                "/root/docs/report.pdf",
            ]),
            "application/xml",
        ))
        .mount(&server)
        .await;

    let entries = client.list("/docs/").await.expect("Failed to list");
    assert_eq!(
        entries,
        vec![
            "report.pdf".to_string(),
            "/elsewhere/x".to_string(),
            "report.pdf".to_string(),
        ]
    );
}

#[tokio::test]
async fn client_list_malformed_xml() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/root/").await;

    Mock::given(method("PROPFIND"))
        .and(path("/root/"))
        .respond_with(
            ResponseTemplate::new(207)
                .set_body_raw("<d:multistatus><d:href>/root/</d:multistatus>", "application/xml"),
        )
        .mount(&server)
        .await;

    let err = client.list("").await.unwrap_err();
    assert!(matches!(err, WebDavError::Xml(_)));
}

#[tokio::test]
async fn client_get_returns_body_regardless_of_status() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    Mock::given(method("GET"))
        .and(path("/dav/missing.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let body = client.get("missing.txt").await.expect("Failed to get");
    assert_eq!(body, b"not here");
    assert_eq!(client.last_response().unwrap().status, Some(404));
}

#[tokio::test]
async fn client_require_success_policy() {
    let server = MockServer::start().await;
    mount_root(&server, "/dav").await;

    Mock::given(method("DELETE"))
        .and(path("/dav/locked.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = WebDavConfig {
        status_policy: StatusPolicy::RequireSuccess,
        ..WebDavConfig::new(
            format!("{}/dav", server.uri()),
            Credentials::new("alice", "secret"),
        )
    };
    let mut client = WebDavClient::with_config(config)
        .await
        .expect("Failed to connect");

    let err = client.delete("locked.txt").await.unwrap_err();
    assert!(matches!(
        err,
        WebDavError::Status {
            status: Some(403),
            ..
        }
    ));
}

#[tokio::test]
async fn client_create_then_get_round_trip() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    let content: Vec<u8> = (0..=255).collect();

    Mock::given(method("PUT"))
        .and(path("/dav/blob.bin"))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_bytes(content.clone()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dav/blob.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&server)
        .await;

    client
        .create("blob.bin", content.clone())
        .await
        .expect("Failed to create");
    let fetched = client.get("blob.bin").await.expect("Failed to get");
    assert_eq!(fetched, content);

    let requests = server.received_requests().await.unwrap();
    let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    assert_eq!(put.headers.get("content-length").unwrap(), "256");
}

#[tokio::test]
async fn client_upload_local_file() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("notes.txt");
    std::fs::write(&local, "hello webdav").unwrap();

    Mock::given(method("PUT"))
        .and(path("/dav/notes.txt"))
        .and(body_bytes(b"hello webdav".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client
        .upload(&local, "notes.txt")
        .await
        .expect("Failed to upload");
}

#[tokio::test]
async fn client_upload_missing_file_sends_nothing() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    let err = client.upload(&missing, "missing.txt").await.unwrap_err();
    assert!(matches!(err, WebDavError::NotFound(ref p) if *p == missing));

    // Directories are not regular files
    let err = client.upload(dir.path(), "dir").await.unwrap_err();
    assert!(matches!(err, WebDavError::NotFound(_)));

    // Only the root validation reached the server
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn client_delete_and_mkdir() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    Mock::given(method("DELETE"))
        .and(path("/dav/old.txt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("MKCOL"))
        .and(path("/dav/photos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("old.txt").await.expect("Failed to delete");
    client.mkdir("photos").await.expect("Failed to mkdir");
    assert_eq!(client.last_response().unwrap().status, Some(201));
}

#[tokio::test]
async fn client_prop_complete() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    Mock::given(method("PROPFIND"))
        .and(path("/dav/report.pdf"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/dav/report.pdf</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Wed, 14 Jan 2026 08:30:00 GMT</d:getlastmodified>
        <d:getcontentlength>52341</d:getcontentlength>
        <d:getcontenttype>application/pdf</d:getcontenttype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#,
            "application/xml",
        ))
        .mount(&server)
        .await;

    let props = client.prop("report.pdf").await.expect("Failed to prop");
    assert_eq!(props.href, "/dav/report.pdf");
    assert_eq!(props.length, 52341);
    assert_eq!(props.content_type, "application/pdf");
    assert_eq!(
        props.modified,
        "2026-01-14T08:30:00Z".parse::<Timestamp>().unwrap()
    );
}

#[tokio::test]
async fn client_prop_missing_length() {
    let server = MockServer::start().await;
    let mut client = connect(&server, "/dav").await;

    Mock::given(method("PROPFIND"))
        .and(path("/dav/folder"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            r#"<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/dav/folder/</d:href>
    <d:propstat>
      <d:prop>
        <d:getlastmodified>Wed, 14 Jan 2026 08:30:00 GMT</d:getlastmodified>
        <d:getcontenttype>httpd/unix-directory</d:getcontenttype>
      </d:prop>
    </d:propstat>
  </d:response>
</d:multistatus>"#,
            "application/xml",
        ))
        .mount(&server)
        .await;

    let err = client.prop("folder").await.unwrap_err();
    assert!(matches!(err, WebDavError::Decode(_)));
}

#[tokio::test]
async fn client_propagates_session_cookies() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/dav"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "sid=abc; Path=/; HttpOnly")
                .append_header("Set-Cookie", "lang=en"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dav/a.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "sid=def; Expires=Thu, 01 Jan 2099 00:00:00 GMT")
                .set_body_string("a"),
        )
        .mount(&server)
        .await;

    let mut client = WebDavClient::connect(&format!("{}/dav", server.uri()), "alice", "secret")
        .await
        .expect("Failed to connect");
    client.get("a.txt").await.expect("Failed to get");
    client.get("a.txt").await.expect("Failed to get");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].headers.get("cookie").is_none());
    assert_eq!(
        requests[1].headers.get("cookie").unwrap(),
        "sid=abc; lang=en"
    );
    assert_eq!(
        requests[2].headers.get("cookie").unwrap(),
        "sid=def; lang=en"
    );
    assert_eq!(client.cookies().get("sid"), Some("def"));
}
