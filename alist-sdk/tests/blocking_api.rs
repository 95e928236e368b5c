//! Blocking façade tests.
//!
//! The mock server needs a live runtime, so tests that stay on the plain
//! test thread park one on the side purely for wiremock; every SDK call
//! under test is made without any caller-managed runtime. The
//! nested-runtime tests instead run inside `#[tokio::test]` and call the
//! blocking API from async code.

use std::io::Read as _;

use alist_sdk::{blocking, AList, AListError, AListUser, IntoBlocking};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_HASH: &str = "e166b45e39301021e897e3a6713e11171893217ad2901cf28c2c09c8d54e55d9";

fn ok_body(data: serde_json::Value) -> serde_json::Value {
    json!({"code": 200, "message": "success", "data": data})
}

/// Runtime hosting the mock server; the SDK calls under test never see it.
fn server_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("mock server runtime")
}

fn mount_list_root(rt: &tokio::runtime::Runtime, server: &MockServer) {
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/fs/list"))
            .and(body_partial_json(json!({"path": "/"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
                "content": [
                    {"name": "a.txt", "size": 3, "is_dir": false, "modified": "", "sign": "", "thumb": "", "type": 4}
                ],
                "total": 1, "provider": "local"
            }))))
            .mount(server),
    );
}

#[test]
fn test_identity_round_trip() {
    let mut client = AList::with_token("https://alist.example.com", "tok").unwrap();
    client.set_token("roundtrip");
    let endpoint_ptr = client.endpoint().as_ptr();

    let back = client.into_blocking().into_async();
    // Same instance: the owned endpoint buffer did not move or get cloned.
    assert_eq!(back.endpoint().as_ptr(), endpoint_ptr);
    assert_eq!(back.token(), Some("roundtrip"));
}

#[test]
fn test_wrap_via_from_and_new_agree() {
    let client = AList::new("https://alist.example.com").unwrap();
    let wrapped = blocking::Blocking::new(client.clone());
    let converted: blocking::AList = client.into();
    assert_eq!(wrapped.endpoint(), converted.endpoint());
}

#[test]
fn test_plain_accessor_passthrough() {
    let client = AList::with_token("https://alist.example.com", "tok").unwrap();
    let endpoint = client.endpoint().to_string();
    let wrapped = client.into_blocking();
    assert_eq!(wrapped.endpoint(), endpoint);
    assert_eq!(wrapped.token(), Some("tok"));
    assert!(wrapped.has_token());
    assert_eq!(wrapped.get_ref().endpoint(), endpoint);
}

#[test]
fn test_blocking_list_dir_scenario() {
    // No manual runtime anywhere near the SDK calls.
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    mount_list_root(&rt, &server);

    let client = blocking::AList::connect(server.uri()).unwrap();
    let entries = client.list_dir("/").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/a.txt");
    assert!(!entries[0].is_dir);
}

#[test]
fn test_blocking_login_matches_async() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/auth/login/hash"))
            .and(body_partial_json(json!({"username": "admin", "password": ADMIN_HASH})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(ok_body(json!({"token": "blocked"}))),
            )
            .mount(&server),
    );

    let mut client = blocking::AList::connect(server.uri()).unwrap();
    client.login(&AListUser::new("admin", "123456")).unwrap();
    assert_eq!(client.token(), Some("blocked"));
}

#[test]
fn test_blocking_error_propagates_unchanged() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/fs/mkdir"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 403, "message": "permission denied", "data": null
            })))
            .mount(&server),
    );

    let client = blocking::AList::connect(server.uri()).unwrap();
    let err = client.mkdir("/nope").unwrap_err();
    assert!(
        matches!(err, AListError::Api { code: 403, ref message } if message == "permission denied")
    );
}

#[test]
fn test_open_rewraps_file_and_passes_folder_through() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/fs/get"))
            .and(body_partial_json(json!({"path": "/a.txt"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
                "name": "a.txt", "size": 5, "is_dir": false,
                "raw_url": format!("{}/d/a.txt", server.uri())
            }))))
            .mount(&server),
    );
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/fs/get"))
            .and(body_partial_json(json!({"path": "/docs"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
                "name": "docs", "size": 0, "is_dir": true, "provider": "Local"
            }))))
            .mount(&server),
    );

    let client = blocking::AList::connect(server.uri()).unwrap();

    // File: comes back already wrapped in the blocking façade.
    let entry = client.open("/a.txt", None).unwrap();
    let file: blocking::AListFile = entry.into_file().unwrap();
    assert_eq!(file.path(), "/a.txt");
    assert!(!file.is_open());

    // Folder: plain value, no wrapping.
    let entry = client.open("/docs", None).unwrap();
    match entry {
        blocking::Entry::Folder(folder) => assert_eq!(folder.path, "/docs"),
        blocking::Entry::File(_) => panic!("folder must pass through unwrapped"),
    }
}

#[test]
fn test_blocking_file_reads_and_std_io() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/api/fs/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
                "name": "a.txt", "size": 11, "is_dir": false,
                "raw_url": format!("{}/d/a.txt", server.uri())
            }))))
            .mount(&server),
    );
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/d/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello alist".to_vec()))
            .mount(&server),
    );

    let client = blocking::AList::connect(server.uri()).unwrap();
    let mut file = client.open("/a.txt", None).unwrap().into_file().unwrap();
    file.open().unwrap();
    assert_eq!(file.read(5).unwrap(), b"hello");

    // save bridges a future owning the path argument.
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("saved.txt");
    file.save(local.clone()).unwrap();
    assert_eq!(std::fs::read(&local).unwrap(), b"hello alist");

    file.seek(std::io::SeekFrom::Start(0)).unwrap();

    // The std::io::Read impl bridges per read call.
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    assert_eq!(text, "hello alist");

    file.close().unwrap();
    file.close().unwrap(); // idempotent
    assert!(matches!(file.read(1), Err(AListError::FileClosed)));
}

#[test]
fn test_blocking_upload() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("PUT"))
            .and(path("/api/fs/put"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!(null))))
            .mount(&server),
    );

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("upload.txt");
    std::fs::write(&local, b"content").unwrap();

    let client = blocking::AList::connect(server.uri()).unwrap();
    // The path argument moves into the bridged future.
    client.upload(local, "/docs/upload.txt").unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_calls_inside_running_runtime() {
    // Composing the blocking façade under an async caller must not
    // deadlock: the bridge takes its worker-thread path here.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fs/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "content": [
                {"name": "a.txt", "size": 3, "is_dir": false, "modified": "", "sign": "", "thumb": "", "type": 4}
            ],
            "total": 1, "provider": "local"
        }))))
        .mount(&server)
        .await;

    let client = blocking::AList::connect(server.uri()).unwrap();
    let entries = client.list_dir("/").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/a.txt");
}

#[tokio::test(flavor = "current_thread")]
async fn test_blocking_call_inside_current_thread_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let client = blocking::AList::connect(server.uri()).unwrap();
    assert!(client.ping().unwrap());
}

#[test]
fn test_blocking_admin_list_users() {
    let rt = server_runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/admin/user/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
                "content": [{"id": 1, "username": "admin", "role": 2}],
                "total": 1
            }))))
            .mount(&server),
    );

    let admin = blocking::AListAdmin::connect_with_token(server.uri(), "tok").unwrap();
    let users = admin.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "admin");
    assert_eq!(admin.base().token(), Some("tok"));
}
