// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use common::{MockTransport, Recorder, Reply, init_logger};
use http::Method;
use s3_courier::s3::error::Error;
use s3_courier::s3::multimap_ext::MultimapExt;
use s3_courier::s3::signer::{canonical_request_description, generate_signature};
use s3_courier::s3::transport::RequestBody;
use s3_courier::s3::{Config, Item, Protocol, SslOptions};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const URL: &str = "https://bucket.s3.amazonaws.com:443/the-key";

fn signed_config() -> Config {
    Config::default().credentials("abc", "123")
}

fn item(config: Config, transport: &Arc<MockTransport>) -> Item {
    Item::new("bucket", "the-key", config)
        .unwrap()
        .with_transport(transport.clone())
}

#[test]
fn item_urls() {
    let item = Item::new("bucket", "the-key", Config::default()).unwrap();
    assert_eq!(item.url().to_string(), URL);
    assert_eq!(item.server(), "bucket.s3.amazonaws.com");
    assert_eq!(item.path(true), "/bucket/the-key");
    assert_eq!(item.path(false), "/the-key");

    let long = "a".repeat(64);
    let item = Item::new(&long, "the-key", Config::default().server("127.0.0.1")).unwrap();
    assert_eq!(
        item.url().to_string(),
        format!("https://127.0.0.1:443/{long}/the-key")
    );

    let config = Config::default().protocol(Protocol::Http).server("localhost:9000");
    let item = Item::new("my_bucket", "a b", config).unwrap();
    assert_eq!(item.url().to_string(), "http://localhost:9000/my_bucket/a+b");
}

#[test]
fn item_construction_errors() {
    assert!(matches!(
        Item::new("", "the-key", Config::default()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Item::new("bucket", "", Config::default()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Item::new("bucket", "the-key", Config::default().prefix("photos/")),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        Item::new("bucket", "the-key", Config::default().server("")),
        Err(Error::InvalidArgument(_))
    ));

    let mut config = Config::default();
    assert!(config.set("protocol", "lulul").is_err());
    assert!(config.set("lala", "lulul").is_err());
    config.aws_access_key_id = Some("abc".to_string());
    assert!(Item::new("bucket", "the-key", config).is_err());
}

#[tokio::test]
async fn get_signs_with_path_including_bucket() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::GET, URL, vec![Reply::status(200).body("content")]);

    let resp = item(signed_config(), &transport).get().send().await.unwrap();
    assert_eq!(resp.bytes().await.unwrap(), "content");

    let call = transport.last_call();
    let date = call.headers.get("date").unwrap();
    assert!(date.ends_with(" GMT"));
    let description = canonical_request_description(&Method::GET, "/bucket/the-key", &call.headers);
    assert_eq!(
        call.headers.get("Authorization").unwrap(),
        &format!("AWS abc:{}", generate_signature("123", &description))
    );
}

#[tokio::test]
async fn keys_are_form_escaped_in_url_and_signature() {
    init_logger();
    let url = "https://bucket.s3.amazonaws.com:443/my+photo%2Fv1.jpg";
    let transport = MockTransport::new();
    transport.script(Method::GET, url, vec![Reply::status(200)]);

    Item::new("bucket", "my photo/v1.jpg", signed_config())
        .unwrap()
        .with_transport(transport.clone())
        .get()
        .send()
        .await
        .unwrap();

    let call = transport.last_call();
    assert_eq!(call.url, url);
    let description = canonical_request_description(&Method::GET, "/bucket/my+photo%2Fv1.jpg", &call.headers);
    assert_eq!(
        call.headers.get("Authorization").unwrap(),
        &format!("AWS abc:{}", generate_signature("123", &description))
    );
}

#[tokio::test]
async fn unsigned_requests_carry_no_authorization() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::HEAD, URL, vec![Reply::status(200)]);

    item(Config::default(), &transport).head().send().await.unwrap();

    let call = transport.last_call();
    assert!(!call.headers.contains_key_ignore_case("authorization"));
    assert!(!call.headers.contains_key_ignore_case("date"));
}

#[tokio::test]
async fn put_adds_acl_header_for_non_private_permissions() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::PUT, URL, vec![Reply::status(200)]);

    item(signed_config().permissions("public-read"), &transport)
        .put()
        .data("content")
        .header("Content-Type", "text/plain")
        .header("x-amz-meta-color", "blue")
        .send()
        .await
        .unwrap();

    let call = transport.last_call();
    assert_eq!(call.headers.get("x-amz-acl").unwrap(), "public-read");
    assert_eq!(call.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(call.headers.get("x-amz-meta-color").unwrap(), "blue");
    assert_eq!(call.body, RequestBody::Data("content".into()));

    let description = canonical_request_description(&Method::PUT, "/bucket/the-key", &call.headers);
    assert!(description.contains("x-amz-acl:public-read\n"));
    assert!(description.contains("\ntext/plain\n"));
    assert_eq!(
        call.headers.get("Authorization").unwrap(),
        &format!("AWS abc:{}", generate_signature("123", &description))
    );
}

#[tokio::test]
async fn put_private_has_no_acl_header() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::PUT, URL, vec![Reply::status(200)]);

    item(signed_config(), &transport)
        .put()
        .data("content")
        .send()
        .await
        .unwrap();
    assert!(!transport.last_call().headers.contains_key("x-amz-acl"));
}

#[tokio::test]
async fn put_permissions_override_caller_acl_of_any_case() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::PUT, URL, vec![Reply::status(200)]);

    item(signed_config().permissions("public-read"), &transport)
        .put()
        .data("content")
        .header("X-Amz-Acl", "private")
        .send()
        .await
        .unwrap();

    let call = transport.last_call();
    let acls: Vec<&Vec<String>> = call
        .headers
        .iter_all()
        .filter(|(name, _)| name.eq_ignore_ascii_case("x-amz-acl"))
        .map(|(_, values)| values)
        .collect();
    assert_eq!(acls, vec![&vec!["public-read".to_string()]]);
}

#[tokio::test]
async fn put_rejects_header_case_variants() {
    init_logger();
    let transport = MockTransport::new();

    let result = item(signed_config(), &transport)
        .put()
        .data("content")
        .header("Content-Type", "text/plain")
        .header("content-type", "image/png")
        .execute();
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn put_signs_every_value_of_a_repeated_header() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::PUT, URL, vec![Reply::status(200)]);

    item(signed_config(), &transport)
        .put()
        .data("content")
        .header("x-amz-meta-tag", "a")
        .header("x-amz-meta-tag", "b")
        .send()
        .await
        .unwrap();

    let call = transport.last_call();
    assert_eq!(
        call.headers.get_vec("x-amz-meta-tag").unwrap(),
        &vec!["a".to_string(), "b".to_string()]
    );
    let description = canonical_request_description(&Method::PUT, "/bucket/the-key", &call.headers);
    assert!(description.contains("\nx-amz-meta-tag:a,b\n"));
    assert_eq!(
        call.headers.get("Authorization").unwrap(),
        &format!("AWS abc:{}", generate_signature("123", &description))
    );
}

#[tokio::test]
async fn put_rejects_headers_outside_whitelist() {
    init_logger();
    let transport = MockTransport::new();

    let result = item(signed_config(), &transport)
        .put()
        .data("content")
        .header("X-Custom", "nope")
        .execute();
    assert!(matches!(result, Err(Error::InvalidArgument(m)) if m.contains("X-Custom")));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn put_needs_exactly_one_body() {
    init_logger();
    let transport = MockTransport::new();
    let item = item(signed_config(), &transport);

    assert!(matches!(
        item.put().execute(),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        item.put().data("content").file("/tmp/content").execute(),
        Err(Error::InvalidArgument(_))
    ));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn put_streams_file_reference() {
    init_logger();
    let path = std::env::temp_dir().join("s3-courier-put-file.txt");
    std::fs::write(&path, b"file content").unwrap();
    let transport = MockTransport::new();
    transport.script(Method::PUT, URL, vec![Reply::status(200)]);

    item(signed_config(), &transport)
        .put()
        .file(&path)
        .send()
        .await
        .unwrap();

    assert_eq!(transport.last_call().body, RequestBody::File(path.clone()));
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn per_call_overrides_reach_the_transport() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::DELETE, URL, vec![Reply::status(503)]);
    let ssl = SslOptions {
        verify_peer: true,
        cert_chain_file: None,
    };

    let result = item(signed_config().timeout(Duration::from_secs(30)), &transport)
        .delete()
        .retry_count(2)
        .timeout(Duration::from_secs(5))
        .ssl(ssl.clone())
        .send()
        .await;

    assert!(matches!(result, Err(Error::RequestFailed { .. })));
    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.timeout == Duration::from_secs(5) && c.ssl == ssl));
}

#[tokio::test]
async fn config_defaults_reach_the_transport() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::GET, URL, vec![Reply::status(200)]);

    item(Config::default().retry_count(1), &transport)
        .get()
        .send()
        .await
        .unwrap();

    let call = transport.last_call();
    assert_eq!(call.timeout, Duration::from_secs(10));
    assert!(!call.ssl.verify_peer);
}

#[tokio::test]
async fn callbacks_fire_from_spawned_execution() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::GET, URL, vec![Reply::status(500), Reply::status(200)]);
    let retries = Arc::new(AtomicU32::new(0));
    let successes = Arc::new(AtomicU32::new(0));
    let (r, s) = (retries.clone(), successes.clone());

    item(Config::default(), &transport)
        .get()
        .on_retry(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        })
        .on_success(move |resp| {
            assert_eq!(resp.status(), 200);
            s.fetch_add(1, Ordering::SeqCst);
        })
        .execute()
        .unwrap()
        .await
        .unwrap();

    assert_eq!(retries.load(Ordering::SeqCst), 1);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_receives_terminal_failure() {
    init_logger();
    let transport = MockTransport::new();
    transport.script(Method::GET, URL, vec![Reply::status(404)]);
    let recorder = Recorder::new();

    item(Config::default(), &transport)
        .get()
        .retry_count(1)
        .handler(recorder.clone())
        .execute()
        .unwrap()
        .await
        .unwrap();

    let recorded = recorder.get();
    assert_eq!(recorded.retries.len(), 1);
    assert_eq!(recorded.failures.len(), 1);
    assert_eq!(recorded.failures[0].status(), Some(404));
    assert_eq!(recorded.failures[0].url, URL);
}
