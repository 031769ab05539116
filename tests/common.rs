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

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use s3_courier::s3::config::SslOptions;
use s3_courier::s3::error::TransportError;
use s3_courier::s3::handler::{CompletionHandler, Failure, RetryEvent};
use s3_courier::s3::multimap_ext::Multimap;
use s3_courier::s3::response::Response;
use s3_courier::s3::transport::{Call, RequestBody, Transport};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scripted answer of the [`MockTransport`].
#[derive(Clone, Debug)]
pub enum Reply {
    Status {
        status: u16,
        headers: Vec<(&'static str, String)>,
        body: Bytes,
    },
    Error(TransportError),
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Reply::Status {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Reply::status(status).header("location", location)
    }

    pub fn xml(body: &'static str) -> Self {
        Reply::Status {
            status: 200,
            headers: vec![("content-type", "application/xml".to_string())],
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Reply::Status { headers, .. } = &mut self {
            headers.push((name, value.to_string()));
        }
        self
    }

    pub fn body(mut self, data: &'static str) -> Self {
        if let Reply::Status { body, .. } = &mut self {
            *body = Bytes::from_static(data.as_bytes());
        }
        self
    }

    fn into_response(self) -> Result<Response, TransportError> {
        match self {
            Reply::Status {
                status,
                headers,
                body,
            } => {
                let mut map = HeaderMap::new();
                for (name, value) in headers {
                    map.append(
                        HeaderName::from_static(name),
                        HeaderValue::from_str(&value).unwrap(),
                    );
                }
                Ok(Response::new(status, map, body))
            }
            Reply::Error(err) => Err(err),
        }
    }
}

/// One call seen by the [`MockTransport`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub headers: Multimap,
    pub timeout: Duration,
    pub ssl: SslOptions,
    pub body: RequestBody,
}

/// In-memory transport answering from per `(method, url)` scripts. The last
/// reply of a script repeats forever.
#[derive(Debug, Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, method: Method, url: &str, replies: Vec<Reply>) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .insert((method, url.to_string()), replies.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &Method, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.method == method && c.url == url)
            .count()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn dispatch(&self, call: Call<'_>) -> Result<Response, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: call.method.clone(),
            url: call.url.to_string(),
            headers: call.headers.clone(),
            timeout: call.timeout,
            ssl: call.ssl.clone(),
            body: call.body.clone(),
        });

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&(call.method.clone(), call.url.to_string())) {
                Some(replies) if replies.len() > 1 => replies.pop_front(),
                Some(replies) => replies.front().cloned(),
                None => None,
            }
        };
        match reply {
            Some(reply) => reply.into_response(),
            None => Err(TransportError::Body(format!(
                "no scripted reply for {} {}",
                call.method, call.url
            ))),
        }
    }
}

/// Everything a [`Recorder`] was told.
#[derive(Debug, Default)]
pub struct Recorded {
    pub successes: Vec<Response>,
    pub failures: Vec<Failure>,
    pub retries: Vec<RetryEvent>,
}

/// Completion handler that keeps every outcome. Failures are handled unless
/// built with [`Recorder::escalating`].
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recorded>>,
    escalate: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn escalating() -> Self {
        Self {
            escalate: true,
            ..Self::default()
        }
    }

    pub fn get(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap()
    }
}

impl CompletionHandler for Recorder {
    fn on_success(&mut self, response: Response) {
        self.get().successes.push(response);
    }

    fn on_error(&mut self, failure: Failure) -> Result<(), Failure> {
        if self.escalate {
            return Err(failure);
        }
        self.get().failures.push(failure);
        Ok(())
    }

    fn on_retry(&mut self, event: &RetryEvent) {
        self.get().retries.push(event.clone());
    }
}
