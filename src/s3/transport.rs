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

//! HTTP transport used by the request engine

use crate::s3::config::SslOptions;
use crate::s3::error::TransportError;
use crate::s3::header_constants::CONTENT_LENGTH;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::{Response, ResponseBody};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures_util::{Stream, TryStreamExt};
use http::Method;
use reqwest::redirect::Policy;
use reqwest::{Body, Certificate, Client};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Payload of a request. File bodies are re-read on every attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Data(Bytes),
    File(PathBuf),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

/// A single HTTP exchange as handed to a [`Transport`].
#[derive(Clone, Copy, Debug)]
pub struct Call<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    pub headers: &'a Multimap,
    pub timeout: Duration,
    pub ssl: &'a SslOptions,
    pub body: &'a RequestBody,
}

/// Performs one HTTP exchange without following redirects.
///
/// An `Ok` response carries whatever status the server sent, including
/// error statuses. `Err` means no status was received.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    async fn dispatch(&self, call: Call<'_>) -> Result<Response, TransportError>;
}

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// [`Transport`] backed by `reqwest`. One client is kept per distinct
/// [`SslOptions`].
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    clients: DashMap<SslOptions, Client>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, ssl: &SslOptions) -> Result<Client, TransportError> {
        if let Some(client) = self.clients.get(ssl) {
            return Ok(client.clone());
        }

        let mut builder = Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!ssl.verify_peer);
        if let Some(path) = &ssl.cert_chain_file {
            let pem = std::fs::read(path)
                .map_err(|e| TransportError::Tls(format!("{}: {e}", path.display())))?;
            let certs = Certificate::from_pem_bundle(&pem)
                .map_err(|e| TransportError::Tls(format!("{}: {e}", path.display())))?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Tls(e.to_string()))?;

        self.clients.insert(ssl.clone(), client.clone());
        Ok(client)
    }

    async fn file_body(path: &Path) -> Result<(Body, u64), TransportError> {
        let body_err = |e: std::io::Error| TransportError::Body(format!("{}: {e}", path.display()));
        let file = tokio::fs::File::open(path).await.map_err(body_err)?;
        let size = file.metadata().await.map_err(body_err)?.len();
        Ok((Body::wrap_stream(read_chunks(file)), size))
    }
}

fn read_chunks(
    mut file: tokio::fs::File,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    async_stream::try_stream! {
        loop {
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            buf.truncate(n);
            yield Bytes::from(buf);
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, call: Call<'_>) -> Result<Response, TransportError> {
        let client = self.client(call.ssl)?;
        let mut req = client
            .request(call.method.clone(), call.url)
            .timeout(call.timeout);
        for (key, values) in call.headers.iter_all() {
            for value in values {
                req = req.header(key, value);
            }
        }

        req = match call.body {
            RequestBody::Empty => req,
            RequestBody::Data(data) => req.body(data.clone()),
            RequestBody::File(path) => {
                let (body, size) = Self::file_body(path).await?;
                if !call.headers.contains_key_ignore_case(CONTENT_LENGTH) {
                    req = req.header(CONTENT_LENGTH, size);
                }
                req.body(body)
            }
        };

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, call.timeout))?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = ResponseBody::from_stream(resp.bytes_stream().map_err(std::io::Error::other));
        Ok(Response::new(status, headers, body))
    }
}
