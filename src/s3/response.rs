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

//! Final response handed to completion handlers

use crate::s3::error::Error;
use crate::s3::listing::ListingEntry;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, TryStreamExt};
use std::fmt;
use std::pin::Pin;

pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Body of a response: either buffered or still streaming from the server.
pub enum ResponseBody {
    Full(Bytes),
    Stream(BodyStream),
}

impl ResponseBody {
    pub fn empty() -> Self {
        ResponseBody::Full(Bytes::new())
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
    {
        ResponseBody::Stream(Box::pin(stream))
    }

    /// Reads the whole body into memory
    pub async fn bytes(self) -> Result<Bytes, Error> {
        match self {
            ResponseBody::Full(b) => Ok(b),
            ResponseBody::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.try_next().await? {
                    buf.extend_from_slice(&chunk);
                }
                Ok(buf.freeze())
            }
        }
    }

    pub fn into_stream(self) -> BodyStream {
        match self {
            ResponseBody::Full(b) if b.is_empty() => Box::pin(futures_util::stream::empty()),
            ResponseBody::Full(b) => Box::pin(futures_util::stream::once(async move { Ok(b) })),
            ResponseBody::Stream(stream) => stream,
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Full(b) => f.debug_tuple("Full").field(&b.len()).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(value: Bytes) -> Self {
        ResponseBody::Full(value)
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        ResponseBody::Full(Bytes::from_static(value.as_bytes()))
    }
}

/// Response of the last attempt of a request.
///
/// `status` is 0 when the server never answered.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: http::HeaderMap,
    body: ResponseBody,
    listing: Option<Vec<ListingEntry>>,
}

impl Response {
    pub fn new(status: u16, headers: http::HeaderMap, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            listing: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Returns the value of header `name` if it is present and valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
    }

    pub fn is_xml(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.starts_with("application/xml"))
    }

    /// Parsed bucket listing, present for successful XML listing responses
    pub fn listing(&self) -> Option<&[ListingEntry]> {
        self.listing.as_deref()
    }

    pub(crate) fn set_listing(&mut self, listing: Vec<ListingEntry>) {
        self.listing = Some(listing);
    }

    /// Buffers a streaming body so it can be read more than once
    pub(crate) async fn buffer(&mut self) -> Result<Bytes, Error> {
        let body = std::mem::replace(&mut self.body, ResponseBody::empty());
        let bytes = body.bytes().await?;
        self.body = ResponseBody::Full(bytes.clone());
        Ok(bytes)
    }

    pub async fn bytes(self) -> Result<Bytes, Error> {
        self.body.bytes().await
    }

    pub async fn text(self) -> Result<String, Error> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn into_stream(self) -> BodyStream {
        self.body.into_stream()
    }
}
