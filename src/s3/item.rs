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

//! Object (item) level operations

use crate::s3::builders::{DeleteItem, GetItem, HeadItem, Operation, PutItem};
use crate::s3::config::Config;
use crate::s3::error::Error;
use crate::s3::http::Url;
use crate::s3::locator::Locator;
use crate::s3::transport::Transport;
use std::sync::Arc;

/// An object stored under `key` in a bucket.
///
/// ```no_run
/// use s3_courier::s3::{Config, Item};
///
/// # async fn example() -> Result<(), s3_courier::s3::error::Error> {
/// let item = Item::new("bucket", "the-key", Config::default().credentials("abc", "123"))?;
/// item.put()
///     .data("content")
///     .header("Content-Type", "text/plain")
///     .on_success(|resp| println!("stored, status {}", resp.status()))
///     .on_error(|failure| eprintln!("{failure}"))
///     .execute()?
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Item {
    locator: Locator,
}

impl Item {
    /// Fails with `InvalidArgument` for an empty bucket or key, or for a
    /// configuration carrying listing-only options.
    pub fn new(bucket: &str, key: &str, config: Config) -> Result<Self, Error> {
        Ok(Self {
            locator: Locator::new(bucket, Some(key), config)?,
        })
    }

    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        Self {
            locator: self.locator.with_transport(transport),
        }
    }

    pub fn bucket(&self) -> &str {
        self.locator.bucket()
    }

    pub fn key(&self) -> &str {
        self.locator.key().unwrap_or_default()
    }

    pub fn config(&self) -> &Config {
        self.locator.config()
    }

    pub fn server(&self) -> String {
        self.locator.host()
    }

    pub fn path(&self, with_bucket: bool) -> String {
        self.locator.path(with_bucket)
    }

    pub fn url(&self) -> Url {
        self.locator.url()
    }

    pub fn head(&self) -> HeadItem {
        Operation::new(self.locator.clone())
    }

    pub fn get(&self) -> GetItem {
        Operation::new(self.locator.clone())
    }

    /// Uploads data or a file; exactly one of them must be set on the
    /// returned builder.
    pub fn put(&self) -> PutItem {
        Operation::new(self.locator.clone())
    }

    pub fn delete(&self) -> DeleteItem {
        Operation::new(self.locator.clone())
    }
}
