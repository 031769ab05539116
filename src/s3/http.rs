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

//! URL composition and bucket addressing rules

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref DNS_LABEL_REGEX: Regex = Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap();
}

/// Returns true if `bucket` can be addressed as a sub-domain of the server
/// (virtual-hosted style).
///
/// The name must be 3 to 63 characters long and every dot separated label
/// must be lowercase alphanumeric, with inner hyphens only.
pub fn is_dns_bucket(bucket: &str) -> bool {
    (3..=63).contains(&bucket.len()) && bucket.split('.').all(|l| DNS_LABEL_REGEX.is_match(l))
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents HTTP URL. The port is always rendered.
pub struct Url {
    pub https: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Option<String>,
}

impl Url {
    pub fn host_header_value(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path followed by `?query` when a query is present
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) if !q.is_empty() => format!("{}?{q}", self.path),
            _ => self.path.clone(),
        }
    }
}

impl Default for Url {
    fn default() -> Self {
        Self {
            https: true,
            host: String::default(),
            port: 443,
            path: String::from("/"),
            query: None,
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.is_empty() {
            return Err(fmt::Error);
        }

        if self.https {
            f.write_str("https://")?;
        } else {
            f.write_str("http://")?;
        }
        write!(f, "{}:{}", self.host, self.port)?;

        if !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;

        if let Some(query) = &self.query
            && !query.is_empty()
        {
            f.write_str("?")?;
            f.write_str(query)?;
        }

        Ok(())
    }
}
