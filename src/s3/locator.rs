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

//! Addressing and header building shared by buckets and items

use crate::s3::config::{Config, DEFAULT_PERMISSIONS, Protocol};
use crate::s3::error::Error;
use crate::s3::header_constants::{VALID_HEADERS, X_AMZ_ACL, X_AMZ_PREFIX};
use crate::s3::http::{Url, is_dns_bucket};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::signer::Signer;
use crate::s3::transport::{ReqwestTransport, Transport};
use crate::s3::utils::form_escape;
use http::Method;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Returns true if caller supplied header `name` may be sent.
pub fn is_valid_header(name: &str) -> bool {
    VALID_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
        || name.to_ascii_lowercase().starts_with(X_AMZ_PREFIX)
}

/// Resolved location of a bucket, or of a key inside a bucket.
#[derive(Clone, Debug)]
pub(crate) struct Locator {
    bucket: String,
    key: Option<String>,
    config: Config,
    signer: Option<Signer>,
    transport: Arc<dyn Transport>,
}

impl Locator {
    pub fn new(bucket: &str, key: Option<&str>, config: Config) -> Result<Self, Error> {
        if bucket.trim().is_empty() {
            return Err(Error::invalid("need a bucket name"));
        }
        if key.is_some_and(|k| k.trim().is_empty()) {
            return Err(Error::invalid("need a key"));
        }
        config.validate(key.is_none())?;

        let signer = match (&config.aws_access_key_id, &config.aws_secret_access_key) {
            (Some(access_key), Some(secret_key)) if config.needs_to_sign() => {
                Some(Signer::from_keys(access_key, secret_key)?)
            }
            _ if config.needs_to_sign() => return Err(Error::MissingCredentials),
            _ => None,
        };

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.map(str::to_string),
            config,
            signer,
            transport: Arc::new(ReqwestTransport::new()),
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    pub fn dns_bucket(&self) -> bool {
        is_dns_bucket(&self.bucket)
    }

    /// Virtual-hosted host for DNS compatible buckets, else the server host
    pub fn host(&self) -> String {
        let server = self.config.server_host();
        if self.dns_bucket() {
            format!("{}.{server}", self.bucket)
        } else {
            server.to_string()
        }
    }

    pub fn port(&self) -> u16 {
        self.config.port()
    }

    /// Resource path, e.g. `/bucket/key`. Without the bucket segment the
    /// path is `/key`, or `/` for the bucket itself.
    pub fn path(&self, with_bucket: bool) -> String {
        let resource = self.key.as_deref().map(form_escape).unwrap_or_default();
        if with_bucket {
            format!("/{}/{resource}", self.bucket)
        } else {
            format!("/{resource}")
        }
    }

    /// `prefix` and `delimiter` query of a bucket listing
    pub fn query(&self) -> Option<String> {
        if self.key.is_some() || (self.config.prefix.is_none() && self.config.delimiter.is_none()) {
            return None;
        }
        let pairs = [("prefix", &self.config.prefix), ("delimiter", &self.config.delimiter)];
        let query: Vec<String> = pairs
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| format!("{name}={}", form_escape(v))))
            .collect();
        Some(query.join("&"))
    }

    /// Path used for signing: always carries the bucket segment, plus the
    /// listing query if any.
    pub fn sign_path(&self) -> String {
        let path = self.path(true);
        match self.query() {
            Some(query) => format!("{path}?{query}"),
            None => path,
        }
    }

    pub fn url(&self) -> Url {
        Url {
            https: self.config.protocol == Protocol::Https,
            host: self.host(),
            port: self.port(),
            path: self.path(!self.dns_bucket()),
            query: self.query(),
        }
    }

    /// Builds the headers of a request: validates caller headers (names are
    /// case-insensitive, so case variants of one name are rejected), adds
    /// `x-amz-acl` for non-private permissions when asked to, then signs
    /// if credentials are configured.
    pub fn build_headers(
        &self,
        method: &Method,
        extra: Multimap,
        with_permissions: bool,
    ) -> Result<Multimap, Error> {
        let invalid: Vec<&str> = extra
            .keys()
            .filter(|name| !is_valid_header(name))
            .map(String::as_str)
            .collect();
        if !invalid.is_empty() {
            return Err(Error::invalid(format!(
                "invalid headers {}. All headers must either be one of {} or start with '{X_AMZ_PREFIX}'",
                invalid.join(", "),
                VALID_HEADERS.join(", ")
            )));
        }

        let mut seen = BTreeSet::new();
        let duplicated: BTreeSet<&str> = extra
            .keys()
            .filter(|name| !seen.insert(name.to_ascii_lowercase()))
            .map(String::as_str)
            .collect();
        if !duplicated.is_empty() {
            return Err(Error::invalid(format!(
                "headers given more than once with different case: {}",
                duplicated.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut headers = extra;
        if with_permissions && self.config.permissions != DEFAULT_PERMISSIONS {
            headers.remove_ignore_case(X_AMZ_ACL);
            headers.add(X_AMZ_ACL, self.config.permissions.clone());
        }

        Ok(match &self.signer {
            Some(signer) => signer.sign(method, &self.sign_path(), headers),
            None => headers,
        })
    }
}
