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

//! Caller-held configuration for buckets, items and requests.
//!
//! A [`Config`] replaces process wide defaults: build one at startup (or use
//! [`Config::default()`]) and hand it to every [`Bucket`](crate::s3::bucket::Bucket)
//! and [`Item`](crate::s3::item::Item). The recognized keys form a closed set;
//! [`Config::set`] and [`Config::from_json`] reject anything else.

use crate::s3::error::Error;
use crate::s3::utils::is_blank;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default socket/operation timeout handed to the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of automatic re-attempts after the initial one.
pub const DEFAULT_RETRY_COUNT: u32 = 4;

pub const DEFAULT_SERVER: &str = "s3.amazonaws.com";

pub const DEFAULT_PERMISSIONS: &str = "private";

/// Every key accepted by [`Config::set`], in documentation order.
pub const RECOGNIZED_KEYS: [&str; 10] = [
    "timeout",
    "server",
    "protocol",
    "aws_access_key_id",
    "aws_secret_access_key",
    "retry_count",
    "permissions",
    "ssl",
    "prefix",
    "delimiter",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(Error::invalid(format!("unknown protocol {s}"))),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS settings handed to the transport for every attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SslOptions {
    /// Verify the server certificate chain.
    pub verify_peer: bool,
    /// Additional PEM bundle to trust.
    pub cert_chain_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_seconds")]
    pub timeout: Duration,
    pub server: String,
    pub protocol: Protocol,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub retry_count: u32,
    pub permissions: String,
    pub ssl: SslOptions,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            server: DEFAULT_SERVER.to_string(),
            protocol: Protocol::default(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            retry_count: DEFAULT_RETRY_COUNT,
            permissions: DEFAULT_PERMISSIONS.to_string(),
            ssl: SslOptions::default(),
            prefix: None,
            delimiter: None,
        }
    }
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid(format!("invalid value {value:?} for {key}")))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Config {
    /// Parses a JSON object whose keys are drawn from [`RECOGNIZED_KEYS`].
    ///
    /// ```
    /// use s3_courier::s3::config::{Config, Protocol};
    ///
    /// let config = Config::from_json(r#"{"server": "127.0.0.1:9000", "protocol": "http"}"#).unwrap();
    /// assert_eq!(config.protocol, Protocol::Http);
    /// assert!(Config::from_json(r#"{"lala": "lulul"}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::invalid(e.to_string()))
    }

    /// Sets one option from its string form. Nested TLS options use
    /// `ssl.verify_peer` and `ssl.cert_chain_file`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&mut Self, Error> {
        match key {
            "timeout" => {
                let secs: f64 = parse_value(key, value)?;
                self.timeout = Duration::try_from_secs_f64(secs)
                    .map_err(|e| Error::invalid(format!("invalid timeout {value:?}: {e}")))?;
            }
            "server" => self.server = value.to_string(),
            "protocol" => self.protocol = value.parse()?,
            "aws_access_key_id" => self.aws_access_key_id = non_empty(value),
            "aws_secret_access_key" => self.aws_secret_access_key = non_empty(value),
            "retry_count" => self.retry_count = parse_value(key, value)?,
            "permissions" => self.permissions = value.to_string(),
            "ssl.verify_peer" => self.ssl.verify_peer = parse_value(key, value)?,
            "ssl.cert_chain_file" => self.ssl.cert_chain_file = non_empty(value).map(PathBuf::from),
            "prefix" => self.prefix = Some(value.to_string()),
            "delimiter" => self.delimiter = Some(value.to_string()),
            _ => return Err(Error::invalid(format!("Unknown key(s): {key}"))),
        }
        Ok(self)
    }

    /// Returns a config with every `(key, value)` pair applied on top of the defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Config::default();
        for (key, value) in pairs {
            config.set(key, value)?;
        }
        Ok(config)
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn credentials(mut self, access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.aws_access_key_id = Some(access_key.into());
        self.aws_secret_access_key = Some(secret_key.into());
        self
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = permissions.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ssl(mut self, ssl: SslOptions) -> Self {
        self.ssl = ssl;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Requests are signed iff an access key id is configured.
    pub fn needs_to_sign(&self) -> bool {
        !is_blank(self.aws_access_key_id.as_deref())
    }

    /// Host part of `server` without any `:port` suffix.
    pub fn server_host(&self) -> &str {
        self.split_server().0
    }

    /// Port from `server` when given, else the protocol default.
    pub fn port(&self) -> u16 {
        self.split_server().1.unwrap_or_else(|| self.protocol.default_port())
    }

    fn split_server(&self) -> (&str, Option<u16>) {
        if let Some((host, port)) = self.server.rsplit_once(':')
            && (!host.contains(':') || (host.starts_with('[') && host.ends_with(']')))
            && let Ok(port) = port.parse::<u16>()
        {
            return (host, Some(port));
        }
        (self.server.as_str(), None)
    }

    /// Checks the invariants shared by every resource locator.
    pub(crate) fn validate(&self, listing: bool) -> Result<(), Error> {
        if self.server_host().trim().is_empty() {
            return Err(Error::invalid("need field server"));
        }
        if let Some((host, port)) = self.server.rsplit_once(':')
            && !host.contains(':')
            && port.parse::<u16>().is_err()
        {
            return Err(Error::invalid(format!("invalid port in server {}", self.server)));
        }
        if self.needs_to_sign() && is_blank(self.aws_secret_access_key.as_deref()) {
            return Err(Error::invalid("need AWS Access Key Id and AWS Secret Key"));
        }
        if !listing {
            let listing_keys: Vec<&str> = [
                self.prefix.as_ref().map(|_| "prefix"),
                self.delimiter.as_ref().map(|_| "delimiter"),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !listing_keys.is_empty() {
                return Err(Error::invalid(format!(
                    "Unknown key(s): {}",
                    listing_keys.join(", ")
                )));
            }
        }
        Ok(())
    }
}
