// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2022 MinIO, Inc.
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

//! # s3-courier
//!
//! An asynchronous, callback driven client core for Amazon S3 compatible
//! object storage. Requests are signed with AWS Signature Version 2 and
//! driven through a retry and redirect state machine on the tokio runtime.
//!
//! A [`s3::Bucket`] or [`s3::Item`] resolves where a resource lives
//! (virtual-hosted or path style) and hands out one argument builder per
//! operation. A builder either spawns the request and reports the outcome
//! to completion callbacks, or is awaited directly for the final response.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use s3_courier::s3::{Config, Item};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default().credentials("abc", "123");
//!     let item = Item::new("my-bucket", "the-key", config).unwrap();
//!
//!     item.get()
//!         .on_success(|resp| println!("got status {}", resp.status()))
//!         .on_retry(|event| println!("retrying after {}", event.reason))
//!         .on_error(|failure| eprintln!("{failure}"))
//!         .execute()
//!         .unwrap()
//!         .await
//!         .unwrap();
//!
//!     let resp = item.head().send().await.expect("request failed");
//!     println!("content type: {:?}", resp.content_type());
//! }
//! ```
//!
//! ## Design
//! - [`s3::signer`] computes the `Authorization` header
//! - [`s3::request::Request`] owns retries and redirects; every attempt is a
//!   new request derived with [`s3::request::Request::next_attempt`]
//! - [`s3::transport::Transport`] is the seam to the HTTP stack
//! - Terminal failures without an error callback are escalated as `Err`

#![allow(clippy::result_large_err)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
