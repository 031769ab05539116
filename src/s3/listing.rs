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

//! Bucket listing parser

use crate::s3::error::Error;
use crate::s3::utils::{UtcTime, from_iso8601utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use xmltree::{Element, XMLNode};

/// One `<Contents>` entry of a bucket listing, keyed by underscored field name
/// such as `key`, `last_modified`, `e_tag`, `size` or `owner`.
pub type ListingEntry = BTreeMap<String, ListingValue>;

#[derive(Clone, Debug, PartialEq)]
pub enum ListingValue {
    Text(String),
    Time(UtcTime),
    Integer(u64),
    Map(BTreeMap<String, ListingValue>),
}

impl ListingValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ListingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<UtcTime> {
        match self {
            ListingValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            ListingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ListingValue>> {
        match self {
            ListingValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Converts an XML element name into snake case, e.g. `LastModified` to
/// `last_modified` and `ETag` to `e_tag`.
pub fn underscore_string(name: &str) -> String {
    lazy_static! {
        static ref ACRONYM: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
        static ref CAMEL: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
    }
    let s = ACRONYM.replace_all(name, "${1}_${2}");
    let s = CAMEL.replace_all(&s, "${1}_${2}");
    s.replace('-', "_").to_lowercase()
}

fn parse_text(name: &str, text: &str) -> Result<ListingValue, Error> {
    match name {
        "LastModified" => Ok(ListingValue::Time(from_iso8601utc(text.trim())?)),
        "Size" => text
            .trim()
            .parse()
            .map(ListingValue::Integer)
            .map_err(|e| Error::InvalidListing(format!("bad <Size> value {text:?}: {e}"))),
        _ => Ok(ListingValue::Text(text.to_string())),
    }
}

fn element_value(element: &Element) -> Result<Option<ListingValue>, Error> {
    if let [XMLNode::Text(text)] = element.children.as_slice() {
        if text.trim().is_empty() {
            return Ok(None);
        }
        return parse_text(&element.name, text).map(Some);
    }
    Ok(Some(ListingValue::Map(element_map(element)?)))
}

fn element_map(element: &Element) -> Result<BTreeMap<String, ListingValue>, Error> {
    let mut map = BTreeMap::new();
    for child in element.children.iter().filter_map(XMLNode::as_element) {
        if let Some(value) = element_value(child)? {
            map.insert(underscore_string(&child.name), value);
        }
    }
    Ok(map)
}

fn collect_contents(element: &Element, out: &mut Vec<ListingEntry>) -> Result<(), Error> {
    for child in element.children.iter().filter_map(XMLNode::as_element) {
        if child.name == "Contents" {
            out.push(element_map(child)?);
        } else {
            collect_contents(child, out)?;
        }
    }
    Ok(())
}

/// Parses a `ListBucketResult` document into its `<Contents>` entries, in
/// document order. XML namespaces are ignored.
pub fn parse_listing(body: &[u8]) -> Result<Vec<ListingEntry>, Error> {
    let root = Element::parse(body)?;
    let mut entries = Vec::new();
    if root.name == "Contents" {
        entries.push(element_map(&root)?);
    } else {
        collect_contents(&root, &mut entries)?;
    }
    Ok(entries)
}
