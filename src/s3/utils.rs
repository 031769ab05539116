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

//! Various utility and helper functions

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};


/// Form-style escaping used for keys and listing parameters: `A-Za-z0-9`
/// and `-_.~` stay as they are, a space becomes `+` and every other byte is
/// percent-encoded.
pub fn form_escape(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Gets current UTC time
pub fn utc_now() -> UtcTime {
    chrono::offset::Utc::now()
}

/// Gets HTTP header value (RFC 1123) of given time
pub fn to_http_header_value(time: UtcTime) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses HTTP header value to time
pub fn from_http_header_value(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT")?,
        Utc,
    ))
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3fZ") {
            Ok(d) => d,
            _ => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")?,
        },
        Utc,
    ))
}

/// Returns true for `None`, an empty string or whitespace only
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_escape() {
        assert_eq!(form_escape("photos/2010 summer.jpg"), "photos%2F2010+summer.jpg");
        assert_eq!(form_escape("a+b&c=d"), "a%2Bb%26c%3Dd");
        assert_eq!(form_escape("keep-_.~"), "keep-_.~");
        assert_eq!(form_escape("100%"), "100%25");
        assert_eq!(form_escape("caf\u{e9}*"), "caf%C3%A9%2A");
    }
    use chrono::TimeZone;

    #[test]
    fn test_http_header_value_pads_day() {
        let time = Utc.with_ymd_and_hms(2010, 2, 5, 9, 3, 7).unwrap();
        assert_eq!(to_http_header_value(time), "Fri, 05 Feb 2010 09:03:07 GMT");
        assert_eq!(
            from_http_header_value("Fri, 05 Feb 2010 09:03:07 GMT").unwrap(),
            time
        );
    }

    #[test]
    fn test_from_iso8601utc_with_and_without_millis() {
        let expected = Utc.with_ymd_and_hms(2009, 10, 12, 17, 50, 30).unwrap();
        assert_eq!(from_iso8601utc("2009-10-12T17:50:30.000Z").unwrap(), expected);
        assert_eq!(from_iso8601utc("2009-10-12T17:50:30Z").unwrap(), expected);
        assert!(from_iso8601utc("yesterday").is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("  ")));
        assert!(!is_blank(Some("abc")));
    }
}
