//! Extractors for header-style metadata: addresses, ids, dates and phone
//! numbers embedded in free text

use crate::error::{DocpartError, Result};
use crate::patterns::{
    DATETIMETZ, EMAIL_ADDRESS, IP_ADDRESS, IP_ADDRESS_NAME, MAPI_ID, US_PHONE_NUMBER,
};
use chrono::{DateTime, FixedOffset};
use regex::Regex;

/// Text before the `index`-th match of `pattern`.
///
/// # Errors
///
/// Returns [`DocpartError::InvalidInput`] if `pattern` matches fewer than
/// `index + 1` times.
pub fn extract_text_before(text: &str, pattern: &Regex, index: usize, strip: bool) -> Result<String> {
    let found = pattern.find_iter(text).nth(index).ok_or_else(|| {
        DocpartError::InvalidInput(format!(
            "pattern '{}' matches fewer than {} times",
            pattern.as_str(),
            index + 1
        ))
    })?;
    let before = &text[..found.start()];
    Ok(if strip { before.trim_end() } else { before }.to_string())
}

/// Text after the `index`-th match of `pattern`.
///
/// # Errors
///
/// Returns [`DocpartError::InvalidInput`] if `pattern` matches fewer than
/// `index + 1` times.
pub fn extract_text_after(text: &str, pattern: &Regex, index: usize, strip: bool) -> Result<String> {
    let found = pattern.find_iter(text).nth(index).ok_or_else(|| {
        DocpartError::InvalidInput(format!(
            "pattern '{}' matches fewer than {} times",
            pattern.as_str(),
            index + 1
        ))
    })?;
    let after = &text[found.end()..];
    Ok(if strip { after.trim_start() } else { after }.to_string())
}

/// Every email address in `text`, lowercased.
#[must_use = "returns the extracted email addresses"]
pub fn extract_email_address(text: &str) -> Vec<String> {
    EMAIL_ADDRESS
        .find_iter(&text.to_lowercase())
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Every IPv4 or IPv6 address in `text`.
#[must_use = "returns the extracted IP addresses"]
pub fn extract_ip_address(text: &str) -> Vec<String> {
    IP_ADDRESS
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Every `host.domain.tld` name in `text`.
#[must_use = "returns the extracted host names"]
pub fn extract_ip_address_name(text: &str) -> Vec<String> {
    IP_ADDRESS_NAME
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Every MAPI id in `text`, without the trailing `;`.
#[must_use = "returns the extracted MAPI ids"]
pub fn extract_mapi_id(text: &str) -> Vec<String> {
    MAPI_ID
        .find_iter(text)
        .map(|found| found.as_str().trim_end_matches(';').to_string())
        .collect()
}

/// The first RFC 2822 timestamp with a numeric zone in `text`.
///
/// # Examples
///
/// ```
/// use docpart_core::extract::extract_datetimetz;
///
/// let header = "from mx.example.com; Mon, 14 Jun 2021 20:12:41 -0700";
/// let when = extract_datetimetz(header).unwrap();
/// assert_eq!(when.to_rfc3339(), "2021-06-14T20:12:41-07:00");
/// ```
#[must_use = "returns the extracted timestamp"]
pub fn extract_datetimetz(text: &str) -> Option<DateTime<FixedOffset>> {
    let found = DATETIMETZ.find(text)?;
    match DateTime::parse_from_str(found.as_str(), "%a, %d %b %Y %H:%M:%S %z") {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("'{}' looks like a timestamp but does not parse: {e}", found.as_str());
            None
        }
    }
}

/// The first US phone number in `text`, trimmed.
#[must_use = "returns the extracted phone number"]
pub fn extract_us_phone_number(text: &str) -> Option<String> {
    US_PHONE_NUMBER
        .find(text)
        .map(|found| found.as_str().trim().to_string())
}

/// Components of a leading ordered enumerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedBullet {
    /// First level, e.g. `"1"` in `1.2.3`
    pub major: Option<String>,
    /// Second level
    pub minor: Option<String>,
    /// Remaining levels joined together
    pub patch: Option<String>,
}

/// Splits a leading enumerator such as `1.2.3` or `a.b` into its levels.
///
/// Returns an empty [`OrderedBullet`] when the first token is not an
/// enumerator (same rules as
/// [`clean_ordered_bullets`](crate::cleaners::clean_ordered_bullets)).
#[must_use = "returns the components of the enumerator"]
pub fn extract_ordered_bullets(text: &str) -> OrderedBullet {
    let Some(first) = text.split_whitespace().next() else {
        return OrderedBullet::default();
    };
    if !first.contains('.') || first.contains("..") {
        return OrderedBullet::default();
    }
    let mut parts: Vec<&str> = first.split('.').collect();
    if parts.last().is_some_and(|last| last.is_empty()) {
        parts.pop();
    }
    let Some((major, rest)) = parts.split_first() else {
        return OrderedBullet::default();
    };
    if major.chars().count() > 2 {
        return OrderedBullet::default();
    }
    let patch = rest.get(1..).map(<[&str]>::concat).filter(|joined| !joined.is_empty());
    OrderedBullet {
        major: Some((*major).to_string()),
        minor: rest.first().map(|minor| (*minor).to_string()),
        patch,
    }
}
