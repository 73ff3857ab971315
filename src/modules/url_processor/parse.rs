//! Component-level URL parsing.
//!
//! Splits a reference into scheme, user-info, host, path, query and fragment
//! without normalizing them: host case and an empty path survive a round
//! trip, which WHATWG parsers such as `url::Url` do not allow.
//!
//! Path and fragment are held percent-decoded so they can be edited as text.
//! The text as written is remembered and reused on output for as long as it
//! still decodes to the current value; after an edit the component is
//! re-escaped.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Why a string is not a structurally valid URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("invalid control character in URL")]
    ControlCharacter,

    #[error("invalid port {0:?} after host")]
    InvalidPort(String),

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("missing ']' in host")]
    UnclosedIpv6,

    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,
}

/// Parse failure, naming the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse {input:?}: {kind}")]
pub struct ParseError {
    pub input: String,
    pub kind: ParseErrorKind,
}

/// A parsed URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lower-cased scheme, empty for relative references.
    pub scheme: String,
    /// Everything after `scheme:` when it does not start with `/`.
    pub opaque: String,
    pub user_info: Option<String>,
    /// Host including any `:port` suffix, as written.
    pub host: String,
    /// Decoded path.
    pub path: String,
    /// Path as written, kept only when it differs from the default escaping
    /// of `path`.
    pub raw_path: String,
    /// Query as written.
    pub query: String,
    /// A bare trailing `?` with nothing after it.
    pub force_query: bool,
    /// Decoded fragment; empty when absent.
    pub fragment: String,
    pub raw_fragment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Path,
    Fragment,
}

impl ParsedUrl {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let fail = |kind| ParseError {
            input: raw.to_string(),
            kind,
        };

        if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(fail(ParseErrorKind::ControlCharacter));
        }

        let mut url = ParsedUrl::default();

        let rest = match raw.split_once('#') {
            Some((head, fragment)) => {
                (url.fragment, url.raw_fragment) =
                    decode_component(fragment, Component::Fragment).map_err(fail)?;
                head
            }
            None => raw,
        };

        let (scheme, mut rest) = split_scheme(rest).map_err(fail)?;
        url.scheme = scheme.to_ascii_lowercase();

        if rest.ends_with('?') && rest.matches('?').count() == 1 {
            url.force_query = true;
            rest = &rest[..rest.len() - 1];
        } else if let Some((head, query)) = rest.split_once('?') {
            url.query = query.to_string();
            rest = head;
        }

        if !rest.starts_with('/') {
            if !url.scheme.is_empty() {
                url.opaque = rest.to_string();
                return Ok(url);
            }
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return Err(fail(ParseErrorKind::ColonInFirstSegment));
            }
        }

        // Without a scheme, `///x` is a path rather than an empty authority.
        if rest.starts_with("//") && (!url.scheme.is_empty() || !rest.starts_with("///")) {
            let after_slashes = &rest[2..];
            let (authority, path) = match after_slashes.find('/') {
                Some(index) => after_slashes.split_at(index),
                None => (after_slashes, ""),
            };
            let (user_info, host) = match authority.rfind('@') {
                Some(index) => (Some(&authority[..index]), &authority[index + 1..]),
                None => (None, authority),
            };
            validate_host(host).map_err(fail)?;
            url.user_info = user_info.map(str::to_string);
            url.host = host.to_string();
            rest = path;
        }

        (url.path, url.raw_path) = decode_component(rest, Component::Path).map_err(fail)?;

        Ok(url)
    }

    /// Path in its escaped form: the text as written while it still matches
    /// `path`, otherwise `path` escaped afresh.
    pub fn escaped_path(&self) -> Cow<'_, str> {
        if self.path == "*" && self.raw_path.is_empty() {
            return Cow::Borrowed("*");
        }
        encode_component(&self.path, &self.raw_path, Component::Path)
    }

    pub fn escaped_fragment(&self) -> Cow<'_, str> {
        encode_component(&self.fragment, &self.raw_fragment, Component::Fragment)
    }
}

/// Split `scheme:rest`. A string whose first character cannot start a scheme
/// is treated as a relative reference with no scheme.
fn split_scheme(raw: &str) -> Result<(&str, &str), ParseErrorKind> {
    for (index, c) in raw.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if index > 0 => {}
            ':' if index == 0 => return Err(ParseErrorKind::MissingScheme),
            ':' => return Ok((&raw[..index], &raw[index + 1..])),
            _ => return Ok(("", raw)),
        }
    }
    Ok(("", raw))
}

fn validate_host(host: &str) -> Result<(), ParseErrorKind> {
    let port = if host.starts_with('[') {
        let close = host.find(']').ok_or(ParseErrorKind::UnclosedIpv6)?;
        &host[close + 1..]
    } else {
        match host.rfind(':') {
            Some(index) => &host[index..],
            None => "",
        }
    };

    if !port.is_empty() {
        let digits = port.strip_prefix(':').unwrap_or(port);
        if !port.starts_with(':') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseErrorKind::InvalidPort(port.to_string()));
        }
    }

    unescape(host).map(|_| ())
}

/// Decode `text`, returning `(decoded, raw)` where `raw` is empty when the
/// default escaping of `decoded` reproduces `text`.
fn decode_component(
    text: &str,
    component: Component,
) -> Result<(String, String), ParseErrorKind> {
    let decoded = unescape(text)?;
    let raw = if escape(&decoded, component) == text {
        String::new()
    } else {
        text.to_string()
    };
    Ok((decoded, raw))
}

fn encode_component<'a>(decoded: &'a str, raw: &'a str, component: Component) -> Cow<'a, str> {
    let raw_still_applies = !raw.is_empty()
        && valid_encoded(raw, component)
        && unescape(raw).is_ok_and(|value| value == decoded);
    if raw_still_applies {
        Cow::Borrowed(raw)
    } else {
        escape(decoded, component)
    }
}

/// Decode `%XX` escapes. Every `%` must introduce two hex digits; decoded
/// bytes that are not UTF-8 become U+FFFD.
fn unescape(text: &str) -> Result<String, ParseErrorKind> {
    if !text.contains('%') {
        return Ok(text.to_string());
    }

    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'%' {
            decoded.push(bytes[index]);
            index += 1;
            continue;
        }
        let pair = bytes.get(index + 1..index + 3);
        match pair.and_then(|pair| Some((hex_value(pair[0])?, hex_value(pair[1])?))) {
            Some((high, low)) => decoded.push(high << 4 | low),
            None => {
                let end = (index + 3).min(bytes.len());
                let escape = String::from_utf8_lossy(&bytes[index..end]).into_owned();
                return Err(ParseErrorKind::InvalidEscape(escape));
            }
        }
        index += 3;
    }

    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).map(|value| value as u8)
}

fn should_escape(byte: u8, component: Component) -> bool {
    if byte.is_ascii_alphanumeric() {
        return false;
    }
    match byte {
        b'-' | b'_' | b'.' | b'~' => false,
        b'$' | b'&' | b'+' | b',' | b'/' | b':' | b';' | b'=' | b'?' | b'@' => {
            component == Component::Path && byte == b'?'
        }
        b'!' | b'(' | b')' | b'*' => component != Component::Fragment,
        _ => true,
    }
}

/// Whether `raw` may be emitted as-is: every byte is either a sub-delimiter,
/// a bracket, a percent sign, or needs no escaping.
fn valid_encoded(raw: &str, component: Component) -> bool {
    raw.bytes().all(|byte| {
        matches!(
            byte,
            b'!' | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
                | b'['
                | b']'
                | b'%'
        ) || !should_escape(byte, component)
    })
}

fn escape(text: &str, component: Component) -> Cow<'_, str> {
    if !text.bytes().any(|byte| should_escape(byte, component)) {
        return Cow::Borrowed(text);
    }

    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut escaped = String::with_capacity(text.len() + 8);
    for byte in text.bytes() {
        if should_escape(byte, component) {
            escaped.push('%');
            escaped.push(char::from(HEX[usize::from(byte >> 4)]));
            escaped.push(char::from(HEX[usize::from(byte & 0x0f)]));
        } else {
            escaped.push(char::from(byte));
        }
    }
    Cow::Owned(escaped)
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote_prefix = false;
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
            wrote_prefix = true;
        }

        if !self.opaque.is_empty() {
            f.write_str(&self.opaque)?;
        } else {
            let has_authority = !self.host.is_empty() || self.user_info.is_some();
            if !self.scheme.is_empty() || has_authority {
                if has_authority || !self.path.is_empty() {
                    f.write_str("//")?;
                    wrote_prefix = true;
                }
                if let Some(user_info) = &self.user_info {
                    write!(f, "{}@", user_info)?;
                }
                f.write_str(&self.host)?;
            }

            let path = self.escaped_path();
            if !path.is_empty() && !path.starts_with('/') && !self.host.is_empty() {
                f.write_str("/")?;
            }
            // A leading `a:b` segment would read back as a scheme.
            let first_segment = path.split('/').next().unwrap_or_default();
            if !wrote_prefix && first_segment.contains(':') {
                f.write_str("./")?;
            }
            f.write_str(&path)?;
        }

        if self.force_query || !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.escaped_fragment())?;
        }
        Ok(())
    }
}
