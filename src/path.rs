//! Path expression grammar for addressing values in a document tree.
//!
//! A path is a sequence of dot-separated segments. Each segment is a plain
//! map key, or a key (possibly empty) followed by one or more bracketed
//! list indices:
//!
//! - `server.host` - nested map keys
//! - `hosts[0]` - key lookup, then list index
//! - `matrix[1][2]` - consecutive indices
//! - `[0]` - index applied directly to the current value

use std::fmt;

use crate::error::AccessError;

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    /// The raw path string
    pub raw: String,
    /// Parsed path segments
    pub segments: Vec<Segment>,
}

/// A single segment of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The key portion; empty when the segment is indices only
    pub key: String,
    /// Bracketed indices, in left-to-right order
    pub indices: Vec<usize>,
}

impl Segment {
    /// Parse one dot-free segment.
    ///
    /// Malformed bracket content (non-digit content, stray brackets, text
    /// after an index group) is rejected rather than silently treated as a
    /// plain key.
    pub fn parse(text: &str) -> Result<Self, AccessError> {
        let bracket = match text.find('[') {
            Some(pos) => pos,
            None => {
                if text.contains(']') {
                    return Err(AccessError::PathSyntax(format!(
                        "stray ']' in segment [{}]",
                        text
                    )));
                }
                return Ok(Self {
                    key: text.to_string(),
                    indices: Vec::new(),
                });
            }
        };

        let key = &text[..bracket];
        if key.contains(']') {
            return Err(AccessError::PathSyntax(format!(
                "stray ']' in segment [{}]",
                text
            )));
        }

        let mut indices = Vec::new();
        let mut rest = &text[bracket..];
        while let Some(tail) = rest.strip_prefix('[') {
            let close = tail.find(']').ok_or_else(|| {
                AccessError::PathSyntax(format!("unclosed '[' in segment [{}]", text))
            })?;
            let digits = &tail[..close];
            let index = digits.parse::<usize>().map_err(|_| {
                AccessError::PathSyntax(format!(
                    "index [{}] in segment [{}] is not a non-negative integer",
                    digits, text
                ))
            })?;
            indices.push(index);
            rest = &tail[close + 1..];
        }

        if !rest.is_empty() {
            return Err(AccessError::PathSyntax(format!(
                "unexpected trailing [{}] in segment [{}]",
                rest, text
            )));
        }

        Ok(Self {
            key: key.to_string(),
            indices,
        })
    }

    /// Whether this segment carries list indices.
    pub fn has_indices(&self) -> bool {
        !self.indices.is_empty()
    }
}

impl KeyPath {
    /// Parse a dotted path expression into segments.
    pub fn parse(path: &str) -> Result<Self, AccessError> {
        let segments = path
            .split('.')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_keys() {
        let path = KeyPath::parse("server.host.name").unwrap();

        assert_eq!(path.segments.len(), 3);
        assert_eq!(path.segments[0].key, "server");
        assert_eq!(path.segments[2].key, "name");
        assert!(!path.segments[0].has_indices());
    }

    #[test]
    fn test_parse_key_with_index() {
        let path = KeyPath::parse("hosts[0].name").unwrap();

        assert_eq!(path.segments.len(), 2);
        assert_eq!(path.segments[0].key, "hosts");
        assert_eq!(path.segments[0].indices, vec![0]);
        assert_eq!(path.segments[1].key, "name");
    }

    #[test]
    fn test_parse_consecutive_indices() {
        let path = KeyPath::parse("matrix[1][2][0]").unwrap();

        assert_eq!(path.segments.len(), 1);
        assert_eq!(path.segments[0].key, "matrix");
        assert_eq!(path.segments[0].indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_parse_bare_index_segment() {
        let path = KeyPath::parse("[3]").unwrap();

        assert_eq!(path.segments.len(), 1);
        assert_eq!(path.segments[0].key, "");
        assert_eq!(path.segments[0].indices, vec![3]);
    }

    #[test]
    fn test_key_may_contain_odd_characters() {
        let path = KeyPath::parse("don't-change-me.sub@key").unwrap();

        assert_eq!(path.segments[0].key, "don't-change-me");
        assert_eq!(path.segments[1].key, "sub@key");
    }

    #[test]
    fn test_non_digit_index_rejected() {
        let result = KeyPath::parse("hosts[x]");
        assert!(matches!(result, Err(AccessError::PathSyntax(_))));
    }

    #[test]
    fn test_trailing_text_after_index_rejected() {
        let result = KeyPath::parse("a[0]b");
        assert!(matches!(result, Err(AccessError::PathSyntax(_))));
    }

    #[test]
    fn test_unclosed_bracket_rejected() {
        let result = KeyPath::parse("a[0");
        assert!(matches!(result, Err(AccessError::PathSyntax(_))));
    }

    #[test]
    fn test_stray_close_bracket_rejected() {
        let result = KeyPath::parse("a]b");
        assert!(matches!(result, Err(AccessError::PathSyntax(_))));
    }

    #[test]
    fn test_display_round_trip() {
        let path = KeyPath::parse("a.b[0].c").unwrap();
        assert_eq!(path.to_string(), "a.b[0].c");
    }
}
