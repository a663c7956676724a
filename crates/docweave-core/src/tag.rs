//! `{{type:name}}` template tags

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TagParseError;

/// Kind of a template tag, from the part before the `:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `text`
    Text,
    /// `img`
    Image,
    /// `table`
    Table,
    /// `header_<N>`, N in 0-9
    Header(u32),
    /// `list`
    List,
    /// Any other type; the paragraph is copied as-is
    Unknown(String),
}

impl TagKind {
    /// Classify a trimmed tag type
    pub fn from_type(tag_type: &str) -> Result<Self, TagParseError> {
        let kind = match tag_type {
            "text" => TagKind::Text,
            "img" => TagKind::Image,
            "table" => TagKind::Table,
            "list" => TagKind::List,
            t if t.starts_with("header") => {
                let level = t
                    .strip_prefix("header_")
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|n| *n <= 9)
                    .ok_or_else(|| TagParseError::InvalidHeadingLevel(t.to_string()))?;
                TagKind::Header(level)
            }
            other => TagKind::Unknown(other.to_string()),
        };
        Ok(kind)
    }

    /// Name used for the kind in reports and errors
    pub fn as_str(&self) -> &str {
        match self {
            TagKind::Text => "text",
            TagKind::Image => "img",
            TagKind::Table => "table",
            TagKind::Header(_) => "header",
            TagKind::List => "list",
            TagKind::Unknown(t) => t,
        }
    }
}

/// A parsed template tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// What the tag substitutes
    pub kind: TagKind,
    /// Key looked up in the data mapping
    pub name: String,
    raw_type: String,
}

impl Tag {
    /// The trimmed type exactly as written, e.g. `header_2`
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}:{}}}}}", self.raw_type, self.name)
    }
}

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    // Greedy and unanchored: the first `{{` to the last `}}` on the line
    TAG_RE.get_or_init(|| Regex::new(r"\{\{(.*)\}\}").unwrap())
}

/// Find the tag in a paragraph's text.
///
/// Returns `Ok(None)` when the text holds no `{{...}}`.
pub fn parse_tag(text: &str) -> Result<Option<Tag>, TagParseError> {
    let Some(caps) = tag_regex().captures(text) else {
        return Ok(None);
    };
    let body = caps.get(1).map_or("", |m| m.as_str());

    let (tag_type, name) = body
        .split_once(':')
        .ok_or_else(|| TagParseError::MissingSeparator(body.to_string()))?;
    let tag_type = tag_type.trim();

    Ok(Some(Tag {
        kind: TagKind::from_type(tag_type)?,
        name: name.trim().to_string(),
        raw_type: tag_type.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> (TagKind, String) {
        let tag = parse_tag(text).unwrap().unwrap();
        (tag.kind, tag.name)
    }

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(parsed("{{text:greeting}}"), (TagKind::Text, "greeting".into()));
        assert_eq!(parsed("{{img:logo}}"), (TagKind::Image, "logo".into()));
        assert_eq!(parsed("{{table:t1}}"), (TagKind::Table, "t1".into()));
        assert_eq!(parsed("{{list:steps}}"), (TagKind::List, "steps".into()));
        assert_eq!(parsed("{{header_0:title}}"), (TagKind::Header(0), "title".into()));
        assert_eq!(parsed("{{header_3:h}}"), (TagKind::Header(3), "h".into()));
    }

    #[test]
    fn test_parse_trims_and_ignores_surrounding_text() {
        let tag = parse_tag("Intro {{ header_2 :  Section One }} tail").unwrap().unwrap();
        assert_eq!(tag.kind, TagKind::Header(2));
        assert_eq!(tag.name, "Section One");
        assert_eq!(tag.raw_type(), "header_2");
        assert_eq!(tag.to_string(), "{{header_2:Section One}}");
    }

    #[test]
    fn test_no_tag() {
        assert_eq!(parse_tag("plain text").unwrap(), None);
        assert_eq!(parse_tag("{single}").unwrap(), None);
        assert_eq!(parse_tag("{{unclosed").unwrap(), None);
        assert_eq!(parse_tag("").unwrap(), None);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(
            parsed("{{chart:sales}}"),
            (TagKind::Unknown("chart".into()), "sales".into())
        );
    }

    #[test]
    fn test_name_keeps_later_colons() {
        assert_eq!(parsed("{{text:a:b}}"), (TagKind::Text, "a:b".into()));
    }

    #[test]
    fn test_greedy_match_spans_tags() {
        // Two tags on one line read as one body
        assert_eq!(parsed("{{text:a}} and {{text:b}}"), (TagKind::Text, "a}} and {{text:b".into()));
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            parse_tag("{{greeting}}"),
            Err(TagParseError::MissingSeparator("greeting".into()))
        );
    }

    #[test]
    fn test_invalid_heading_levels() {
        for t in ["header", "headers", "header_x", "header_10", "header_-1"] {
            let text = format!("{{{{{}:n}}}}", t);
            assert_eq!(
                parse_tag(&text),
                Err(TagParseError::InvalidHeadingLevel(t.to_string())),
                "{}",
                t
            );
        }
    }
}
