#![deny(missing_docs)]

//! # Content Negotiation
//!
//! Per-request view of the `Content-Type` and `Accept` headers.
//!
//! The request side is strict: the declared content type must be exactly
//! `application/json` or `application/xml`. The response side follows the usual
//! `Accept` rules (media ranges, wildcards and `q` weights), preferring JSON when
//! the client expresses no preference.

use crate::error::DecodeError;

/// Media type for JSON bodies.
pub const APPLICATION_JSON: &str = "application/json";
/// Media type for XML bodies.
pub const APPLICATION_XML: &str = "application/xml";

/// The two wire formats this API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
}

impl ContentFormat {
    /// Server preference order used to break ties.
    pub const OFFERED: [ContentFormat; 2] = [ContentFormat::Json, ContentFormat::Xml];

    /// The media type string for this format.
    pub fn media_type(self) -> &'static str {
        match self {
            ContentFormat::Json => APPLICATION_JSON,
            ContentFormat::Xml => APPLICATION_XML,
        }
    }

    /// Resolves a declared request `Content-Type`.
    ///
    /// Only the two exact values are accepted; a missing header is unsupported too.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, DecodeError> {
        match content_type {
            Some(APPLICATION_JSON) => Ok(ContentFormat::Json),
            Some(APPLICATION_XML) => Ok(ContentFormat::Xml),
            _ => Err(DecodeError::UnsupportedContentType),
        }
    }
}

/// Headers relevant to one request. Constructed per request and then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationContext {
    /// Raw `Content-Type` request header.
    pub content_type: Option<String>,
    /// Raw `Accept` request header.
    pub accept: Option<String>,
}

impl NegotiationContext {
    /// Builds a context from raw header values.
    pub fn new(content_type: Option<&str>, accept: Option<&str>) -> Self {
        Self {
            content_type: content_type.map(str::to_owned),
            accept: accept.map(str::to_owned),
        }
    }

    /// The format the request body is declared in.
    pub fn request_format(&self) -> Result<ContentFormat, DecodeError> {
        ContentFormat::from_content_type(self.content_type.as_deref())
    }

    /// The format the response should be rendered in, if any is acceptable.
    pub fn response_format(&self) -> Option<ContentFormat> {
        negotiate(self.accept.as_deref())
    }
}

/// One parsed entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    kind: String,
    subtype: String,
    quality: f32,
    position: usize,
}

impl MediaRange {
    /// How specifically this range matches `media_type`, or `None` if it does not.
    fn specificity(&self, media_type: &str) -> Option<u8> {
        let (kind, subtype) = media_type.split_once('/')?;
        match (self.kind.as_str(), self.subtype.as_str()) {
            ("*", "*") => Some(0),
            (k, "*") if k == kind => Some(1),
            (k, s) if k == kind && s == subtype => Some(2),
            _ => None,
        }
    }
}

fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .enumerate()
        .filter_map(|(position, entry)| {
            let mut parts = entry.split(';');
            let media = parts.next()?.trim().to_ascii_lowercase();
            let (kind, subtype) = media.split_once('/')?;
            if kind.is_empty() || subtype.is_empty() {
                return None;
            }

            let mut quality = 1.0;
            for param in parts {
                if let Some((name, value)) = param.split_once('=') {
                    if name.trim().eq_ignore_ascii_case("q") {
                        quality = value.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
                    }
                }
            }

            Some(MediaRange {
                kind: kind.to_string(),
                subtype: subtype.to_string(),
                quality,
                position,
            })
        })
        .collect()
}

/// Picks the response format for an `Accept` header.
///
/// A missing or blank header accepts anything, so JSON is chosen. Otherwise each
/// offered format takes the weight of its most specific matching range; the
/// highest weight wins, then the range listed first by the client, then JSON.
/// Returns `None` when nothing offered is acceptable.
pub fn negotiate(accept: Option<&str>) -> Option<ContentFormat> {
    let header = match accept.map(str::trim) {
        None | Some("") => return Some(ContentFormat::Json),
        Some(header) => header,
    };

    let ranges = parse_accept(header);

    let mut best: Option<(ContentFormat, f32, usize)> = None;
    for format in ContentFormat::OFFERED {
        let matched = ranges
            .iter()
            .filter_map(|range| {
                range
                    .specificity(format.media_type())
                    .map(|rank| (rank, range))
            })
            .max_by_key(|(rank, _)| *rank)
            .map(|(_, range)| range);

        let Some(range) = matched else {
            continue;
        };
        if range.quality <= 0.0 {
            continue;
        }

        let better = match best {
            None => true,
            Some((_, quality, position)) => {
                range.quality > quality || (range.quality == quality && range.position < position)
            }
        };
        if better {
            best = Some((format, range.quality, range.position));
        }
    }

    best.map(|(format, _, _)| format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_is_exact() {
        assert_eq!(
            ContentFormat::from_content_type(Some("application/json")),
            Ok(ContentFormat::Json)
        );
        assert_eq!(
            ContentFormat::from_content_type(Some("application/xml")),
            Ok(ContentFormat::Xml)
        );
        for bad in [Some("text/plain"), Some("application/json; charset=utf-8"), None] {
            assert_eq!(
                ContentFormat::from_content_type(bad),
                Err(DecodeError::UnsupportedContentType)
            );
        }
    }

    #[test]
    fn test_missing_accept_defaults_to_json() {
        assert_eq!(negotiate(None), Some(ContentFormat::Json));
        assert_eq!(negotiate(Some("  ")), Some(ContentFormat::Json));
    }

    #[test]
    fn test_exact_types() {
        assert_eq!(negotiate(Some("application/json")), Some(ContentFormat::Json));
        assert_eq!(negotiate(Some("application/xml")), Some(ContentFormat::Xml));
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(negotiate(Some("*/*")), Some(ContentFormat::Json));
        assert_eq!(negotiate(Some("application/*")), Some(ContentFormat::Json));
        assert_eq!(
            negotiate(Some("text/html, application/xml;q=0.9, */*;q=0.8")),
            Some(ContentFormat::Xml)
        );
    }

    #[test]
    fn test_client_order_breaks_ties() {
        assert_eq!(
            negotiate(Some("application/xml, application/json")),
            Some(ContentFormat::Xml)
        );
    }

    #[test]
    fn test_quality_weights() {
        assert_eq!(
            negotiate(Some("application/xml;q=0.5, application/json;q=0.6")),
            Some(ContentFormat::Json)
        );
        assert_eq!(
            negotiate(Some("application/json;q=0, */*")),
            Some(ContentFormat::Xml)
        );
    }

    #[test]
    fn test_unacceptable() {
        assert_eq!(negotiate(Some("text/plain")), None);
        assert_eq!(negotiate(Some("text/*, image/png")), None);
        assert_eq!(negotiate(Some("application/json;q=0")), None);
    }

    #[test]
    fn test_context_round_trip() {
        let ctx = NegotiationContext::new(Some("application/xml"), Some("application/json"));
        assert_eq!(ctx.request_format(), Ok(ContentFormat::Xml));
        assert_eq!(ctx.response_format(), Some(ContentFormat::Json));
    }
}
