//! Response bodies and representation formats
//!
//! Every message this crate emits is a single-key structure such as
//! `{"error": "API key not authorized"}` or `{"result": "success"}`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::shared::error::SharedError;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const XML_ROOT: &str = "hash";

/// Representation a caller can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
    /// Browsers get the JSON body as well
    Html,
}

impl ResponseFormat {
    /// Resolve a media type such as `application/xml`
    ///
    /// Returns `None` for wildcards and anything unknown.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/json" | "text/json" => Some(ResponseFormat::Json),
            "application/xml" | "text/xml" => Some(ResponseFormat::Xml),
            "text/html" | "application/xhtml+xml" => Some(ResponseFormat::Html),
            _ => None,
        }
    }

    /// Content type written on the wire
    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::Json | ResponseFormat::Html => "application/json",
            ResponseFormat::Xml => "application/xml",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = SharedError;

    /// Parse a short format name (`json`, `xml`, `html`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            "html" | "htm" => Ok(ResponseFormat::Html),
            _ => Err(SharedError::unsupported_format(s)),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
            ResponseFormat::Html => "html",
        };
        f.write_str(name)
    }
}

/// Single-key `{type: message}` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub kind: String,
    pub message: String,
}

impl ResponseBody {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// `{"error": message}`
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }

    /// `{"result": "success"}`
    pub fn success() -> Self {
        Self::new("result", "success")
    }

    fn as_map(&self) -> BTreeMap<&str, &str> {
        BTreeMap::from([(self.kind.as_str(), self.message.as_str())])
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        to_json(&self.as_map())
    }

    /// `<hash><kind>message</kind></hash>` with an XML declaration
    pub fn to_xml(&self) -> Result<String, SharedError> {
        to_xml(&self.as_map())
    }

    /// Serialize for `format`
    pub fn render(&self, format: ResponseFormat) -> Result<String, SharedError> {
        render_document(&self.as_map(), format)
    }
}

/// Serialize a flat document (a map of names to values) for `format`
///
/// XML documents are wrapped in a `<hash>` root; keys that are not valid XML
/// names fail with `SharedError::SerializationError`.
pub fn render_document<T: Serialize + ?Sized>(
    document: &T,
    format: ResponseFormat,
) -> Result<String, SharedError> {
    match format {
        ResponseFormat::Json | ResponseFormat::Html => to_json(document),
        ResponseFormat::Xml => to_xml(document),
    }
}

fn to_json<T: Serialize + ?Sized>(document: &T) -> Result<String, SharedError> {
    Ok(serde_json::to_string(document)?)
}

fn to_xml<T: Serialize + ?Sized>(document: &T) -> Result<String, SharedError> {
    let body = quick_xml::se::to_string_with_root(XML_ROOT, document)
        .map_err(|e| SharedError::serialization(format!("XML error: {}", e)))?;
    Ok(format!("{}\n{}", XML_DECLARATION, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_body() {
        let body = ResponseBody::error("API key not authorized");
        assert_eq!(body.to_json().unwrap(), r#"{"error":"API key not authorized"}"#);
    }

    #[test]
    fn test_success_body() {
        assert_eq!(
            ResponseBody::success().to_json().unwrap(),
            r#"{"result":"success"}"#
        );
    }

    #[test]
    fn test_xml_body() {
        let xml = ResponseBody::error("3scale metric not found").to_xml().unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<hash>"));
        assert!(xml.contains("<error>3scale metric not found</error>"));
        assert!(xml.trim_end().ends_with("</hash>"));
    }

    #[test]
    fn test_xml_escapes_markup() {
        let xml = ResponseBody::error("a < b & c").to_xml().unwrap();
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_html_renders_json() {
        let body = ResponseBody::error("nope");
        assert_eq!(
            body.render(ResponseFormat::Html).unwrap(),
            body.render(ResponseFormat::Json).unwrap()
        );
        assert_eq!(ResponseFormat::Html.content_type(), "application/json");
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!("JSON".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("xml".parse::<ResponseFormat>().unwrap(), ResponseFormat::Xml);
        assert_eq!("html".parse::<ResponseFormat>().unwrap(), ResponseFormat::Html);
        assert_eq!(
            "csv".parse::<ResponseFormat>().unwrap_err(),
            SharedError::unsupported_format("csv")
        );
    }

    #[test]
    fn test_format_from_mime() {
        assert_eq!(
            ResponseFormat::from_mime("application/json; charset=utf-8"),
            Some(ResponseFormat::Json)
        );
        assert_eq!(ResponseFormat::from_mime("text/xml"), Some(ResponseFormat::Xml));
        assert_eq!(ResponseFormat::from_mime("text/html"), Some(ResponseFormat::Html));
        assert_eq!(ResponseFormat::from_mime("*/*"), None);
        assert_eq!(ResponseFormat::from_mime("text/csv"), None);
    }
}
