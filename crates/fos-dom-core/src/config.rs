//! Tree Configuration

/// Document content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// `application/xml`
    #[default]
    Xml,
    /// `application/xhtml+xml`
    Xhtml,
    /// `text/html`; documents of this type are HTML documents
    Html,
}

impl ContentType {
    /// MIME type string
    pub fn mime(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Xhtml => "application/xhtml+xml",
            Self::Html => "text/html",
        }
    }
}

/// DOM tree configuration options
#[derive(Debug, Clone)]
pub struct DomConfig {
    /// URL given to documents created without one
    pub default_url: String,

    /// Content type given to documents created without one
    pub content_type: ContentType,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            default_url: "about:blank".to_string(),
            content_type: ContentType::Xml,
        }
    }
}
