//! XML Names
//!
//! The `Name` production of XML 1.0 (Fifth Edition) and the `QName`
//! production of Namespaces in XML, plus the DOM "validate and extract"
//! step used by namespace-qualified creation.
//!
//! See <https://www.w3.org/TR/xml/#NT-Name> and
//! <https://www.w3.org/TR/xml-names/#NT-QName>

use crate::error::{DomError, DomResult};
use crate::namespace::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::node::QualName;

/// `NameStartChar`
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// `NameChar`
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Matches the `Name` production
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Matches `NCName` (a `Name` without colons)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.contains(':') && is_valid_name(name)
}

/// Matches `QName`: `NCName (':' NCName)?`
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Fail with InvalidCharacterError unless `name` matches `Name`
pub fn validate_name(name: &str) -> DomResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(format!("'{}' is not a valid XML name", name)))
    }
}

/// Fail with InvalidCharacterError unless `name` matches `QName`
pub fn validate_qualified_name(name: &str) -> DomResult<()> {
    validate_name(name)?;
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(format!("'{}' is not a valid qualified name", name)))
    }
}

/// Splits a `QName` into its prefix and local name parts.
///
/// Only the first colon splits.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Validate `qualified_name` against `namespace` and split it
///
/// An empty namespace counts as none. The `xml` prefix is bound to the XML
/// namespace, and `xmlns` (as prefix or whole name) to the XMLNS namespace,
/// in both directions.
pub fn validate_and_extract(namespace: Option<&str>, qualified_name: &str) -> DomResult<QualName> {
    let namespace = namespace.filter(|ns| !ns.is_empty());
    validate_qualified_name(qualified_name)?;
    let (prefix, local) = split_qname(qualified_name);

    if prefix.is_some() && namespace.is_none() {
        return Err(DomError::Namespace(format!(
            "prefix '{}' requires a namespace",
            prefix.unwrap_or_default()
        )));
    }
    if prefix == Some("xml") && namespace != Some(XML_NAMESPACE) {
        return Err(DomError::Namespace("prefix 'xml' is bound to the XML namespace".into()));
    }
    let is_xmlns = qualified_name == "xmlns" || prefix == Some("xmlns");
    if is_xmlns && namespace != Some(XMLNS_NAMESPACE) {
        return Err(DomError::Namespace("'xmlns' is bound to the XMLNS namespace".into()));
    }
    if namespace == Some(XMLNS_NAMESPACE) && !is_xmlns {
        return Err(DomError::Namespace(
            "the XMLNS namespace requires the 'xmlns' prefix or name".into(),
        ));
    }

    Ok(QualName::new(
        namespace.map(str::to_string),
        prefix.map(str::to_string),
        local,
    ))
}
