//! Pre-generation checks on the project answers

use crate::error::{Error, Result};
use unicode_ident::{is_xid_continue, is_xid_start};

/// Check that `name` is a valid Python identifier.
///
/// The generated settings module lives in a package named after the slug, so
/// the slug has to be importable: an XID_Start character or underscore
/// followed by XID_Continue characters.
pub fn validate_identifier(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::invalid_identifier(name))
    }
}

/// Whether `name` is a valid Python identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || is_xid_start(first) => chars.all(is_xid_continue),
        _ => false,
    }
}

/// Whether a string still carries an unrendered `{{ ... }}` template variable
pub fn has_placeholder(value: &str) -> bool {
    match value.find("{{") {
        Some(start) => value[start..].contains("}}"),
        None => false,
    }
}
