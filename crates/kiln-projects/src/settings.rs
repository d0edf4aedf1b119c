//! Structured edits on the generated settings module
//!
//! The settings module is parsed with the tree-sitter Python grammar. Edits
//! locate their target through the syntax tree (a module-level assignment, or
//! a key of the mapping such an assignment holds) and splice text at the byte
//! ranges of the nodes found, so string literals, comments and nested
//! brackets never confuse the extent of a list or mapping. The rest of the
//! file is left byte-for-byte as written.
//!
//! List insertions compare against the entries already present, which makes
//! them idempotent; appended blocks are guarded only when the caller asks for
//! it.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

/// Result of a single edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The document changed
    Applied,
    /// The content was already there, nothing changed
    AlreadyPresent,
    /// The anchor the edit depends on is not in the document
    AnchorMissing,
}

impl EditOutcome {
    /// Turn a missing anchor into [`Error::MissingMarker`]
    pub fn require(self, anchor: impl fmt::Display, path: &Utf8Path) -> Result<Self> {
        match self {
            Self::AnchorMissing => Err(Error::missing_marker(anchor.to_string(), path.as_str())),
            other => Ok(other),
        }
    }
}

/// A list literal in the settings module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget<'a> {
    /// `NAME = [...]` at module level
    Setting(&'a str),
    /// `'KEY': [...]` inside the module-level `SETTING = {...}` mapping
    Key { setting: &'a str, key: &'a str },
}

impl ListTarget<'_> {
    fn setting(&self) -> &str {
        match *self {
            Self::Setting(name) => name,
            Self::Key { setting, .. } => setting,
        }
    }
}

impl fmt::Display for ListTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setting(name) => write!(f, "{}", name),
            Self::Key { setting, key } => write!(f, "{}['{}']", setting, key),
        }
    }
}

/// A string entry of a list literal
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    start: usize,
    /// Where a following entry goes: past the separating comma (and a
    /// comment on the same line), or right after the literal
    insert_at: usize,
    has_comma: bool,
}

/// A located list: position of `[` and its string entries
#[derive(Debug, Clone)]
struct ListSite {
    open: usize,
    entries: Vec<Entry>,
}

impl ListSite {
    fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|e| e.value == value)
    }
}

/// In-memory settings module, written back with [`SettingsDocument::save`]
#[derive(Debug, Clone)]
pub struct SettingsDocument {
    path: Utf8PathBuf,
    text: String,
}

impl SettingsDocument {
    /// Read the settings module at `path`
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::settings_not_found(path.as_str()));
        }
        Ok(Self {
            path: path.to_owned(),
            text: fs::read_to_string(path)?,
        })
    }

    /// Wrap text that is not (yet) on disk
    pub fn from_text(path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Write the document back to its path
    pub fn save(&self) -> Result<()> {
        debug!("Writing {}", self.path);
        fs::write(&self.path, &self.text)?;
        Ok(())
    }

    /// Insert `entry` as the first element of the list at `target`
    pub fn add_list_entry(&mut self, target: ListTarget<'_>, entry: &str) -> Result<EditOutcome> {
        let Some(site) = self.list_site(target)? else {
            return Ok(EditOutcome::AnchorMissing);
        };
        if site.contains(entry) {
            return Ok(EditOutcome::AlreadyPresent);
        }

        let indent = match site.entries.first() {
            Some(first) => line_indent(&self.text, first.start).to_string(),
            None => format!("{}    ", line_indent(&self.text, site.open)),
        };

        debug!("Adding '{}' to {}", entry, target);
        self.text
            .insert_str(site.open + 1, &format!("\n{}'{}',", indent, entry));
        Ok(EditOutcome::Applied)
    }

    /// Insert `entry` right after the existing element `after` of the list at
    /// `target`
    pub fn insert_list_entry_after(
        &mut self,
        target: ListTarget<'_>,
        after: &str,
        entry: &str,
    ) -> Result<EditOutcome> {
        let Some(site) = self.list_site(target)? else {
            return Ok(EditOutcome::AnchorMissing);
        };
        if site.contains(entry) {
            return Ok(EditOutcome::AlreadyPresent);
        }
        let Some(anchor) = site.entries.iter().find(|e| e.value == after) else {
            return Ok(EditOutcome::AnchorMissing);
        };

        let indent = line_indent(&self.text, anchor.start);
        let insertion = if anchor.has_comma {
            format!("\n{}'{}',", indent, entry)
        } else {
            format!(",\n{}'{}',", indent, entry)
        };
        self.text.insert_str(anchor.insert_at, &insertion);

        debug!("Inserted '{}' after '{}' in {}", entry, after, target);
        Ok(EditOutcome::Applied)
    }

    /// Replace the whole module-level `name = ...` assignment with `block`
    pub fn replace_assignment(&mut self, name: &str, block: &str) -> Result<EditOutcome> {
        let tree = self.parse()?;
        let Some(span) = top_level_assignment(tree.root_node(), &self.text, name)
            .map(|assignment| assignment.byte_range())
        else {
            return Ok(EditOutcome::AnchorMissing);
        };

        let block = block.trim();
        if &self.text[span.clone()] == block {
            return Ok(EditOutcome::AlreadyPresent);
        }

        debug!("Replacing {} assignment", name);
        self.text.replace_range(span, block);
        Ok(EditOutcome::Applied)
    }

    /// Append `block` at the end of the document, unconditionally
    pub fn append_block(&mut self, block: &str) -> EditOutcome {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(block);
        if !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        EditOutcome::Applied
    }

    /// Append `block` unless `marker` already occurs in the document
    pub fn append_block_unless(&mut self, marker: &str, block: &str) -> EditOutcome {
        if self.contains(marker) {
            debug!("'{}' already present, not appending", marker);
            return EditOutcome::AlreadyPresent;
        }
        self.append_block(block)
    }

    /// Replace the first occurrence of `from` with `to`
    pub fn replace_literal(&mut self, from: &str, to: &str) -> EditOutcome {
        match self.text.find(from) {
            Some(start) => {
                self.text.replace_range(start..start + from.len(), to);
                EditOutcome::Applied
            }
            None if self.contains(to) => EditOutcome::AlreadyPresent,
            None => EditOutcome::AnchorMissing,
        }
    }

    fn parse(&self) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::settings_parse(self.path.as_str(), e.to_string()))?;

        let tree = parser
            .parse(&self.text, None)
            .ok_or_else(|| Error::settings_parse(self.path.as_str(), "parser returned no tree"))?;

        if tree.root_node().has_error() {
            warn!("{} contains syntax errors, edits may be incomplete", self.path);
        }
        Ok(tree)
    }

    fn list_site(&self, target: ListTarget<'_>) -> Result<Option<ListSite>> {
        let tree = self.parse()?;
        let Some(value) = top_level_assignment(tree.root_node(), &self.text, target.setting())
            .and_then(|assignment| assignment.child_by_field_name("right"))
        else {
            return Ok(None);
        };

        let list = match target {
            ListTarget::Setting(_) => Some(value),
            ListTarget::Key { key, .. } => mapping_value(value, &self.text, key),
        };
        Ok(list
            .filter(|node| node.kind() == "list")
            .map(|node| list_site(node, &self.text)))
    }
}

/// Module-level `name = ...` assignment
fn top_level_assignment<'t>(root: Node<'t>, text: &str, name: &str) -> Option<Node<'t>> {
    let mut cursor = root.walk();
    let found = root
        .named_children(&mut cursor)
        .filter(|stmt| stmt.kind() == "expression_statement")
        .filter_map(|stmt| stmt.named_child(0))
        .filter(|node| node.kind() == "assignment")
        .find(|assignment| {
            assignment
                .child_by_field_name("left")
                .is_some_and(|left| &text[left.byte_range()] == name)
        });
    found
}

/// Value stored under the string key `key` of a dictionary literal
fn mapping_value<'t>(mapping: Node<'t>, text: &str, key: &str) -> Option<Node<'t>> {
    if mapping.kind() != "dictionary" {
        return None;
    }

    let mut cursor = mapping.walk();
    let found = mapping
        .named_children(&mut cursor)
        .filter(|pair| pair.kind() == "pair")
        .find(|pair| {
            pair.child_by_field_name("key")
                .and_then(|k| string_value(k, text))
                .is_some_and(|k| k == key)
        })
        .and_then(|pair| pair.child_by_field_name("value"));
    found
}

fn list_site(list: Node<'_>, text: &str) -> ListSite {
    let mut cursor = list.walk();
    let entries = list
        .named_children(&mut cursor)
        .filter_map(|node| {
            let value = string_value(node, text)?;
            let (insert_at, has_comma) = insertion_point(node);
            Some(Entry {
                value: value.to_string(),
                start: node.start_byte(),
                insert_at,
                has_comma,
            })
        })
        .collect();

    ListSite {
        open: list.start_byte(),
        entries,
    }
}

/// Contents of a plain string literal, between its quotes
fn string_value<'s>(node: Node<'_>, text: &'s str) -> Option<&'s str> {
    if node.kind() != "string" {
        return None;
    }

    let mut start = None;
    let mut end = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => start = Some(child.end_byte()),
            "string_end" => end = Some(child.start_byte()),
            "interpolation" => return None,
            _ => {}
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if start <= end => Some(&text[start..end]),
        _ => None,
    }
}

fn insertion_point(entry: Node<'_>) -> (usize, bool) {
    match entry.next_sibling() {
        Some(comma) if comma.kind() == "," => {
            let trailing_comment = comma.next_sibling().filter(|next| {
                next.kind() == "comment" && next.start_position().row == comma.end_position().row
            });
            (trailing_comment.unwrap_or(comma).end_byte(), true)
        }
        _ => (entry.end_byte(), false),
    }
}

/// Leading whitespace of the line containing `pos`
fn line_indent(text: &str, pos: usize) -> &str {
    let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SETTINGS;

    const INSTALLED_APPS: ListTarget<'static> = ListTarget::Setting("INSTALLED_APPS");
    const MIDDLEWARE: ListTarget<'static> = ListTarget::Setting("MIDDLEWARE");
    const SECURITY: &str = "django.middleware.security.SecurityMiddleware";

    fn doc() -> SettingsDocument {
        SettingsDocument::from_text("shop/settings.py", SETTINGS)
    }

    #[test]
    fn test_add_list_entry_at_head() {
        let mut doc = doc();
        let outcome = doc.add_list_entry(INSTALLED_APPS, "rest_framework").unwrap();

        assert_eq!(outcome, EditOutcome::Applied);
        assert!(doc
            .text()
            .contains("INSTALLED_APPS = [\n    'rest_framework',\n    'django.contrib.admin',"));
    }

    #[test]
    fn test_add_list_entry_is_idempotent() {
        let mut doc = doc();
        doc.add_list_entry(INSTALLED_APPS, "graphene_django").unwrap();
        let outcome = doc.add_list_entry(INSTALLED_APPS, "graphene_django").unwrap();

        assert_eq!(outcome, EditOutcome::AlreadyPresent);
        assert_eq!(doc.text().matches("'graphene_django'").count(), 1);
    }

    #[test]
    fn test_add_list_entry_missing_anchor() {
        let mut doc = SettingsDocument::from_text("s.py", "DEBUG = True\n");
        let outcome = doc.add_list_entry(INSTALLED_APPS, "x").unwrap();
        assert_eq!(outcome, EditOutcome::AnchorMissing);

        match outcome.require(INSTALLED_APPS, doc.path()) {
            Err(Error::MissingMarker { marker, .. }) => assert_eq!(marker, "INSTALLED_APPS"),
            other => panic!("expected missing marker, got {:?}", other),
        }
    }

    #[test]
    fn test_name_inside_a_string_is_not_an_anchor() {
        let text = "HELP = \"INSTALLED_APPS = ['x']\"\n";
        let mut doc = SettingsDocument::from_text("s.py", text);
        assert_eq!(
            doc.add_list_entry(INSTALLED_APPS, "y").unwrap(),
            EditOutcome::AnchorMissing
        );
        assert_eq!(doc.text(), text);
    }

    #[test]
    fn test_add_list_entry_to_empty_list() {
        let mut doc = SettingsDocument::from_text("s.py", "MIDDLEWARE = []\n");
        doc.add_list_entry(MIDDLEWARE, "a.B").unwrap();
        assert_eq!(doc.text(), "MIDDLEWARE = [\n    'a.B',]\n");
    }

    #[test]
    fn test_insert_after_entry() {
        let mut doc = doc();
        let outcome = doc
            .insert_list_entry_after(MIDDLEWARE, SECURITY, "whitenoise.middleware.WhiteNoiseMiddleware")
            .unwrap();

        assert_eq!(outcome, EditOutcome::Applied);
        assert!(doc.text().contains(
            "    'django.middleware.security.SecurityMiddleware',\n    'whitenoise.middleware.WhiteNoiseMiddleware',\n    'django.contrib.sessions.middleware.SessionMiddleware',"
        ));
    }

    #[test]
    fn test_insert_after_last_entry_without_comma() {
        let mut doc = SettingsDocument::from_text("s.py", "X = [\n    'a',\n    'b'\n]\n");
        doc.insert_list_entry_after(ListTarget::Setting("X"), "b", "c")
            .unwrap();
        assert_eq!(doc.text(), "X = [\n    'a',\n    'b',\n    'c',\n]\n");
    }

    #[test]
    fn test_insert_after_keeps_trailing_comment_on_its_line() {
        let mut doc = SettingsDocument::from_text("s.py", "X = [\n    'a',  # first\n    'b',\n]\n");
        doc.insert_list_entry_after(ListTarget::Setting("X"), "a", "c")
            .unwrap();
        assert_eq!(
            doc.text(),
            "X = [\n    'a',  # first\n    'c',\n    'b',\n]\n"
        );
    }

    #[test]
    fn test_insert_after_missing_entry() {
        let mut doc = doc();
        assert_eq!(
            doc.insert_list_entry_after(MIDDLEWARE, "not.There", "x.Y")
                .unwrap(),
            EditOutcome::AnchorMissing
        );
    }

    #[test]
    fn test_triple_quoted_literal_inside_list() {
        let text = "MIDDLEWARE = [\n    \"\"\"café ]\n    \"\"\",\n    'django.middleware.security.SecurityMiddleware',\n    'x.Y',\n]\n\nDEBUG = True\n";
        let mut doc = SettingsDocument::from_text("s.py", text);

        let outcome = doc
            .insert_list_entry_after(MIDDLEWARE, SECURITY, "whitenoise.middleware.WhiteNoiseMiddleware")
            .unwrap();
        assert_eq!(outcome, EditOutcome::Applied);
        doc.add_list_entry(MIDDLEWARE, "first.Middleware").unwrap();

        assert_eq!(
            doc.text(),
            "MIDDLEWARE = [\n    'first.Middleware',\n    \"\"\"café ]\n    \"\"\",\n    'django.middleware.security.SecurityMiddleware',\n    'whitenoise.middleware.WhiteNoiseMiddleware',\n    'x.Y',\n]\n\nDEBUG = True\n"
        );
    }

    #[test]
    fn test_insert_after_into_nested_dict_list() {
        let mut doc = SettingsDocument::from_text(
            "s.py",
            "REST_FRAMEWORK = {\n    'DEFAULT_AUTHENTICATION_CLASSES': [\n        'rest_framework.authentication.SessionAuthentication',\n        'rest_framework.authentication.BasicAuthentication',\n    ],\n}\n",
        );
        let target = ListTarget::Key {
            setting: "REST_FRAMEWORK",
            key: "DEFAULT_AUTHENTICATION_CLASSES",
        };
        doc.insert_list_entry_after(
            target,
            "rest_framework.authentication.BasicAuthentication",
            "rest_framework_simplejwt.authentication.JWTAuthentication",
        )
        .unwrap();
        assert!(doc.text().contains(
            "        'rest_framework.authentication.BasicAuthentication',\n        'rest_framework_simplejwt.authentication.JWTAuthentication',\n    ],"
        ));
        assert_eq!(
            target.to_string(),
            "REST_FRAMEWORK['DEFAULT_AUTHENTICATION_CLASSES']"
        );
    }

    #[test]
    fn test_replace_assignment_handles_nested_braces() {
        let mut doc = doc();
        let block = "DATABASES = {\n    'default': {\n        'ENGINE': 'django.db.backends.oracle',\n    }\n}";
        let outcome = doc.replace_assignment("DATABASES", block).unwrap();

        assert_eq!(outcome, EditOutcome::Applied);
        assert!(doc.text().contains(block));
        assert!(!doc.text().contains("sqlite3"));
        // the code after the block survives untouched
        assert!(doc.text().contains("\n\nAUTH_PASSWORD_VALIDATORS = ["));
    }

    #[test]
    fn test_replace_assignment_same_block() {
        let mut doc = doc();
        let block = "DATABASES = {\n    'default': {\n        'ENGINE': 'x',\n    }\n}";
        doc.replace_assignment("DATABASES", block).unwrap();
        assert_eq!(
            doc.replace_assignment("DATABASES", block).unwrap(),
            EditOutcome::AlreadyPresent
        );
    }

    #[test]
    fn test_replace_assignment_missing() {
        let mut doc = SettingsDocument::from_text("s.py", "DEBUG = True\n");
        assert_eq!(
            doc.replace_assignment("DATABASES", "DATABASES = {}").unwrap(),
            EditOutcome::AnchorMissing
        );
    }

    #[test]
    fn test_brackets_inside_strings_and_comments_are_ignored() {
        let text = "X = {\n    'a': '}',  # closing } here\n    'b': \"[\",\n}\nY = 1\n";
        let mut doc = SettingsDocument::from_text("s.py", text);
        doc.replace_assignment("X", "X = {}").unwrap();
        assert_eq!(doc.text(), "X = {}\nY = 1\n");
    }

    #[test]
    fn test_append_block_guarded_and_unguarded() {
        let mut doc = SettingsDocument::from_text("s.py", "DEBUG = True");
        doc.append_block("\nFOO = 1\n");
        doc.append_block("\nFOO = 1\n");
        assert_eq!(doc.text().matches("FOO = 1").count(), 2);

        assert_eq!(
            doc.append_block_unless("FOO =", "\nFOO = 2\n"),
            EditOutcome::AlreadyPresent
        );
        assert_eq!(doc.append_block_unless("BAR =", "\nBAR = 1\n"), EditOutcome::Applied);
        assert!(doc.text().starts_with("DEBUG = True\n\nFOO = 1\n"));
    }

    #[test]
    fn test_replace_literal() {
        let mut doc = doc();
        assert_eq!(
            doc.replace_literal("'DIRS': [],", "'DIRS': [BASE_DIR / 'templates'],"),
            EditOutcome::Applied
        );
        assert_eq!(
            doc.replace_literal("'DIRS': [],", "'DIRS': [BASE_DIR / 'templates'],"),
            EditOutcome::AlreadyPresent
        );
        assert_eq!(doc.replace_literal("nothing", "else"), EditOutcome::AnchorMissing);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SettingsDocument::load(Utf8Path::new("/definitely/not/here/settings.py"));
        assert!(matches!(result, Err(Error::SettingsNotFound { .. })));
    }
}
