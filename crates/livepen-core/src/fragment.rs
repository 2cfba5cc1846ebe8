//! Source fragments and the in-memory store that holds them
//!
//! The playground edits exactly three fragments: markup (HTML), style (CSS)
//! and script (JavaScript). The store keeps each fragment's text together
//! with a dirty flag that is raised on every edit and cleared by a render.

use serde::{Deserialize, Serialize};

/// Sample markup shown on first launch
pub const DEFAULT_MARKUP: &str = "<!DOCTYPE html>
<html>
<head>
  <title>My Code</title>
</head>
<body>
  <h1>Hello, World!</h1>
  <p>Start coding here</p>
</body>
</html>";

/// Sample stylesheet shown on first launch
pub const DEFAULT_STYLE: &str = "body {
  font-family: Arial, sans-serif;
  background-color: #f0f0f0;
  margin: 0;
  padding: 20px;
}

h1 {
  color: #333;
}";

/// Sample script shown on first launch
pub const DEFAULT_SCRIPT: &str = "// Your JavaScript code here
console.log('Hello from JavaScript!');

// You can access DOM elements like this:
// const heading = document.querySelector('h1');
// heading.textContent = 'JavaScript is working!';";

/// Which of the three editable sources a fragment is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Markup,
    Style,
    Script,
}

impl FragmentKind {
    /// All kinds in tab order
    pub const ALL: [FragmentKind; 3] = [Self::Markup, Self::Style, Self::Script];

    /// Tab label
    pub fn label(self) -> &'static str {
        match self {
            Self::Markup => "HTML",
            Self::Style => "CSS",
            Self::Script => "JS",
        }
    }

    /// Short identifier used for element ids and serialized field names
    pub fn id(self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Style => "css",
            Self::Script => "js",
        }
    }

    /// Sample content for a fresh session
    pub fn default_content(self) -> &'static str {
        match self {
            Self::Markup => DEFAULT_MARKUP,
            Self::Style => DEFAULT_STYLE,
            Self::Script => DEFAULT_SCRIPT,
        }
    }
}

/// The three fragment texts travelling together
///
/// This is the payload of snippets, auto-save records and share links.
/// Missing fields deserialize as empty text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundle {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

impl SourceBundle {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// The sample content every session starts with
    pub fn defaults() -> Self {
        Self::new(DEFAULT_MARKUP, DEFAULT_STYLE, DEFAULT_SCRIPT)
    }

    pub fn get(&self, kind: FragmentKind) -> &str {
        match kind {
            FragmentKind::Markup => &self.html,
            FragmentKind::Style => &self.css,
            FragmentKind::Script => &self.js,
        }
    }
}

/// One editable source text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    content: String,
    dirty: bool,
}

impl Fragment {
    fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            dirty: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the fragment changed since the last render
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// In-memory holder of the current markup, style and script
///
/// No validation happens here: malformed markup or script is accepted as-is
/// and dealt with by the preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStore {
    markup: Fragment,
    style: Fragment,
    script: Fragment,
}

impl SourceStore {
    /// Create a store seeded with the sample content
    pub fn new() -> Self {
        Self::from_bundle(SourceBundle::defaults())
    }

    /// Create a store holding the given sources, all clean
    pub fn from_bundle(bundle: SourceBundle) -> Self {
        Self {
            markup: Fragment::new(bundle.html),
            style: Fragment::new(bundle.css),
            script: Fragment::new(bundle.js),
        }
    }

    fn slot(&self, kind: FragmentKind) -> &Fragment {
        match kind {
            FragmentKind::Markup => &self.markup,
            FragmentKind::Style => &self.style,
            FragmentKind::Script => &self.script,
        }
    }

    fn slot_mut(&mut self, kind: FragmentKind) -> &mut Fragment {
        match kind {
            FragmentKind::Markup => &mut self.markup,
            FragmentKind::Style => &mut self.style,
            FragmentKind::Script => &mut self.script,
        }
    }

    pub fn get(&self, kind: FragmentKind) -> &str {
        self.slot(kind).content()
    }

    /// Replace a fragment's text and mark it dirty
    pub fn set(&mut self, kind: FragmentKind, text: impl Into<String>) {
        let slot = self.slot_mut(kind);
        slot.content = text.into();
        slot.dirty = true;
    }

    pub fn is_dirty(&self, kind: FragmentKind) -> bool {
        self.slot(kind).is_dirty()
    }

    pub fn any_dirty(&self) -> bool {
        FragmentKind::ALL.iter().any(|&kind| self.is_dirty(kind))
    }

    /// Clear every dirty flag (called once a render has consumed the sources)
    pub fn mark_clean(&mut self) {
        for kind in FragmentKind::ALL {
            self.slot_mut(kind).dirty = false;
        }
    }

    /// Snapshot all three fragments
    pub fn bundle(&self) -> SourceBundle {
        SourceBundle::new(
            self.markup.content.clone(),
            self.style.content.clone(),
            self.script.content.clone(),
        )
    }

    /// Replace all three fragments, marking each dirty
    pub fn load_bundle(&mut self, bundle: SourceBundle) {
        self.set(FragmentKind::Markup, bundle.html);
        self.set(FragmentKind::Style, bundle.css);
        self.set(FragmentKind::Script, bundle.js);
    }

    /// Whether any fragment differs from the sample content
    pub fn is_modified(&self) -> bool {
        FragmentKind::ALL
            .iter()
            .any(|&kind| self.get(kind) != kind.default_content())
    }
}

impl Default for SourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_holds_defaults() {
        let store = SourceStore::new();
        assert_eq!(store.get(FragmentKind::Markup), DEFAULT_MARKUP);
        assert_eq!(store.get(FragmentKind::Style), DEFAULT_STYLE);
        assert_eq!(store.get(FragmentKind::Script), DEFAULT_SCRIPT);
        assert!(!store.any_dirty());
        assert!(!store.is_modified());
    }

    #[test]
    fn test_set_marks_only_that_fragment_dirty() {
        let mut store = SourceStore::new();
        store.set(FragmentKind::Style, "p { margin: 0 }");

        assert!(store.is_dirty(FragmentKind::Style));
        assert!(!store.is_dirty(FragmentKind::Markup));
        assert!(!store.is_dirty(FragmentKind::Script));
        assert!(store.is_modified());

        store.mark_clean();
        assert!(!store.any_dirty());
        assert_eq!(store.get(FragmentKind::Style), "p { margin: 0 }");
    }

    #[test]
    fn test_malformed_content_is_accepted() {
        let mut store = SourceStore::new();
        store.set(FragmentKind::Markup, "<div><span");
        store.set(FragmentKind::Script, "function (");
        assert_eq!(store.get(FragmentKind::Markup), "<div><span");
        assert_eq!(store.get(FragmentKind::Script), "function (");
    }

    #[test]
    fn test_load_bundle_replaces_everything() {
        let mut store = SourceStore::new();
        store.load_bundle(SourceBundle::new("<p>a</p>", "", "x()"));

        assert_eq!(store.bundle(), SourceBundle::new("<p>a</p>", "", "x()"));
        assert!(store.is_dirty(FragmentKind::Style));
    }

    #[test]
    fn test_restoring_defaults_is_not_modified() {
        let mut store = SourceStore::new();
        store.set(FragmentKind::Script, "alert(1)");
        store.set(FragmentKind::Script, DEFAULT_SCRIPT);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_bundle_missing_fields_default_to_empty() {
        let bundle: SourceBundle = serde_json::from_str(r#"{"html":"<b>x</b>"}"#).unwrap();
        assert_eq!(bundle, SourceBundle::new("<b>x</b>", "", ""));
    }
}
