//! Line-oriented text assembly shared by the generators.

use crate::config::GeneratorConfig;

/// Accumulates generated lines at a given nesting depth.
#[derive(Debug)]
pub struct CodeWriter<'c> {
    output: String,
    config: &'c GeneratorConfig,
}

impl<'c> CodeWriter<'c> {
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self {
            output: String::new(),
            config,
        }
    }

    /// Write `text` on its own line, indented `depth` levels.
    pub fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        self.output.push_str(&self.config.indent(depth));
        self.output.push_str(text.as_ref());
        self.output.push('\n');
    }

    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Append an already rendered fragment.
    pub fn fragment(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// C++ visibility sections, written only when they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    fn label(self) -> &'static str {
        match self {
            Visibility::Public => "public:",
            Visibility::Protected => "protected:",
            Visibility::Private => "private:",
        }
    }
}

/// Tracks the current visibility of a class body being written.
#[derive(Debug)]
pub struct VisibilityTracker {
    current: Visibility,
}

impl VisibilityTracker {
    /// A class body that starts out `public:`.
    pub fn public() -> Self {
        Self {
            current: Visibility::Public,
        }
    }

    /// Switch to `next`, writing its label if it differs from the current one.
    pub fn switch(&mut self, w: &mut CodeWriter<'_>, next: Visibility) {
        if self.current != next {
            self.current = next;
            w.line(0, next.label());
            w.blank();
        }
    }
}

/// Opening lines of the nested scopes, outermost first.
pub fn open_scopes(w: &mut CodeWriter<'_>, scopes: &[String]) {
    for scope in scopes {
        w.line(0, format!("namespace {scope} {{"));
    }
    w.blank();
}

/// Closing braces for `count` scopes, on one line.
pub fn close_scopes(w: &mut CodeWriter<'_>, count: usize) {
    w.line(0, "} ".repeat(count));
}
