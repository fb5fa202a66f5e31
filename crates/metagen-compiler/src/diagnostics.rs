//! Diagnostics collected while emitting a module.
//!
//! Emission never stops at the first problem: unsupported type shapes are
//! reported as unimplemented features and per-declaration failures are
//! recorded here so the remaining declarations still get their metadata.

use std::fmt::Write as _;

use metagen_core::{Colors, DeclId, Program};

use crate::EmitError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A type shape or conformance the engine cannot express yet.
    Unimplemented,
    /// Building a declaration's metadata failed.
    Emission,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Declaration being emitted when the problem was found.
    pub decl: Option<DeclId>,
}

impl Diagnostic {
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Unimplemented,
            severity: Severity::Error,
            message: message.into(),
            decl: None,
        }
    }

    pub fn emission(decl: DeclId, error: &EmitError) -> Self {
        Self {
            kind: DiagnosticKind::Emission,
            severity: Severity::Error,
            message: error.to_string(),
            decl: Some(decl),
        }
    }

    pub fn in_decl(mut self, decl: DeclId) -> Self {
        self.decl.get_or_insert(decl);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = Diagnostic>) {
        self.0.extend(iter);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_error()).count()
    }

    /// One line per diagnostic: `error[Decl]: message`.
    pub fn render(&self, program: &Program, colors: Colors) -> String {
        let c = colors;
        let mut out = String::new();
        for diagnostic in &self.0 {
            let severity = diagnostic.severity.as_str();
            let color = match diagnostic.severity {
                Severity::Error => c.red,
                Severity::Warning => c.blue,
            };
            write!(out, "{color}{severity}{}", c.reset).unwrap();
            if let Some(decl) = diagnostic.decl {
                write!(out, "[{}]", program.decl_name(decl)).unwrap();
            }
            writeln!(out, ": {}", diagnostic.message).unwrap();
        }
        out
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
