use std::fmt;
use std::path::PathBuf;

use crate::ast::SourceSpan;
use crate::error::CompilationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub level: DiagnosticLevel,
    pub path: Option<PathBuf>,
    pub span: Option<SourceSpan>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Error => "error",
        };
        match (&self.path, self.span) {
            (Some(path), Some(span)) => write!(
                f,
                "{}:{}:{}: {level}: {}",
                path.display(),
                span.line,
                span.column,
                self.message
            ),
            (Some(path), None) => write!(f, "{}: {level}: {}", path.display(), self.message),
            _ => write!(f, "{level}: {}", self.message),
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push_error_with_span<S: Into<String>>(
        &mut self,
        message: S,
        path: Option<PathBuf>,
        span: Option<SourceSpan>,
    ) {
        self.entries.push(Diagnostic {
            message: message.into(),
            level: DiagnosticLevel::Error,
            path,
            span,
        });
    }

    /// Records `error` at the element it was raised against.
    pub fn report(&mut self, error: &CompilationError) {
        let (path, span) = match error.element() {
            Some(element) => (element.path.clone(), element.span),
            None => (None, None),
        };
        self.push_error_with_span(error.message(), path, span);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|diagnostic| diagnostic.level == DiagnosticLevel::Error)
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }
}
