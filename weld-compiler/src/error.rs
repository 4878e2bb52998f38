use std::path::PathBuf;

use crate::ast::SourceSpan;

/// The declaration an error is reported against. Syntax declarations carry their file and
/// span, symbol declarations only a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorElement {
    pub description: String,
    pub path: Option<PathBuf>,
    pub span: Option<SourceSpan>,
}

impl ErrorElement {
    pub fn located(description: impl Into<String>, path: PathBuf, span: SourceSpan) -> Self {
        Self {
            description: description.into(),
            path: Some(path),
            span: span.is_known().then_some(span),
        }
    }

    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            path: None,
            span: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CompilationError {
    message: String,
    element: Option<ErrorElement>,
}

impl CompilationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
        }
    }

    pub fn with_element(mut self, element: ErrorElement) -> Self {
        self.element = Some(element);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn element(&self) -> Option<&ErrorElement> {
        self.element.as_ref()
    }
}

pub type CompilationResult<T> = Result<T, CompilationError>;
