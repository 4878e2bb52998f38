use serde::{Deserialize, Serialize};

/// Position of a syntax node inside its file. Lines and columns are 1-based; a zeroed span
/// means the front-end did not record a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}
