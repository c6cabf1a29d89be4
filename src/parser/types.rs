/// One `path:line[:col]: message` entry lifted from compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDiagnostic {
    /// Path as the compiler printed it, possibly relative.
    pub file: String,
    /// 1-based.
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl RawDiagnostic {
    pub fn line0(&self) -> usize {
        self.line.saturating_sub(1)
    }
}

/// A `// ORIGLINE <path>:<line>` comment found in a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalMarker {
    /// 0-based physical line holding the marker comment.
    pub phys_line: usize,
    pub declared_path: String,
    /// 1-based, as written.
    pub declared_line: usize,
}
