use crate::frontend::diagnostics::SourceLocation;

/// Byte-offset to line/column mapping for one source file.
#[derive(Debug, Clone)]
pub struct SourceText {
    file: String,
    len: usize,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(file: impl Into<String>, source: &str) -> Self {
        // 0-based byte offsets where a new line starts
        let mut line_starts = vec![0usize];
        for (i, b) in source.as_bytes().iter().enumerate() {
            if *b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            file: file.into(),
            len: source.len(),
            line_starts,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Map a byte span (start, length) to a 1-based SourceLocation.
    /// Out-of-range spans clamp safely.
    pub fn location_from_span(&self, start: usize, length: usize) -> SourceLocation {
        let start = start.min(self.len);
        let length = length.min(self.len.saturating_sub(start));
        let line_idx = match self.line_starts.binary_search(&start) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = *self.line_starts.get(line_idx).unwrap_or(&0);
        SourceLocation {
            file: self.file.clone(),
            line: line_idx + 1,
            column: start.saturating_sub(line_start) + 1,
            length,
        }
    }

    pub fn location_from_range(&self, start: usize, end: usize) -> SourceLocation {
        self.location_from_span(start, end.saturating_sub(start))
    }
}
