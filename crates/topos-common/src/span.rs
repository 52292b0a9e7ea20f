use serde::Serialize;

/// Byte range into source text; start inclusive, end exclusive.
///
/// Tokens and AST nodes carry spans instead of line/column pairs; a
/// diagnostic converts a span through [`LineIndex`] only when it is
/// actually rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// A zero-length span at a single offset.
    pub fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both operands.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Newline positions of a source file, for span-to-line/column lookup.
///
/// Built once per file. A lookup counts the newlines strictly before
/// the offset: that count is the 0-based line, and the character after
/// the last such newline starts the column reckoning.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of every `\n` in the source, ascending.
    newlines: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter(|&(_, byte)| byte == b'\n')
            .map(|(i, _)| i as u32)
            .collect();
        Self { newlines }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    ///
    /// A newline belongs to the line it terminates.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let preceding = self.newlines.partition_point(|&nl| nl < offset);
        let line_start = match preceding {
            0 => 0,
            n => self.newlines[n - 1] + 1,
        };
        ((preceding as u32) + 1, offset - line_start + 1)
    }

    /// The number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.newlines.len() + 1
    }
}
