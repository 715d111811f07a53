//! Chunk construction for the code map.
//!
//! Every file yields exactly one chunk spanning the whole text.

use super::model::{CodeChunk, CodeFile};

/// Build the id of a chunk: `<filePath>#<index>`.
#[must_use]
pub fn chunk_id(file_path: &str, index: usize) -> String {
    format!("{file_path}#{index}")
}

/// Count line-break separated segments, treating `\r\n` like `\n`.
///
/// An empty text is one (empty) line and a trailing newline opens a final
/// empty line, so `"a\n"` counts as 2.
#[must_use]
pub fn count_lines(content: &str) -> usize {
    content.split('\n').count()
}

/// Build the single chunk covering a whole file.
#[must_use]
pub fn chunk_file(file: &CodeFile) -> CodeChunk {
    CodeChunk {
        id: chunk_id(&file.path, 0),
        file_path: file.path.clone(),
        start_line: 1,
        end_line: count_lines(&file.content),
        text: file.content.clone(),
    }
}
