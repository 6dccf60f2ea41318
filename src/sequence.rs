// Logical line splitting per Git's newline convention.
//
// A file is a sequence of lines terminated by `\n`. The terminator belongs
// to the line but is never stored in it. A file that does not end in `\n`
// still contributes its trailing fragment as a final line; a zero-byte file
// has no lines at all.
//
// For diff output the engine works in "display lines": the parsed lines
// plus one synthetic empty line at the end when the file ends with a
// newline. That synthetic line is what lets a trailing-newline change show
// up as real hunk content instead of an invisible byte.

use thiserror::Error;

/// Declared character set of a file's content.
///
/// The set is intentionally small: UTF-8 is the norm, Latin-1 is the total
/// fallback (every byte sequence decodes). Content declared UTF-8 that does
/// not decode is surfaced as [`DecodeError`] so the caller can report the
/// file as binary/undiffable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("content is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// An ordered sequence of logical lines plus the trailing-newline flag.
///
/// Invariants: no line contains `\n`; `lines` is empty only for a zero-byte
/// file; a file ending without a trailing newline still yields a final line
/// equal to the unterminated fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
    ends_with_newline: bool,
}

impl LineSequence {
    /// Split raw content declared to be in `charset` into lines.
    pub fn from_bytes(content: &[u8], charset: Charset) -> Result<Self, DecodeError> {
        let text = match charset {
            Charset::Utf8 => match std::str::from_utf8(content) {
                Ok(text) => std::borrow::Cow::Borrowed(text),
                Err(e) => {
                    return Err(DecodeError::InvalidUtf8 {
                        offset: e.valid_up_to(),
                    });
                }
            },
            Charset::Latin1 => {
                std::borrow::Cow::Owned(content.iter().map(|&b| b as char).collect::<String>())
            }
        };
        Ok(Self::from_str(&text))
    }

    /// Split already-decoded text into lines.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        if text.is_empty() {
            return Self {
                lines: Vec::new(),
                ends_with_newline: false,
            };
        }
        let ends_with_newline = text.ends_with('\n');
        let body = if ends_with_newline {
            &text[..text.len() - 1]
        } else {
            text
        };
        Self {
            lines: body.split('\n').map(str::to_owned).collect(),
            ends_with_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn ends_with_newline(&self) -> bool {
        self.ends_with_newline
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of parsed lines, without the synthetic trailing empty line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of display lines: parsed lines plus the synthetic empty line
    /// that stands in for a trailing newline.
    pub fn display_line_count(&self) -> usize {
        self.lines.len() + usize::from(self.ends_with_newline && !self.lines.is_empty())
    }

    /// The display form: parsed lines followed by one empty line when the
    /// file ends with a newline.
    pub fn display_lines(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        if self.ends_with_newline && !self.lines.is_empty() {
            out.push("");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_has_no_lines() {
        let seq = LineSequence::from_str("");
        assert!(seq.is_empty());
        assert_eq!(seq.line_count(), 0);
        assert_eq!(seq.display_line_count(), 0);
        assert!(!seq.ends_with_newline());
    }

    #[test]
    fn terminated_file_keeps_lines_without_newline() {
        let seq = LineSequence::from_str("Line 1\nLine 2\nLine 3\n");
        assert_eq!(seq.lines(), &["Line 1", "Line 2", "Line 3"]);
        assert!(seq.ends_with_newline());
        assert_eq!(seq.line_count(), 3);
        assert_eq!(seq.display_line_count(), 4);
        assert_eq!(seq.display_lines(), vec!["Line 1", "Line 2", "Line 3", ""]);
    }

    #[test]
    fn unterminated_fragment_becomes_last_line() {
        let seq = LineSequence::from_str("Line 1\nLine 2\nLine 3");
        assert_eq!(seq.lines(), &["Line 1", "Line 2", "Line 3"]);
        assert!(!seq.ends_with_newline());
        assert_eq!(seq.display_line_count(), 3);
        assert_eq!(seq.display_lines(), vec!["Line 1", "Line 2", "Line 3"]);
    }

    #[test]
    fn lone_newline_is_one_empty_line() {
        let seq = LineSequence::from_str("\n");
        assert_eq!(seq.lines(), &[""]);
        assert!(seq.ends_with_newline());
        assert_eq!(seq.display_line_count(), 2);
    }

    #[test]
    fn interior_empty_lines_are_preserved() {
        let seq = LineSequence::from_str("a\n\nb\n");
        assert_eq!(seq.lines(), &["a", "", "b"]);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = LineSequence::from_bytes(b"ok\n\xFF\xFE", Charset::Utf8).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8 { offset: 3 });
    }

    #[test]
    fn latin1_decodes_any_bytes() {
        let seq = LineSequence::from_bytes(b"caf\xE9\n", Charset::Latin1).unwrap();
        assert_eq!(seq.lines(), &["café"]);
    }

    #[test]
    fn utf8_roundtrip() {
        let seq = LineSequence::from_bytes("äöü\nßẞ".as_bytes(), Charset::Utf8).unwrap();
        assert_eq!(seq.lines(), &["äöü", "ßẞ"]);
        assert!(!seq.ends_with_newline());
    }
}
