// Character-level highlighting inside changed hunks.
//
// The hunk's lines on each side are joined with `\n` into one text (the
// synthetic empty line that stands for a trailing newline contributes the
// final `\n`), and the two texts are aligned character by character. The
// result per side is an alternating skip/mark span list over that side's
// characters; marks may cover a newline when a line edit and a
// trailing-newline change land in the same hunk.

use crate::myers::{self, Step};

/// One span of a side's intraline highlighting: `skip` unchanged
/// characters followed by `mark` highlighted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntralineEdit {
    pub skip: usize,
    pub mark: usize,
}

impl IntralineEdit {
    pub fn pair(self) -> (usize, usize) {
        (self.skip, self.mark)
    }
}

/// Join one side of a hunk into the text the character alignment runs on.
pub(crate) fn join_hunk_text(lines: &[String]) -> String {
    lines.join("\n")
}

/// Compute the skip/mark spans for a changed hunk's two texts.
///
/// Zero-length spans are dropped and a trailing all-skip span is omitted,
/// so an empty list means "nothing highlighted on this side".
pub fn edit_spans(text_a: &str, text_b: &str) -> (Vec<IntralineEdit>, Vec<IntralineEdit>) {
    let chars_a: Vec<char> = text_a.chars().collect();
    let chars_b: Vec<char> = text_b.chars().collect();
    let steps = myers::diff_slices(&chars_a, &chars_b, |x, y| x == y);

    let mut edits_a = Vec::new();
    let mut edits_b = Vec::new();
    let (mut skip_a, mut skip_b) = (0usize, 0usize);
    for step in steps {
        match step {
            Step::Common(n) => {
                skip_a += n;
                skip_b += n;
            }
            Step::Changed { a, b } => {
                if a > 0 {
                    edits_a.push(IntralineEdit {
                        skip: skip_a,
                        mark: a,
                    });
                    skip_a = 0;
                }
                if b > 0 {
                    edits_b.push(IntralineEdit {
                        skip: skip_b,
                        mark: b,
                    });
                    skip_b = 0;
                }
            }
        }
    }
    (edits_a, edits_b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
