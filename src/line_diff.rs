// Line-level diff: Myers alignment over display lines.
//
// The comparison predicate is injected into the alignment; it decides
// whether two lines count as equal but never changes which lines are
// reported. Two policies live in the predicate:
//
//   - whitespace mode (byte-exact through fully collapsed), and
//   - the line terminator: every display line has one except the final
//     display line of its sequence. Under `ConsiderAll` a trailing
//     fragment therefore never equals the same text followed by a
//     newline, which is what turns a trailing-newline change into one
//     `Replace` pairing `[last, ""]` against `[last]` instead of a
//     dangling zero-content hunk. When the newline change rides along
//     with an edit higher up, the untouched last content line is split
//     back out afterwards (`split_trailing_newline_hunk`). Under the
//     ignoring modes the terminator is just trailing whitespace.

use crate::myers::{self, Step};
use crate::script::{EditScript, ScriptBuilder};
use crate::sequence::LineSequence;

/// How whitespace differences participate in line equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WhitespaceMode {
    /// Byte-exact comparison, including the line terminator.
    #[default]
    ConsiderAll,
    /// Trailing whitespace (and the terminator) is ignored.
    IgnoreTrailing,
    /// Leading and trailing whitespace is ignored.
    IgnoreLeadingAndTrailing,
    /// All whitespace is ignored.
    IgnoreAll,
}

/// One display line: its text plus whether a terminator follows it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisplayLine<'a> {
    pub text: &'a str,
    pub terminated: bool,
}

pub(crate) fn display_lines(seq: &LineSequence) -> Vec<DisplayLine<'_>> {
    let lines = seq.display_lines();
    let n = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| DisplayLine {
            text,
            terminated: i + 1 < n,
        })
        .collect()
}

pub(crate) fn lines_equal(a: &DisplayLine<'_>, b: &DisplayLine<'_>, mode: WhitespaceMode) -> bool {
    match mode {
        WhitespaceMode::ConsiderAll => a.text == b.text && a.terminated == b.terminated,
        WhitespaceMode::IgnoreTrailing => a.text.trim_end() == b.text.trim_end(),
        WhitespaceMode::IgnoreLeadingAndTrailing => a.text.trim() == b.text.trim(),
        WhitespaceMode::IgnoreAll => {
            let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            strip(a.text) == strip(b.text)
        }
    }
}

/// Diff two sequences under `mode`, producing an edit script over display
/// lines. The script's ranges partition both display sequences exactly.
pub fn diff_lines(a: &LineSequence, b: &LineSequence, mode: WhitespaceMode) -> EditScript {
    let da = display_lines(a);
    let db = display_lines(b);
    let script = diff_display(&da, &db, mode);
    if mode == WhitespaceMode::ConsiderAll && a.ends_with_newline() != b.ends_with_newline() {
        split_trailing_newline_hunk(script, b.ends_with_newline(), &da, &db)
    } else {
        script
    }
}

/// Under `ConsiderAll` a terminator-only difference makes the last content
/// line compare unequal, so an edit just above it merges with the
/// trailing-newline change into a single hunk. When that last content line
/// was not actually touched, pull it back out as a common line and leave
/// the synthetic empty line as its own one-sided hunk. A diff consisting
/// of nothing but the newline change keeps the single paired hunk.
fn split_trailing_newline_hunk(
    script: EditScript,
    added: bool,
    da: &[DisplayLine<'_>],
    db: &[DisplayLine<'_>],
) -> EditScript {
    let Some(op) = script.ops().last() else {
        return script;
    };
    if op.is_common() {
        return script;
    }
    let ra = op.a_range();
    let rb = op.b_range();
    if ra.end != da.len() || rb.end != db.len() {
        return script;
    }
    // The newline-terminated side carries the synthetic empty line in
    // addition to its last content line.
    let (tail_a, tail_b) = if added { (1, 2) } else { (2, 1) };
    if ra.len() < tail_a || rb.len() < tail_b {
        return script;
    }
    let (shrunk_a, shrunk_b) = (ra.len() - tail_a, rb.len() - tail_b);
    if shrunk_a == 0 && shrunk_b == 0 {
        return script;
    }
    if da[ra.end - tail_a].text != db[rb.end - tail_b].text {
        return script;
    }

    let ops = script.ops();
    let mut builder = ScriptBuilder::new();
    for op in &ops[..ops.len() - 1] {
        if op.is_common() {
            builder.common(op.a_range().len());
        } else {
            builder.changed(op.a_range().len(), op.b_range().len());
        }
    }
    builder.changed(shrunk_a, shrunk_b);
    builder.common(1);
    if added {
        builder.changed(0, 1);
    } else {
        builder.changed(1, 0);
    }
    builder.finish()
}

pub(crate) fn diff_display(
    da: &[DisplayLine<'_>],
    db: &[DisplayLine<'_>],
    mode: WhitespaceMode,
) -> EditScript {
    let steps = myers::diff_slices(da, db, |x, y| lines_equal(x, y, mode));
    let mut builder = ScriptBuilder::new();
    for step in steps {
        match step {
            Step::Common(n) => builder.common(n),
            Step::Changed { a, b } => builder.changed(a, b),
        }
    }
    builder.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::EditOp;

    fn seq(text: &str) -> LineSequence {
        LineSequence::from_str(text)
    }

    fn diff(a: &str, b: &str, mode: WhitespaceMode) -> EditScript {
        let script = diff_lines(&seq(a), &seq(b), mode);
        script.validate().unwrap();
        script
    }

    #[test]
    fn identical_files_are_one_common_op() {
        let script = diff("a\nb\nc\n", "a\nb\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(script.ops(), &[EditOp::Common { a: 0..4, b: 0..4 }]);
    }

    #[test]
    fn replaced_line_in_the_middle() {
        let script = diff("a\nb\nc\n", "a\nB\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Replace { a: 1..2, b: 1..2 },
                EditOp::Common { a: 2..4, b: 2..4 },
            ]
        );
    }

    #[test]
    fn pure_insert_and_delete() {
        let script = diff("a\nc\n", "a\nb\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Insert { at: 1, b: 1..2 },
                EditOp::Common { a: 1..3, b: 2..4 },
            ]
        );

        let script = diff("a\nb\nc\n", "a\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Delete { a: 1..2, at: 1 },
                EditOp::Common { a: 2..4, b: 1..3 },
            ]
        );
    }

    #[test]
    fn growing_replace_pairs_unequal_line_counts() {
        let script = diff("a\nx\nz\n", "a\ny1\ny2\nz\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Replace { a: 1..2, b: 1..3 },
                EditOp::Common { a: 2..4, b: 3..5 },
            ]
        );
    }

    #[test]
    fn deleted_trailing_newline_is_one_replace() {
        let script = diff("a\nb\nc\n", "a\nb\nc", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..2, b: 0..2 },
                EditOp::Replace { a: 2..4, b: 2..3 },
            ]
        );
    }

    #[test]
    fn added_trailing_newline_is_one_replace() {
        let script = diff("a\nb\nc", "a\nb\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..2, b: 0..2 },
                EditOp::Replace { a: 2..3, b: 2..4 },
            ]
        );
    }

    #[test]
    fn untouched_last_line_is_split_from_an_added_newline_hunk() {
        // The edit sits on the second-to-last line; the last content line
        // stays common and the synthetic empty line is its own insert.
        let script = diff("a\nb\nc", "a\nB\nc\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Replace { a: 1..2, b: 1..2 },
                EditOp::Common { a: 2..3, b: 2..3 },
                EditOp::Insert { at: 3, b: 3..4 },
            ]
        );
    }

    #[test]
    fn untouched_last_line_is_split_from_a_deleted_newline_hunk() {
        let script = diff("a\nB\nc\n", "a\nb\nc", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Replace { a: 1..2, b: 1..2 },
                EditOp::Common { a: 2..3, b: 2..3 },
                EditOp::Delete { a: 3..4, at: 3 },
            ]
        );
    }

    #[test]
    fn modified_last_line_keeps_the_newline_change_in_one_hunk() {
        let script = diff("a\nb\nc", "a\nb\nC\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..2, b: 0..2 },
                EditOp::Replace { a: 2..3, b: 2..4 },
            ]
        );
    }

    #[test]
    fn trailing_newline_change_collapses_when_whitespace_ignored() {
        let script = diff("a\nb\nc", "a\nb\nc\n", WhitespaceMode::IgnoreAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..3, b: 0..3 },
                EditOp::Insert { at: 3, b: 3..4 },
            ]
        );
    }

    #[test]
    fn trailing_whitespace_ignored_on_request() {
        let script = diff("a  \nb\n", "a\nb\n", WhitespaceMode::IgnoreTrailing);
        assert!(script.is_all_common());
        let script = diff("a  \nb\n", "a\nb\n", WhitespaceMode::ConsiderAll);
        assert!(!script.is_all_common());
    }

    #[test]
    fn leading_whitespace_needs_the_wider_mode() {
        let script = diff("  a\nb\n", "a\nb\n", WhitespaceMode::IgnoreTrailing);
        assert!(!script.is_all_common());
        let script = diff("  a\nb\n", "a\nb\n", WhitespaceMode::IgnoreLeadingAndTrailing);
        assert!(script.is_all_common());
    }

    #[test]
    fn interior_whitespace_needs_ignore_all() {
        let script = diff("a b\n", "ab\n", WhitespaceMode::IgnoreLeadingAndTrailing);
        assert!(!script.is_all_common());
        let script = diff("a b\n", "ab\n", WhitespaceMode::IgnoreAll);
        assert!(script.is_all_common());
    }

    #[test]
    fn empty_against_content_is_pure_insert() {
        let script = diff("", "a\nb\n", WhitespaceMode::ConsiderAll);
        assert_eq!(script.ops(), &[EditOp::Insert { at: 0, b: 0..3 }]);
    }

    #[test]
    fn insertion_is_anchored_after_the_common_prefix() {
        // Both alignments are minimal; the one keeping the first common run
        // longest wins, so the insert lands after the repeated line.
        let script = diff("a\na\nb\n", "a\na\na\nb\n", WhitespaceMode::ConsiderAll);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..2, b: 0..2 },
                EditOp::Insert { at: 2, b: 2..3 },
                EditOp::Common { a: 2..4, b: 3..5 },
            ]
        );
    }

    #[test]
    fn scripts_reconstruct_both_sides() {
        let a = seq("one\ntwo\nthree\nfour\n");
        let b = seq("one\n2\nthree\nfour\nfive");
        let script = diff_lines(&a, &b, WhitespaceMode::ConsiderAll);
        script.validate().unwrap();

        let da = a.display_lines();
        let db = b.display_lines();
        let mut rebuilt_a: Vec<&str> = Vec::new();
        let mut rebuilt_b: Vec<&str> = Vec::new();
        for op in script.ops() {
            rebuilt_a.extend(op.a_range().map(|i| da[i]));
            rebuilt_b.extend(op.b_range().map(|i| db[i]));
        }
        assert_eq!(rebuilt_a, da);
        assert_eq!(rebuilt_b, db);
    }
}
