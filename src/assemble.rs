// Hunk assembly: turning a classified edit script into the result shape
// callers consume.
//
// Common runs and classified changed regions interleave in script order.
// When intraline highlighting is requested, regular changed hunks separated
// by exactly one unchanged bridge line (blank or a block opener) are
// combined first (the interior line travels inside the hunk), then each
// changed hunk gets its skip/mark spans. Statistics are taken from the
// uncombined regions, so interior common lines never count.
//
// Context handling carries a deliberate quirk: a numeric context preference
// is accepted but ignored, and common runs are always emitted untruncated.
// Whole-file context only changes what an unmodified file returns (its full
// content instead of an empty diff). `Hunk::Common::skipped` exists for the
// truncating renderer that would sit on top and is never populated here.

use std::ops::Range;

use crate::intraline::{self, IntralineEdit};
use crate::rebase::Classification;
use crate::script::{Edit, EditScript};
use crate::sequence::LineSequence;

/// How much unchanged context the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextMode {
    /// A line count. Accepted for compatibility and ignored: common runs
    /// come back whole.
    Lines(u32),
    /// Return the entire file, including an unmodified one.
    WholeFile,
}

impl Default for ContextMode {
    fn default() -> Self {
        ContextMode::Lines(3)
    }
}

/// File-level shape of the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Rewrite,
}

/// Per-side file metadata. Absent entirely when the side has no file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    /// Display line count: parsed lines plus the synthetic trailing empty
    /// line of a newline-terminated file.
    pub total_line_count: usize,
}

/// One region of the assembled diff, in display lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hunk {
    Common {
        lines: Vec<String>,
        /// Lines elided by a truncating renderer. Never set by assembly.
        skipped: Option<usize>,
    },
    Changed {
        lines_a: Vec<String>,
        lines_b: Vec<String>,
        edits_a: Vec<IntralineEdit>,
        edits_b: Vec<IntralineEdit>,
        due_to_rebase: bool,
    },
}

/// The assembled diff of one file between two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub content: Vec<Hunk>,
    pub meta_a: Option<FileMeta>,
    pub meta_b: Option<FileMeta>,
    pub change_type: ChangeType,
    /// Inserted line count over authored hunks; `None` when zero.
    pub lines_inserted: Option<usize>,
    /// Deleted line count over authored hunks; `None` when zero.
    pub lines_deleted: Option<usize>,
    /// True when rebase classification could not run for lack of base
    /// content and every hunk was marked authored.
    pub classification_degraded: bool,
}

pub(crate) struct AssembleParams<'a> {
    pub a: Option<&'a LineSequence>,
    pub b: Option<&'a LineSequence>,
    pub name_a: Option<&'a str>,
    pub name_b: Option<&'a str>,
    pub change_type: ChangeType,
    pub intraline: bool,
    pub context: ContextMode,
}

enum Raw {
    Common { a: Range<usize>, b: Range<usize> },
    Changed {
        a: Range<usize>,
        b: Range<usize>,
        due_to_rebase: bool,
    },
}

pub(crate) fn assemble(
    params: &AssembleParams<'_>,
    script: &EditScript,
    classification: &Classification,
) -> DiffResult {
    let empty = LineSequence::from_str("");
    let seq_a = params.a.unwrap_or(&empty);
    let seq_b = params.b.unwrap_or(&empty);
    let da = seq_a.display_lines();
    let db = seq_b.display_lines();

    let meta_a = params.a.map(|seq| FileMeta {
        name: params.name_a.unwrap_or_default().to_owned(),
        total_line_count: seq.display_line_count(),
    });
    let meta_b = params.b.map(|seq| FileMeta {
        name: params.name_b.unwrap_or_default().to_owned(),
        total_line_count: seq.display_line_count(),
    });

    if script.is_all_common() {
        let content = match params.context {
            ContextMode::WholeFile if !db.is_empty() => vec![Hunk::Common {
                lines: db.iter().map(|s| (*s).to_owned()).collect(),
                skipped: None,
            }],
            _ => Vec::new(),
        };
        return DiffResult {
            content,
            meta_a,
            meta_b,
            change_type: params.change_type,
            lines_inserted: None,
            lines_deleted: None,
            classification_degraded: classification.degraded,
        };
    }

    // Interleave common runs with the classified changed regions.
    let mut raw: Vec<Raw> = Vec::with_capacity(script.ops().len());
    let mut next_changed = 0usize;
    for op in script.ops() {
        if op.is_common() {
            raw.push(Raw::Common {
                a: op.a_range(),
                b: op.b_range(),
            });
        } else {
            let hunk = classification.hunks[next_changed];
            next_changed += 1;
            debug_assert_eq!(hunk.edit, Edit::from_op(op));
            raw.push(Raw::Changed {
                a: op.a_range(),
                b: op.b_range(),
                due_to_rebase: hunk.due_to_rebase,
            });
        }
    }

    let synthetic_a = synthetic_index(seq_a);
    let synthetic_b = synthetic_index(seq_b);
    let (mut inserted, mut deleted) = (0usize, 0usize);
    for r in &raw {
        let Raw::Changed {
            a,
            b,
            due_to_rebase: false,
        } = r
        else {
            continue;
        };
        let ca = countable(&da, a.clone(), synthetic_a);
        let cb = countable(&db, b.clone(), synthetic_b);
        // A hunk that only changed newline presence has identical countable
        // content on both sides and contributes nothing.
        if ca == cb {
            continue;
        }
        deleted += ca.len();
        inserted += cb.len();
    }

    let raw = if params.intraline {
        combine(raw, &da, &db)
    } else {
        raw
    };

    let content = raw
        .into_iter()
        .map(|r| match r {
            Raw::Common { b, .. } => Hunk::Common {
                lines: db[b].iter().map(|s| (*s).to_owned()).collect(),
                skipped: None,
            },
            Raw::Changed {
                a,
                b,
                due_to_rebase,
            } => {
                let lines_a: Vec<String> = da[a].iter().map(|s| (*s).to_owned()).collect();
                let lines_b: Vec<String> = db[b].iter().map(|s| (*s).to_owned()).collect();
                let (edits_a, edits_b) = if params.intraline {
                    let text_a = intraline::join_hunk_text(&lines_a);
                    let text_b = intraline::join_hunk_text(&lines_b);
                    intraline::edit_spans(&text_a, &text_b)
                } else {
                    (Vec::new(), Vec::new())
                };
                Hunk::Changed {
                    lines_a,
                    lines_b,
                    edits_a,
                    edits_b,
                    due_to_rebase,
                }
            }
        })
        .collect();

    DiffResult {
        content,
        meta_a,
        meta_b,
        change_type: params.change_type,
        lines_inserted: (inserted > 0).then_some(inserted),
        lines_deleted: (deleted > 0).then_some(deleted),
        classification_degraded: classification.degraded,
    }
}

/// Display index of the synthetic trailing empty line, if the sequence has
/// one.
fn synthetic_index(seq: &LineSequence) -> Option<usize> {
    (seq.ends_with_newline() && !seq.is_empty()).then(|| seq.display_line_count() - 1)
}

fn countable<'a>(
    display: &[&'a str],
    range: Range<usize>,
    synthetic: Option<usize>,
) -> Vec<&'a str> {
    range
        .filter(|i| Some(*i) != synthetic)
        .map(|i| display[i])
        .collect()
}

/// Combine regular changed hunks whose single interior unchanged display
/// line is a bridge line (blank or a block opener); the interior line moves
/// inside the hunk. Hunks separated by an ordinary content line stay
/// distinct, and rebase hunks never take part.
fn combine(raw: Vec<Raw>, da: &[&str], db: &[&str]) -> Vec<Raw> {
    let mut out: Vec<Raw> = Vec::with_capacity(raw.len());
    for r in raw {
        if let Raw::Changed {
            a,
            b,
            due_to_rebase: false,
        } = &r
        {
            let n = out.len();
            let gap_bridges = n >= 2
                && matches!(
                    &out[n - 2],
                    Raw::Changed {
                        due_to_rebase: false,
                        ..
                    }
                )
                && match &out[n - 1] {
                    Raw::Common { a: ca, b: cb } => {
                        ca.len() == 1 && bridges_hunks(da[ca.start]) && bridges_hunks(db[cb.start])
                    }
                    Raw::Changed { .. } => false,
                };
            if gap_bridges {
                out.pop();
                if let Some(Raw::Changed { a: pa, b: pb, .. }) = out.last_mut() {
                    pa.end = a.end;
                    pb.end = b.end;
                }
                continue;
            }
        }
        out.push(r);
    }
    out
}

/// Interior common lines that may bridge two changed hunks: blank lines and
/// block openers.
fn bridges_hunks(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == "{"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
