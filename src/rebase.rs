// Rebase hunk classification.
//
// A patch-set diff (old patch set A vs. new patch set B) mixes two kinds
// of changed regions: edits the author made, and edits that entered the
// file only because the change was rebased onto a new base. The bases'
// own diff (old base vs. new base) describes the latter — but in base
// coordinates. Classification projects every parent edit into patch-set
// coordinates by walking the side scripts (old base vs. A, new base
// vs. B) and accumulating the line-count delta of side edits that lie
// strictly before it. A parent edit overlapped by a side edit was touched
// by the author on that side and stops being a rebase candidate.
//
// An A/B edit is then due to rebase iff its four projected coordinates
// equal a surviving parent edit's and its content on both sides still
// matches the parent delta under the active comparator: the same textual
// substitution, at the same place, untouched by the author.

use std::collections::HashMap;

use crate::line_diff::{self, DisplayLine, WhitespaceMode};
use crate::script::{Edit, EditScript};
use crate::sequence::LineSequence;

/// Base-commit contents on both sides of the rebase.
#[derive(Debug, Clone)]
pub struct RebaseSources {
    pub old_base: LineSequence,
    pub new_base: LineSequence,
}

/// One changed region of the A/B script with its rebase attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedHunk {
    pub edit: Edit,
    pub due_to_rebase: bool,
}

/// Classifier output: the A/B script's changed regions in order, plus
/// whether classification ran degraded (no base content available).
#[derive(Debug, Clone)]
pub struct Classification {
    pub hunks: Vec<ClassifiedHunk>,
    pub degraded: bool,
}

/// Classification for a comparison whose sides share a base: nothing can
/// be due to rebase, and nothing is degraded about saying so.
pub fn all_regular(ab: &EditScript) -> Classification {
    Classification {
        hunks: merge_touching(ab.changed_edits())
            .into_iter()
            .map(|edit| ClassifiedHunk {
                edit,
                due_to_rebase: false,
            })
            .collect(),
        degraded: false,
    }
}

/// Classify the changed regions of `ab` (old patch set vs. new patch set).
///
/// Without `sources` the classifier fails open: every hunk is treated as
/// authored and the result is flagged degraded.
pub fn classify(
    ab: &EditScript,
    old_patchset: &LineSequence,
    new_patchset: &LineSequence,
    sources: Option<&RebaseSources>,
    mode: WhitespaceMode,
) -> Classification {
    let merged = merge_touching(ab.changed_edits());

    let Some(sources) = sources else {
        log::warn!("base content unavailable; marking all hunks as authored");
        return Classification {
            hunks: merged
                .into_iter()
                .map(|edit| ClassifiedHunk {
                    edit,
                    due_to_rebase: false,
                })
                .collect(),
            degraded: true,
        };
    };

    let parent = line_diff::diff_lines(&sources.old_base, &sources.new_base, mode);
    let side_a = line_diff::diff_lines(&sources.old_base, old_patchset, mode);
    let side_b = line_diff::diff_lines(&sources.new_base, new_patchset, mode);

    // Projected patch-set coordinates -> original parent edit.
    let projected = project_parent_edits(
        &parent.changed_edits(),
        &side_a.changed_edits(),
        &side_b.changed_edits(),
    );

    let da_old_base = line_diff::display_lines(&sources.old_base);
    let db_new_base = line_diff::display_lines(&sources.new_base);
    let da_ps = line_diff::display_lines(old_patchset);
    let db_ps = line_diff::display_lines(new_patchset);

    let hunks = merged
        .into_iter()
        .map(|edit| {
            let due_to_rebase = projected.get(&edit).is_some_and(|parent_edit| {
                ranges_match(
                    &da_ps,
                    edit.begin_a..edit.end_a,
                    &da_old_base,
                    parent_edit.begin_a..parent_edit.end_a,
                    mode,
                ) && ranges_match(
                    &db_ps,
                    edit.begin_b..edit.end_b,
                    &db_new_base,
                    parent_edit.begin_b..parent_edit.end_b,
                    mode,
                )
            });
            ClassifiedHunk {
                edit,
                due_to_rebase,
            }
        })
        .collect();

    Classification {
        hunks,
        degraded: false,
    }
}

/// Merge changed regions that directly touch (share a boundary with zero
/// common lines between them) or overlap. Regions separated by at least
/// one unchanged line stay distinct. The line differ already coalesces
/// touching ops, so this only fires on scripts built elsewhere.
fn merge_touching(edits: Vec<Edit>) -> Vec<Edit> {
    let mut out: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(prev) = out.last_mut()
            && edit.begin_a <= prev.end_a
            && edit.begin_b <= prev.end_b
        {
            prev.end_a = prev.end_a.max(edit.end_a);
            prev.end_b = prev.end_b.max(edit.end_b);
            continue;
        }
        out.push(edit);
    }
    out
}

/// Project parent edits (base coordinates) into patch-set coordinates.
///
/// For each side, side-script edits ending at or before the parent range
/// shift it by their length delta; a side edit overlapping the range
/// means the author touched it, and the parent edit is discarded.
fn project_parent_edits(
    parent_edits: &[Edit],
    side_a: &[Edit],
    side_b: &[Edit],
) -> HashMap<Edit, Edit> {
    let mut projected = HashMap::new();
    for parent in parent_edits {
        let Some((begin_a, end_a)) = shift_range(parent.begin_a, parent.end_a, side_a, |e| {
            (e.begin_a, e.end_a, e.len_b() as isize - e.len_a() as isize)
        }) else {
            continue;
        };
        let Some((begin_b, end_b)) = shift_range(parent.begin_b, parent.end_b, side_b, |e| {
            (e.begin_a, e.end_a, e.len_b() as isize - e.len_a() as isize)
        }) else {
            continue;
        };
        projected.insert(
            Edit {
                begin_a,
                end_a,
                begin_b,
                end_b,
            },
            *parent,
        );
    }
    projected
}

/// Shift `[begin, end)` through one side script. `coords` extracts, per
/// side edit, its range on the shared (base) side and its length delta.
/// Returns `None` when a side edit overlaps the range.
fn shift_range(
    begin: usize,
    end: usize,
    side_edits: &[Edit],
    coords: impl Fn(&Edit) -> (usize, usize, isize),
) -> Option<(usize, usize)> {
    let mut delta = 0isize;
    for side in side_edits {
        let (side_begin, side_end, side_delta) = coords(side);
        if side_end <= begin {
            delta += side_delta;
        } else if side_begin < end {
            // Strict overlap; a side edit merely touching the boundary
            // does not disturb the region.
            return None;
        }
    }
    let begin = begin.checked_add_signed(delta)?;
    let end = end.checked_add_signed(delta)?;
    Some((begin, end))
}

fn ranges_match(
    lines_x: &[DisplayLine<'_>],
    range_x: std::ops::Range<usize>,
    lines_y: &[DisplayLine<'_>],
    range_y: std::ops::Range<usize>,
    mode: WhitespaceMode,
) -> bool {
    if range_x.len() != range_y.len() {
        return false;
    }
    range_x
        .zip(range_y)
        .all(|(x, y)| line_diff::lines_equal(&lines_x[x], &lines_y[y], mode))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
