// Rebase classification through the public engine API: which hunks of a
// patch-set diff are attributed to the rebase and which to the author.

use revdiff::assemble::{DiffResult, Hunk};
use revdiff::engine::{self, BaseContext, DiffRequest};
use revdiff::rebase::RebaseSources;
use revdiff::sequence::LineSequence;

/// "Line 1" .. "Line 100", newline-terminated, with edits applied.
fn file(edits: &[(&str, &[&str])]) -> LineSequence {
    let mut lines: Vec<String> = (1..=100).map(|i| format!("Line {i}")).collect();
    for (from, to) in edits {
        let idx = lines
            .iter()
            .position(|l| l == from)
            .unwrap_or_else(|| panic!("line {from:?} not present"));
        lines.splice(idx..idx + 1, to.iter().map(|s| (*s).to_owned()));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    LineSequence::from_str(&text)
}

fn diff(
    old: &LineSequence,
    new: &LineSequence,
    old_base: &LineSequence,
    new_base: &LineSequence,
) -> DiffResult {
    let request = DiffRequest {
        name_a: Some("file.txt".into()),
        name_b: Some("file.txt".into()),
        old: Some(old.clone()),
        new: Some(new.clone()),
        bases: BaseContext::Rebased(RebaseSources {
            old_base: old_base.clone(),
            new_base: new_base.clone(),
        }),
        ..DiffRequest::default()
    };
    engine::compute_diff(&request).unwrap()
}

fn rebase_flags(result: &DiffResult) -> Vec<bool> {
    result
        .content
        .iter()
        .filter_map(|h| match h {
            Hunk::Changed { due_to_rebase, .. } => Some(*due_to_rebase),
            Hunk::Common { .. } => None,
        })
        .collect()
}

#[test]
fn rebase_hunks_at_start_middle_and_end() {
    let old_base = file(&[]);
    let new_base = file(&[
        ("Line 1", &["Line one"]),
        ("Line 50", &["Line fifty"]),
        ("Line 100", &["Line one hundred"]),
    ]);
    let old = old_base.clone();
    let new = file(&[
        ("Line 1", &["Line one"]),
        ("Line 25", &["Line twenty five"]),
        ("Line 50", &["Line fifty"]),
        ("Line 100", &["Line one hundred"]),
    ]);

    let result = diff(&old, &new, &old_base, &new_base);
    assert!(!result.classification_degraded);
    assert_eq!(rebase_flags(&result), vec![true, false, true, true]);
    // Only the authored hunk counts.
    assert_eq!(result.lines_inserted, Some(1));
    assert_eq!(result.lines_deleted, Some(1));
}

#[test]
fn author_deletion_shifts_later_rebase_hunks_into_place() {
    let old_base = file(&[]);
    let new_base = file(&[("Line 2", &["Line two"]), ("Line 50", &["Line fifty"])]);
    // The author dropped Line 24 in both patch sets, moving everything
    // after it up by one line relative to the bases.
    let old = file(&[("Line 24", &[])]);
    let new = file(&[
        ("Line 2", &["Line two"]),
        ("Line 24", &[]),
        ("Line 50", &["Line fifty"]),
        ("Line 60", &["Line sixty"]),
    ]);

    let result = diff(&old, &new, &old_base, &new_base);
    assert_eq!(rebase_flags(&result), vec![true, true, false]);
}

#[test]
fn author_insertion_in_the_new_patch_set_moves_rebase_hunks_down() {
    let old_base = file(&[]);
    let new_base = file(&[("Line 40", &["Line forty"])]);
    let old = old_base.clone();
    let new = file(&[
        ("Line 1", &["Line zero", "Line 1"]),
        ("Line 40", &["Line forty"]),
    ]);

    let result = diff(&old, &new, &old_base, &new_base);
    assert_eq!(rebase_flags(&result), vec![false, true]);
    assert_eq!(result.lines_inserted, Some(1));
    assert_eq!(result.lines_deleted, None);
}

#[test]
fn author_override_of_the_rebased_region_is_authored() {
    let old_base = file(&[]);
    let new_base = file(&[("Line 40", &["Line forty"])]);
    let old = old_base.clone();
    let new = file(&[("Line 40", &["Line changed after the rebase"])]);

    let result = diff(&old, &new, &old_base, &new_base);
    assert_eq!(rebase_flags(&result), vec![false]);
    assert_eq!(result.lines_inserted, Some(1));
    assert_eq!(result.lines_deleted, Some(1));
}

#[test]
fn partial_author_overlap_makes_the_merged_hunk_authored() {
    let old_base = file(&[]);
    let new_base = file(&[
        ("Line 40", &["Line forty"]),
        ("Line 41", &["Line forty one"]),
    ]);
    let old = old_base.clone();
    // The author reverted line 41 and touched line 39, producing one
    // merged hunk that no longer matches the parent delta.
    let new = file(&[
        ("Line 39", &["Line thirty nine"]),
        ("Line 40", &["Line forty"]),
    ]);

    let result = diff(&old, &new, &old_base, &new_base);
    assert_eq!(rebase_flags(&result), vec![false]);
}

#[test]
fn pure_rebase_diff_contributes_no_statistics() {
    let old_base = file(&[]);
    let new_base = file(&[
        ("Line 10", &["Line ten"]),
        ("Line 90", &["Line ninety"]),
    ]);
    let old = old_base.clone();
    let new = new_base.clone();

    let result = diff(&old, &new, &old_base, &new_base);
    assert_eq!(rebase_flags(&result), vec![true, true]);
    assert_eq!(result.lines_inserted, None);
    assert_eq!(result.lines_deleted, None);
}

#[test]
fn unavailable_bases_degrade_to_authored_hunks() {
    let old = file(&[]);
    let new = file(&[("Line 40", &["Line forty"])]);
    let request = DiffRequest {
        name_a: Some("file.txt".into()),
        name_b: Some("file.txt".into()),
        old: Some(old),
        new: Some(new),
        bases: BaseContext::Unavailable,
        ..DiffRequest::default()
    };
    let result = engine::compute_diff(&request).unwrap();
    assert!(result.classification_degraded);
    assert_eq!(rebase_flags(&result), vec![false]);
    assert_eq!(result.lines_inserted, Some(1));
}
