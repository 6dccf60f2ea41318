// Edit-script model shared by the line differ and the rebase classifier.
//
// A script is an ordered list of ops whose A-side ranges partition
// `[0, len_a)` and whose B-side ranges partition `[0, len_b)`, in order,
// with no gaps or overlaps. Ops carry half-open line ranges; `Insert` and
// `Delete` additionally record the position on the side they do not cover
// so the partition stays explicit.

use std::ops::Range;

/// One aligned region of a line-level diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Identical lines on both sides.
    Common { a: Range<usize>, b: Range<usize> },
    /// Lines of A replaced by lines of B; the side lengths may differ.
    Replace { a: Range<usize>, b: Range<usize> },
    /// Lines of B inserted at position `at` of A.
    Insert { at: usize, b: Range<usize> },
    /// Lines of A deleted at position `at` of B.
    Delete { a: Range<usize>, at: usize },
}

impl EditOp {
    pub fn a_range(&self) -> Range<usize> {
        match self {
            EditOp::Common { a, .. } | EditOp::Replace { a, .. } | EditOp::Delete { a, .. } => {
                a.clone()
            }
            EditOp::Insert { at, .. } => *at..*at,
        }
    }

    pub fn b_range(&self) -> Range<usize> {
        match self {
            EditOp::Common { b, .. } | EditOp::Replace { b, .. } | EditOp::Insert { b, .. } => {
                b.clone()
            }
            EditOp::Delete { at, .. } => *at..*at,
        }
    }

    pub fn is_common(&self) -> bool {
        matches!(self, EditOp::Common { .. })
    }
}

/// A changed region in four-coordinate form, used when a script has to be
/// compared against or projected into another script's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
    pub begin_a: usize,
    pub end_a: usize,
    pub begin_b: usize,
    pub end_b: usize,
}

impl Edit {
    pub fn from_op(op: &EditOp) -> Self {
        let a = op.a_range();
        let b = op.b_range();
        Edit {
            begin_a: a.start,
            end_a: a.end,
            begin_b: b.start,
            end_b: b.end,
        }
    }

    pub fn len_a(&self) -> usize {
        self.end_a - self.begin_a
    }

    pub fn len_b(&self) -> usize {
        self.end_b - self.begin_b
    }
}

/// Ordered edit ops covering two line sequences completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
    len_a: usize,
    len_b: usize,
}

/// Partition-invariant violation found by [`EditScript::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvariantViolation {
    pub detail: String,
}

impl EditScript {
    pub fn new(ops: Vec<EditOp>, len_a: usize, len_b: usize) -> Self {
        Self { ops, len_a, len_b }
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn len_a(&self) -> usize {
        self.len_a
    }

    pub fn len_b(&self) -> usize {
        self.len_b
    }

    /// True when the script contains no changed region at all.
    pub fn is_all_common(&self) -> bool {
        self.ops.iter().all(EditOp::is_common)
    }

    /// The non-common ops in four-coordinate form.
    pub fn changed_edits(&self) -> Vec<Edit> {
        self.ops
            .iter()
            .filter(|op| !op.is_common())
            .map(Edit::from_op)
            .collect()
    }

    /// Check the partition invariant: op ranges are contiguous, in order,
    /// and together cover `[0, len_a)` and `[0, len_b)` exactly.
    pub fn validate(&self) -> Result<(), ScriptInvariantViolation> {
        let mut pos_a = 0usize;
        let mut pos_b = 0usize;
        for (i, op) in self.ops.iter().enumerate() {
            let a = op.a_range();
            let b = op.b_range();
            if a.start != pos_a || b.start != pos_b {
                return Err(ScriptInvariantViolation {
                    detail: format!(
                        "op {i} starts at ({}, {}), expected ({pos_a}, {pos_b})",
                        a.start, b.start
                    ),
                });
            }
            if a.end < a.start || b.end < b.start {
                return Err(ScriptInvariantViolation {
                    detail: format!("op {i} has a negative-length range"),
                });
            }
            if a.is_empty() && b.is_empty() {
                return Err(ScriptInvariantViolation {
                    detail: format!("op {i} covers no lines on either side"),
                });
            }
            pos_a = a.end;
            pos_b = b.end;
        }
        if pos_a != self.len_a || pos_b != self.len_b {
            return Err(ScriptInvariantViolation {
                detail: format!(
                    "script covers ({pos_a}, {pos_b}) of ({}, {})",
                    self.len_a, self.len_b
                ),
            });
        }
        Ok(())
    }
}

/// Incremental script construction with normalization: adjacent common runs
/// merge, and directly touching non-common ops coalesce into one `Replace`.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    ops: Vec<EditOp>,
    pos_a: usize,
    pos_b: usize,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `n` aligned common lines.
    pub fn common(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let (a, b) = (self.pos_a..self.pos_a + n, self.pos_b..self.pos_b + n);
        self.pos_a += n;
        self.pos_b += n;
        if let Some(EditOp::Common { a: pa, b: pb }) = self.ops.last_mut() {
            pa.end = a.end;
            pb.end = b.end;
            return;
        }
        self.ops.push(EditOp::Common { a, b });
    }

    /// Append a changed region consuming `n_a` lines of A and `n_b` of B.
    pub fn changed(&mut self, n_a: usize, n_b: usize) {
        if n_a == 0 && n_b == 0 {
            return;
        }
        let a = self.pos_a..self.pos_a + n_a;
        let b = self.pos_b..self.pos_b + n_b;
        self.pos_a = a.end;
        self.pos_b = b.end;

        // Coalesce with a directly preceding changed op.
        if let Some(prev) = self.ops.last_mut()
            && !prev.is_common()
        {
            let pa = prev.a_range();
            let pb = prev.b_range();
            *prev = Self::classify(pa.start..a.end, pb.start..b.end);
            return;
        }
        self.ops.push(Self::classify(a, b));
    }

    fn classify(a: Range<usize>, b: Range<usize>) -> EditOp {
        match (a.is_empty(), b.is_empty()) {
            (true, false) => EditOp::Insert { at: a.start, b },
            (false, true) => EditOp::Delete { a, at: b.start },
            _ => EditOp::Replace { a, b },
        }
    }

    pub fn finish(self) -> EditScript {
        EditScript::new(self.ops, self.pos_a, self.pos_b)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_merges_adjacent_common_runs() {
        let mut b = ScriptBuilder::new();
        b.common(2);
        b.common(3);
        let script = b.finish();
        assert_eq!(script.ops(), &[EditOp::Common { a: 0..5, b: 0..5 }]);
        script.validate().unwrap();
    }

    #[test]
    fn builder_coalesces_touching_changed_ops() {
        let mut b = ScriptBuilder::new();
        b.changed(1, 0);
        b.changed(0, 2);
        let script = b.finish();
        assert_eq!(script.ops(), &[EditOp::Replace { a: 0..1, b: 0..2 }]);
    }

    #[test]
    fn builder_classifies_insert_and_delete() {
        let mut b = ScriptBuilder::new();
        b.common(1);
        b.changed(0, 1);
        b.common(1);
        b.changed(1, 0);
        let script = b.finish();
        assert_eq!(
            script.ops(),
            &[
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Insert { at: 1, b: 1..2 },
                EditOp::Common { a: 1..2, b: 2..3 },
                EditOp::Delete { a: 2..3, at: 3 },
            ]
        );
        script.validate().unwrap();
    }

    #[test]
    fn validate_rejects_gaps() {
        let script = EditScript::new(
            vec![
                EditOp::Common { a: 0..1, b: 0..1 },
                EditOp::Replace { a: 2..3, b: 2..3 },
            ],
            3,
            3,
        );
        assert!(script.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_coverage() {
        let script = EditScript::new(vec![EditOp::Common { a: 0..2, b: 0..2 }], 3, 2);
        assert!(script.validate().is_err());
    }

    #[test]
    fn empty_script_is_all_common() {
        let script = ScriptBuilder::new().finish();
        assert!(script.is_all_common());
        script.validate().unwrap();
    }
}
