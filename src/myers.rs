// Shortest-edit-script alignment (Myers' greedy O(ND) algorithm).
//
// Element type and equality are injected so the same search serves both
// line-level and character-level diffs. Output is a run-length step list;
// callers turn it into whatever script shape they need.
//
// Ambiguity policy: the common prefix and suffix are consumed before the
// search runs, which anchors the alignment at the start of the input (the
// first common run is always maximal). Inside the search, ties between
// equally short alignments resolve the same way in the forward pass and
// the backtrack, so output is deterministic.

/// One run of the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// `n` aligned equal elements.
    Common(usize),
    /// `a` elements of A replaced by `b` elements of B (either may be 0).
    Changed { a: usize, b: usize },
}

/// Align `a` against `b` under `eq`, returning run-length steps that cover
/// both slices completely. Consecutive steps of the same flavor are merged.
pub(crate) fn diff_slices<T, F>(a: &[T], b: &[T], eq: F) -> Vec<Step>
where
    F: Fn(&T, &T) -> bool,
{
    let mut prefix = 0;
    while prefix < a.len() && prefix < b.len() && eq(&a[prefix], &b[prefix]) {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < a.len() - prefix
        && suffix < b.len() - prefix
        && eq(&a[a.len() - 1 - suffix], &b[b.len() - 1 - suffix])
    {
        suffix += 1;
    }

    let mut steps = Vec::new();
    if prefix > 0 {
        steps.push(Step::Common(prefix));
    }
    append_merged(
        &mut steps,
        search(&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix], &eq),
    );
    if suffix > 0 {
        append_merged(&mut steps, vec![Step::Common(suffix)]);
    }
    steps
}

fn append_merged(steps: &mut Vec<Step>, tail: Vec<Step>) {
    for step in tail {
        match (steps.last_mut(), step) {
            (Some(Step::Common(n)), Step::Common(m)) => *n += m,
            (Some(Step::Changed { a, b }), Step::Changed { a: na, b: nb }) => {
                *a += na;
                *b += nb;
            }
            _ => steps.push(step),
        }
    }
}

fn search<T, F>(a: &[T], b: &[T], eq: &F) -> Vec<Step>
where
    F: Fn(&T, &T) -> bool,
{
    let (n, m) = (a.len() as isize, b.len() as isize);
    if n == 0 && m == 0 {
        return Vec::new();
    }
    if n == 0 || m == 0 {
        return vec![Step::Changed {
            a: n as usize,
            b: m as usize,
        }];
    }

    // Forward pass: furthest-reaching x per diagonal k, one snapshot per d.
    let offset = (n + m) as usize;
    let mut v = vec![0isize; 2 * offset + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'outer: for d in 0..=(n + m) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let idx = (offset as isize + k) as usize;
            let mut x = if k == -d {
                v[idx + 1]
            } else if k == d {
                v[idx - 1] + 1
            } else {
                let x_del = v[idx - 1] + 1;
                let x_ins = v[idx + 1];
                if x_del > x_ins { x_del } else { x_ins }
            };
            let mut y = x - k;
            while x < n && y < m && eq(&a[x as usize], &b[y as usize]) {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                break 'outer;
            }
            k += 2;
        }
    }

    // Backtrack from (n, m) through the snapshots.
    let (mut x, mut y) = (n, m);
    let mut rev: Vec<Step> = Vec::new();
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d {
            k + 1
        } else if k == d {
            k - 1
        } else {
            let x_del = v[(offset as isize + k - 1) as usize] + 1;
            let x_ins = v[(offset as isize + k + 1) as usize];
            if x_del > x_ins { k - 1 } else { k + 1 }
        };
        let prev_x = v[(offset as isize + prev_k) as usize];
        let prev_y = prev_x - prev_k;

        let snake = (x - prev_x).min(y - prev_y).max(0);
        if snake > 0 {
            rev.push(Step::Common(snake as usize));
            x -= snake;
            y -= snake;
        }
        if d > 0 {
            if x - 1 == prev_x && y == prev_y {
                rev.push(Step::Changed { a: 1, b: 0 });
            } else {
                rev.push(Step::Changed { a: 0, b: 1 });
            }
            x = prev_x;
            y = prev_y;
        }
    }
    debug_assert!(x == 0 && y == 0, "backtrack did not reach the origin");

    rev.reverse();
    let mut steps = Vec::new();
    append_merged(&mut steps, rev);
    steps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
