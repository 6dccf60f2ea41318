// Orchestration: one request in, one assembled diff out.
//
// The engine wires the pipeline together: line-level alignment under the
// requested whitespace mode, rebase classification against the base
// context, then hunk assembly with statistics and optional intraline
// spans. It owns the public request/preferences types and the error
// taxonomy; degraded classification is a result flag, not an error.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::assemble::{self, AssembleParams, ChangeType, ContextMode, DiffResult};
use crate::line_diff::{diff_lines, WhitespaceMode};
use crate::rebase::{self, RebaseSources};
use crate::sequence::{DecodeError, LineSequence};

#[derive(Debug, Error)]
pub enum DiffError {
    /// File content could not be decoded; the file is not diffable as text.
    #[error("failed to decode file content: {0}")]
    Decode(#[from] DecodeError),
    /// The computed script violated its own range bookkeeping. Fatal for
    /// the request and never cached.
    #[error("diff computation produced an inconsistent script: {detail}")]
    Computation { detail: String },
}

/// Relationship between the two patch sets' base commits.
#[derive(Debug, Clone, Default)]
pub enum BaseContext {
    /// Both patch sets sit on the same base; no hunk can be due to rebase.
    #[default]
    Same,
    /// The change was rebased between the patch sets; classify against the
    /// two base contents.
    Rebased(RebaseSources),
    /// Base content could not be loaded. Every hunk is reported as
    /// authored and the result is flagged degraded.
    Unavailable,
}

/// Whether the file kept its name between the revisions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenameState {
    #[default]
    Unchanged,
    Renamed { old_name: String },
    Copied { source_name: String },
}

/// User-facing knobs that change what a diff looks like. The fingerprint
/// is part of the cache key: two requests share a cached result only when
/// every preference matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiffPreferences {
    pub whitespace: WhitespaceMode,
    pub intraline: bool,
    pub context: ContextMode,
}

impl DiffPreferences {
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Everything needed to diff one file between two revisions. A `None`
/// side means the file does not exist there.
#[derive(Debug, Clone, Default)]
pub struct DiffRequest {
    pub name_a: Option<String>,
    pub name_b: Option<String>,
    pub old: Option<LineSequence>,
    pub new: Option<LineSequence>,
    pub bases: BaseContext,
    pub rename: RenameState,
    pub prefs: DiffPreferences,
}

pub fn compute_diff(request: &DiffRequest) -> Result<DiffResult, DiffError> {
    let empty = LineSequence::from_str("");
    let old = request.old.as_ref().unwrap_or(&empty);
    let new = request.new.as_ref().unwrap_or(&empty);

    let script = diff_lines(old, new, request.prefs.whitespace);
    script
        .validate()
        .map_err(|violation| DiffError::Computation {
            detail: violation.detail,
        })?;

    let classification = match &request.bases {
        BaseContext::Same => rebase::all_regular(&script),
        BaseContext::Rebased(sources) => {
            rebase::classify(&script, old, new, Some(sources), request.prefs.whitespace)
        }
        BaseContext::Unavailable => {
            rebase::classify(&script, old, new, None, request.prefs.whitespace)
        }
    };

    let result = assemble::assemble(
        &AssembleParams {
            a: request.old.as_ref(),
            b: request.new.as_ref(),
            name_a: request.name_a.as_deref(),
            name_b: request.name_b.as_deref(),
            change_type: change_type(request, &script),
            intraline: request.prefs.intraline,
            context: request.prefs.context,
        },
        &script,
        &classification,
    );
    log::debug!(
        "diff computed: {} hunks, +{:?}/-{:?}, change type {:?}",
        result.content.len(),
        result.lines_inserted,
        result.lines_deleted,
        result.change_type
    );
    Ok(result)
}

fn change_type(request: &DiffRequest, script: &crate::script::EditScript) -> ChangeType {
    match (&request.old, &request.new) {
        (None, Some(_)) => match request.rename {
            RenameState::Copied { .. } => ChangeType::Copied,
            _ => ChangeType::Added,
        },
        (Some(_), None) => ChangeType::Deleted,
        (Some(old), Some(_)) => match request.rename {
            RenameState::Renamed { .. } => ChangeType::Renamed,
            RenameState::Copied { .. } => ChangeType::Copied,
            RenameState::Unchanged => {
                // No surviving common line in a non-empty file means the
                // content was replaced wholesale.
                if !old.is_empty() && script.ops().iter().all(|op| !op.is_common()) {
                    ChangeType::Rewrite
                } else {
                    ChangeType::Modified
                }
            }
        },
        (None, None) => ChangeType::Modified,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
