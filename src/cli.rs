// Command-line front end: diff two files on disk and print the hunk
// structure the library produces.
//
// A path that does not exist is treated as an absent side, so added and
// deleted files can be expressed directly. Exit status follows diff(1):
// 0 for no differences, 1 for differences, 2 for errors.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::assemble::{ContextMode, DiffResult, Hunk};
use crate::cache::{CacheConfig, CacheKey, DiffCache};
use crate::engine::{self, BaseContext, DiffPreferences, DiffRequest, RenameState};
use crate::line_diff::WhitespaceMode;
use crate::rebase::RebaseSources;
use crate::sequence::{Charset, LineSequence};

#[derive(Parser, Debug)]
#[command(
    name = "revdiff",
    version,
    about = "Rebase-aware revision diff",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Diff two files and print the hunks.
    Diff(DiffArgs),
    /// Diff two files and print only the insertion/deletion counts.
    Stats(DiffArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WhitespaceArg {
    ConsiderAll,
    IgnoreTrailing,
    IgnoreLeadingAndTrailing,
    IgnoreAll,
}

impl From<WhitespaceArg> for WhitespaceMode {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::ConsiderAll => WhitespaceMode::ConsiderAll,
            WhitespaceArg::IgnoreTrailing => WhitespaceMode::IgnoreTrailing,
            WhitespaceArg::IgnoreLeadingAndTrailing => WhitespaceMode::IgnoreLeadingAndTrailing,
            WhitespaceArg::IgnoreAll => WhitespaceMode::IgnoreAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CharsetArg {
    Utf8,
    Latin1,
}

impl From<CharsetArg> for Charset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Utf8 => Charset::Utf8,
            CharsetArg::Latin1 => Charset::Latin1,
        }
    }
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Old revision of the file (missing path = file absent).
    old: PathBuf,

    /// New revision of the file (missing path = file absent).
    new: PathBuf,

    /// Old base content, for rebase classification.
    #[arg(long, requires = "new_base")]
    old_base: Option<PathBuf>,

    /// New base content, for rebase classification.
    #[arg(long, requires = "old_base")]
    new_base: Option<PathBuf>,

    /// Whitespace handling during line comparison.
    #[arg(long, value_enum, default_value_t = WhitespaceArg::ConsiderAll)]
    whitespace: WhitespaceArg,

    /// Compute character-level edit spans inside changed hunks.
    #[arg(long)]
    intraline: bool,

    /// Context line count (accepted for compatibility; hunks are printed
    /// with full context either way).
    #[arg(long, default_value_t = 3, conflicts_with = "whole_file")]
    context: u32,

    /// Return the whole file, including when it is unmodified.
    #[arg(long)]
    whole_file: bool,

    /// Character set the files are declared in.
    #[arg(long, value_enum, default_value_t = CharsetArg::Utf8)]
    charset: CharsetArg,
}

fn read_side(path: &PathBuf, charset: Charset) -> Result<Option<LineSequence>, String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("{}: {e}", path.display())),
    };
    LineSequence::from_bytes(&bytes, charset)
        .map(Some)
        .map_err(|e| format!("{}: {e}", path.display()))
}

fn build_request(args: &DiffArgs) -> Result<DiffRequest, String> {
    let charset = args.charset.into();
    let old = read_side(&args.old, charset)?;
    let new = read_side(&args.new, charset)?;

    let bases = match (&args.old_base, &args.new_base) {
        (Some(old_base), Some(new_base)) => BaseContext::Rebased(RebaseSources {
            old_base: read_side(old_base, charset)?
                .ok_or_else(|| format!("{}: no such file", old_base.display()))?,
            new_base: read_side(new_base, charset)?
                .ok_or_else(|| format!("{}: no such file", new_base.display()))?,
        }),
        _ => BaseContext::Same,
    };

    Ok(DiffRequest {
        name_a: old.is_some().then(|| args.old.display().to_string()),
        name_b: new.is_some().then(|| args.new.display().to_string()),
        old,
        new,
        bases,
        rename: RenameState::Unchanged,
        prefs: DiffPreferences {
            whitespace: args.whitespace.into(),
            intraline: args.intraline,
            context: if args.whole_file {
                ContextMode::WholeFile
            } else {
                ContextMode::Lines(args.context)
            },
        },
    })
}

fn print_hunks(result: &DiffResult) {
    if let Some(meta) = &result.meta_a {
        println!("--- {} ({} lines)", meta.name, meta.total_line_count);
    } else {
        println!("--- /dev/null");
    }
    if let Some(meta) = &result.meta_b {
        println!("+++ {} ({} lines)", meta.name, meta.total_line_count);
    } else {
        println!("+++ /dev/null");
    }
    println!("change type: {:?}", result.change_type);
    if result.classification_degraded {
        println!("note: rebase classification degraded, all hunks authored");
    }

    for hunk in &result.content {
        match hunk {
            Hunk::Common { lines, .. } => {
                for line in lines {
                    println!("  {line}");
                }
            }
            Hunk::Changed {
                lines_a,
                lines_b,
                edits_a,
                edits_b,
                due_to_rebase,
            } => {
                let tag = if *due_to_rebase { " (rebase)" } else { "" };
                println!("@@{tag}");
                for line in lines_a {
                    println!("- {line}");
                }
                for line in lines_b {
                    println!("+ {line}");
                }
                if !edits_a.is_empty() || !edits_b.is_empty() {
                    let fmt = |edits: &[crate::intraline::IntralineEdit]| {
                        edits
                            .iter()
                            .map(|e| format!("{:?}", e.pair()))
                            .collect::<Vec<_>>()
                            .join(" ")
                    };
                    println!("~ a: {}", fmt(edits_a));
                    println!("~ b: {}", fmt(edits_b));
                }
            }
        }
    }
}

fn print_stats(result: &DiffResult) {
    println!(
        "{} insertions, {} deletions",
        result.lines_inserted.unwrap_or(0),
        result.lines_deleted.unwrap_or(0)
    );
}

fn has_differences(result: &DiffResult) -> bool {
    result
        .content
        .iter()
        .any(|hunk| matches!(hunk, Hunk::Changed { .. }))
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let (args, stats_only) = match &cli.command {
        Cmd::Diff(args) => (args, false),
        Cmd::Stats(args) => (args, true),
    };

    let request = match build_request(args) {
        Ok(request) => request,
        Err(msg) => {
            eprintln!("revdiff: {msg}");
            process::exit(2);
        }
    };

    // One-shot cache so the CLI exercises the same path a long-lived
    // caller would.
    let cache = DiffCache::new(CacheConfig::default());
    let key = CacheKey {
        file_id: args.new.display().to_string(),
        revision_a: args.old.display().to_string(),
        revision_b: args.new.display().to_string(),
        prefs_fingerprint: request.prefs.fingerprint(),
    };
    let result = match cache.get_or_compute(&key, || engine::compute_diff(&request)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("revdiff: {e}");
            process::exit(2);
        }
    };

    if stats_only {
        print_stats(&result);
    } else {
        print_hunks(&result);
    }
    process::exit(i32::from(has_differences(&result)));
}
