// The transform pass: source files in, test-suite hierarchy out
use crate::compiler::Compiler;
use crate::discovery::find_sources;
use specgen_common::{LayoutConfig, Options, RunSummary, TestCase, TransformError};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Build the test suite described by `options` and `layout`.
///
/// Each discovered file becomes `<dest>/<relative path>/<input_file>` plus
/// `<output_file>` holding the compiler's stdout. A compiler failure drops
/// that one test case; a directory or copy failure aborts the run and is
/// returned as-is, leaving earlier test cases in place.
#[instrument(skip_all, fields(source = %options.source_dir, dest = %options.dest_dir))]
pub fn transform(
    options: &Options,
    layout: &LayoutConfig,
    compiler: &dyn Compiler,
) -> Result<RunSummary, TransformError> {
    let source_root = options.source_root();
    let dest_root = options.dest_root();

    println!(
        "Recursively searching under directory '{}' for {} files to move to directory '{}'.",
        options.source_dir, layout.source_extension, options.dest_dir
    );

    let sources = find_sources(source_root, &layout.source_extension, Some(dest_root));
    info!(count = sources.len(), "Discovered source files");

    let mut summary = RunSummary::default();

    for source_path in &sources {
        let Some(case) = TestCase::new(source_root, dest_root, source_path, layout) else {
            warn!(path = %source_path.display(), "Discovered file is not under the search root");
            continue;
        };
        summary.found += 1;

        if produce_test_case(&case, compiler)? {
            summary.copied += 1;
        } else if options.prune_empty {
            prune_empty_ancestors(&case.dest_dir, dest_root);
        }
    }

    println!(
        "Found {} total .{} files under {}. Copied {} input files.",
        summary.found, layout.source_extension, options.source_dir, summary.copied
    );
    if !options.prune_empty {
        println!("There may be empty directories, remove them if it bothers you.");
    }

    info!(
        found = summary.found,
        copied = summary.copied,
        failed = summary.failed(),
        "Transform complete"
    );
    Ok(summary)
}

/// Returns `Ok(false)` when the compiler rejected the input and the test
/// case directory was discarded.
fn produce_test_case(case: &TestCase, compiler: &dyn Compiler) -> Result<bool, TransformError> {
    debug!(
        source = %case.source_path.display(),
        dest = %case.dest_dir.display(),
        "Producing test case"
    );

    fs::create_dir_all(&case.dest_dir).map_err(|source| TransformError::DirectoryCreation {
        path: case.dest_dir.clone(),
        source,
    })?;

    fs::copy(&case.source_path, &case.input_path).map_err(|source| TransformError::Copy {
        from: case.source_path.clone(),
        to: case.input_path.clone(),
        source,
    })?;

    match compiler.compile(&case.input_path, &case.output_path) {
        Ok(()) => Ok(true),
        Err(e) if !e.is_fatal() => {
            eprintln!(
                "WARNING: {}\n         This input file will not be part of the generated test suite.",
                e
            );
            if let Err(rm) = fs::remove_dir_all(&case.dest_dir) {
                warn!(dir = %case.dest_dir.display(), error = %rm, "Failed to remove rejected test case");
            }
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Remove now-empty directories above `dir`, stopping below `dest_root`.
fn prune_empty_ancestors(dir: &Path, dest_root: &Path) {
    for ancestor in dir.ancestors().skip(1) {
        if ancestor == dest_root || !ancestor.starts_with(dest_root) {
            break;
        }
        // remove_dir refuses non-empty directories, which ends the climb
        if fs::remove_dir(ancestor).is_err() {
            break;
        }
        debug!(dir = %ancestor.display(), "Pruned empty directory");
    }
}
