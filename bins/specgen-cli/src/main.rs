mod commands;
mod compiler;
mod discovery;

use clap::error::ErrorKind;
use clap::Parser;
use compiler::ExternalCompiler;
use specgen_common::config::{DEFAULT_DEST_DIR, DEFAULT_SOURCE_DIR};
use specgen_common::{LayoutConfig, Options, TransformError};
use std::path::PathBuf;
use std::process::exit;
use tracing::debug;

const ABOUT: &str = "\
Turn a collection of .scss inputs into a test-suite hierarchy. Every input
gets its own directory holding input.scss and expected_output.css, the latter
generated by running sass (whichever version you have) on the input. Sass is
assumed to be on your PATH; set SASS_COMPILER to use something else.";

const EXAMPLES: &str = "\
Example usage:
  specgen -s=myinputcollection
  specgen -d=mytestsuite
  specgen -s=myinputcollection -d=mytestsuite";

#[derive(Parser, Debug)]
#[command(name = "specgen")]
#[command(about = ABOUT, long_about = None, after_help = EXAMPLES)]
#[command(args_override_self = true)]
struct Cli {
    /// Directory to recursively search for .scss files
    #[arg(short, long, require_equals = true, default_value = DEFAULT_SOURCE_DIR,
          value_parser = clap::builder::NonEmptyStringValueParser::new())]
    source: String,

    /// Directory to place the new hierarchy in
    #[arg(short, long, require_equals = true, default_value = DEFAULT_DEST_DIR,
          value_parser = clap::builder::NonEmptyStringValueParser::new())]
    dest: String,

    /// JSON file overriding compiler, extension and file names
    #[arg(short, long, require_equals = true)]
    config: Option<PathBuf>,

    /// Remove directories left empty by rejected inputs
    #[arg(long)]
    prune: bool,

    /// Log what happens to every file
    #[arg(short, long)]
    verbose: bool,

    /// Anything after the options is ignored
    #[arg(trailing_var_arg = true, hide = true)]
    rest: Vec<String>,
}

fn main() {
    exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    init_tracing(cli.verbose);

    if !cli.rest.is_empty() {
        debug!(ignored = ?cli.rest, "Ignoring trailing arguments");
    }

    let mut options = Options::new(cli.source, cli.dest);
    options.verbose = cli.verbose;
    options.prune_empty = cli.prune;
    options.config_path = cli.config;

    if let Err(e) = options.validate_destination() {
        eprintln!("\nERROR: {}\n", e);
        return e.exit_code();
    }

    let layout = match LayoutConfig::resolve(options.config_path.as_deref()) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("\nERROR: {:#}\n", e);
            return 1;
        }
    };
    debug!(?layout, "Resolved layout");

    let compiler = ExternalCompiler::new(&layout.compiler);
    match commands::transform(&options, &layout, &compiler) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

/// Parse argv, turning every rejection into an exit code.
fn parse_args(args: &[String]) -> Result<Cli, i32> {
    if let Some(token) = stray_dash(args) {
        return Err(report(TransformError::UnknownOption(token)));
    }
    Cli::try_parse_from(args).map_err(|e| report_parse_error(e, args))
}

/// A lone `-` or `--` before the first bare word. clap reads both as the
/// start of positional arguments instead of rejecting them.
fn stray_dash(args: &[String]) -> Option<String> {
    args.iter()
        .skip(1)
        .take_while(|arg| arg.starts_with('-'))
        .find(|arg| *arg == "-" || *arg == "--")
        .cloned()
}

/// Map clap's verdict onto the tool's exit codes.
fn report_parse_error(e: clap::Error, args: &[String]) -> i32 {
    let err = match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            // Only fails if stdout is gone
            let _ = e.print();
            return 0;
        }
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            let flag = rendered_arg(&e).and_then(|arg| flag_name(&arg));
            let (what, flags) = match flag {
                Some("dest") => ("destination", "-d= or --dest="),
                Some("config") => ("config", "-c= or --config="),
                _ => ("source", "-s= or --source="),
            };
            TransformError::MissingRequiredValue { what, flags }
        }
        _ => TransformError::UnknownOption(offending_token(&e, args)),
    };

    report(err)
}

fn report(err: TransformError) -> i32 {
    eprintln!("\nERROR: {}\n\n{}", err, Cli::command_usage());
    err.exit_code()
}

/// What clap says the error is about: the typed token for unknown
/// arguments, a rendered spec like `--source=<SOURCE>` for value flags.
fn rendered_arg(e: &clap::Error) -> Option<String> {
    use clap::error::{ContextKind, ContextValue};
    match e.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.clone()),
        _ => None,
    }
}

/// Which value flag a rendered arg names.
fn flag_name(rendered: &str) -> Option<&'static str> {
    ["dest", "config", "source"]
        .into_iter()
        .find(|name| rendered.contains(&format!("--{}", name)))
}

/// The token the user actually typed.
fn offending_token(e: &clap::Error, args: &[String]) -> String {
    let Some(rendered) = rendered_arg(e) else {
        return e.kind().to_string();
    };
    if args.iter().skip(1).any(|arg| *arg == rendered) {
        return rendered;
    }

    // Value flag given without `=`, as in `-s dir` or `-sdir`
    flag_name(&rendered)
        .and_then(|name| {
            let long = format!("--{}", name);
            let short = format!("-{}", &name[..1]);
            args.iter()
                .skip(1)
                .find(|arg| {
                    !arg.contains('=')
                        && (arg.starts_with(&long)
                            || (arg.starts_with(&short) && !arg.starts_with("--")))
                })
                .cloned()
        })
        .unwrap_or(rendered)
}

impl Cli {
    fn command_usage() -> String {
        use clap::CommandFactory;
        Cli::command().render_usage().to_string()
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("specgen")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    fn parse(args: &[&str]) -> Result<Cli, i32> {
        parse_args(&argv(args))
    }

    fn typed_token(args: &[&str]) -> String {
        let argv = argv(args);
        let err = Cli::try_parse_from(&argv).unwrap_err();
        offending_token(&err, &argv)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.source, ".");
        assert_eq!(cli.dest, "./test-suite/");
        assert!(cli.config.is_none());
        assert!(!cli.prune);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_short_and_long_forms() {
        let cli = parse(&["-s=in", "--dest=out"]).unwrap();
        assert_eq!(cli.source, "in");
        assert_eq!(cli.dest, "out");

        let cli = parse(&["--source=a=b", "-d=x", "-c=layout.json", "--prune", "-v"]).unwrap();
        assert_eq!(cli.source, "a=b");
        assert_eq!(cli.config, Some(PathBuf::from("layout.json")));
        assert!(cli.prune);
        assert!(cli.verbose);
    }

    #[test]
    fn test_later_flag_wins() {
        let cli = parse(&["-s=first", "-d=out", "--source=second"]).unwrap();
        assert_eq!(cli.source, "second");
    }

    #[test]
    fn test_parsing_stops_at_first_bare_word() {
        let cli = parse(&["-d=out", "garbage", "-s=ignored", "--bogus"]).unwrap();
        assert_eq!(cli.dest, "out");
        assert_eq!(cli.source, ".");
        assert_eq!(cli.rest, vec!["garbage", "-s=ignored", "--bogus"]);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(parse(&["--help"]).unwrap_err(), 0);
        assert_eq!(parse(&["--source="]).unwrap_err(), 1);
        assert_eq!(parse(&["--dest="]).unwrap_err(), 1);
        assert_eq!(parse(&["--frobnicate"]).unwrap_err(), 2);
        assert_eq!(parse(&["-x"]).unwrap_err(), 2);
        assert_eq!(parse(&["--dest", "out"]).unwrap_err(), 2);
        assert_eq!(parse(&["-"]).unwrap_err(), 2);
        assert_eq!(parse(&["--", "-s=x"]).unwrap_err(), 2);
        assert_eq!(parse(&["-d=out", "--"]).unwrap_err(), 2);
    }

    #[test]
    fn test_dashes_after_bare_word_are_ignored() {
        let cli = parse(&["garbage", "-"]).unwrap();
        assert_eq!(cli.rest, vec!["garbage", "-"]);
    }

    #[test]
    fn test_unknown_option_names_typed_token() {
        assert_eq!(typed_token(&["--bogus"]), "--bogus");
        assert_eq!(typed_token(&["-x"]), "-x");
        assert_eq!(typed_token(&["-s", "dir"]), "-s");
        assert_eq!(typed_token(&["--dest", "out"]), "--dest");
        assert_eq!(typed_token(&["-sdir"]), "-sdir");
    }
}
