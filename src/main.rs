use clap::value_parser;
use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{self, EnvFilter};

use refmt::files;
use refmt::guides;
use refmt::language::{Dry, FileOptions, FileType, GuideOptions, Scope};
use refmt::parsing;
use refmt::problem::{self, StyleError};
use refmt::styling;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    // Initialize the tracing subscriber. This respects the RUST_LOG
    // environment variable if present, or sets Level::ERROR as a fallback.
    let filter = EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let matches = Command::new("refmt")
        .version(VERSION)
        .propagate_version(true)
        .about("A style guide driven formatter for R scripts.")
        .disable_help_subcommand(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .long_help("Print help")
                .global(true)
                .hide(true)
                .action(ArgAction::Help))
        .arg(
            Arg::new("version")
                .long("version")
                .long_help("Print version")
                .global(true)
                .hide(true)
                .action(ArgAction::Version))
        .subcommand(
            Command::new("format")
                .about("Rewrite the given files so they conform to the style guide.")
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .value_parser(["spaces", "indention", "line_breaks", "tokens"])
                        .default_value("tokens")
                        .action(ArgAction::Set)
                        .help("The most invasive kind of change to apply. Each level includes the less invasive ones."),
                )
                .arg(
                    Arg::new("relaxed")
                        .long("relaxed")
                        .action(ArgAction::SetTrue)
                        .help("Only add missing whitespace rather than enforcing exact amounts."),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .value_name("COLUMNS")
                        .value_parser(value_parser!(usize))
                        .default_value("2")
                        .action(ArgAction::Set)
                        .help("The number of spaces one level of indentation adds."),
                )
                .arg(
                    Arg::new("base-indention")
                        .long("base-indention")
                        .value_name("COLUMNS")
                        .value_parser(value_parser!(usize))
                        .default_value("0")
                        .action(ArgAction::Set)
                        .help("Indentation added to every emitted line, for embedding styled fragments."),
                )
                .arg(
                    Arg::new("dry")
                        .long("dry")
                        .value_parser(["off", "on", "fail"])
                        .default_value("off")
                        .action(ArgAction::Set)
                        .help("Whether to write results back, only report, or fail when a change would be needed."),
                )
                .arg(
                    Arg::new("no-cache")
                        .long("no-cache")
                        .action(ArgAction::SetTrue)
                        .help("Do not consult or update the cache of already-styled expressions."),
                )
                .arg(
                    Arg::new("no-roxygen-examples")
                        .long("no-roxygen-examples")
                        .action(ArgAction::SetTrue)
                        .help("Leave example code embedded in roxygen comments alone."),
                )
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .help("Files, directories, or a package root to format. Use '-' to format standard input."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report files that are not styled according to the guide, without rewriting them.")
                .arg(
                    Arg::new("paths")
                        .required(true)
                        .num_args(1..)
                        .help("Files or directories to check."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("format", submatches)) => {
            let scope = submatches
                .get_one::<String>("scope")
                .unwrap();
            let scope = match Scope::parse(scope) {
                Ok(scope) => scope,
                Err(error) => fatal(&error),
            };

            let relaxed = *submatches
                .get_one::<bool>("relaxed")
                .unwrap(); // flags are always present since SetTrue implies default_value

            let indent_by = *submatches
                .get_one::<usize>("indent")
                .unwrap();

            let base_indention = *submatches
                .get_one::<usize>("base-indention")
                .unwrap();

            let dry = submatches
                .get_one::<String>("dry")
                .unwrap();
            let dry = match Dry::parse(dry) {
                Ok(dry) => dry,
                Err(error) => fatal(&error),
            };

            let no_cache = *submatches
                .get_one::<bool>("no-cache")
                .unwrap();

            let no_roxygen = *submatches
                .get_one::<bool>("no-roxygen-examples")
                .unwrap();

            let mut guide_options = GuideOptions::default();
            guide_options.scope = scope;
            guide_options.strict = !relaxed;
            guide_options.indent_by = indent_by;
            guide_options.base_indention = base_indention;
            guide_options.include_roxygen_examples = !no_roxygen;

            debug!(?scope, relaxed, indent_by);

            let mut options = FileOptions::default();
            options.dry = dry;
            options.cache = !no_cache;

            let paths: Vec<&String> = submatches
                .get_many::<String>("paths")
                .unwrap()
                .collect();

            let guide = guides::tidy_with(guide_options);
            let changed = run(&paths, &guide, &options);
            std::process::exit(if changed && dry == Dry::Fail { 1 } else { 0 });
        }
        Some(("check", submatches)) => {
            let paths: Vec<&String> = submatches
                .get_many::<String>("paths")
                .unwrap()
                .collect();

            let guide = guides::tidy();
            let mut options = FileOptions::default();
            options.dry = Dry::On;

            let changed = run(&paths, &guide, &options);
            if changed {
                eprintln!("{}", "changes needed".bright_yellow());
                std::process::exit(1);
            }
            eprintln!("{}", "ok".bright_green());
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: refmt [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

/// Style every given path, printing a line per file. Returns whether any
/// file needed changes.
fn run(paths: &[&String], guide: &guides::StyleGuide, options: &FileOptions) -> bool {
    let mut any_changed = false;

    for path in paths {
        if path.as_str() == "-" {
            any_changed = style_stdin(guide) || any_changed;
            continue;
        }

        let path = Path::new(path);
        let results = if path.is_dir() {
            if path
                .join("DESCRIPTION")
                .exists()
            {
                files::style_pkg(path, guide, options)
            } else {
                files::style_dir(path, guide, options, true)
            }
        } else {
            files::style_file(path, guide, options).map(|changed| vec![(path.to_path_buf(), changed)])
        };

        match results {
            Ok(results) => {
                for (file, changed) in results {
                    report(&file, changed);
                    any_changed = any_changed || changed;
                }
            }
            Err(StyleError::Dirty(file)) => {
                report(&file, true);
                any_changed = true;
            }
            Err(error) => {
                present(&error, path);
                std::process::exit(1);
            }
        }
    }

    any_changed
}

/// Style standard input to standard output, as editors expect.
fn style_stdin(guide: &guides::StyleGuide) -> bool {
    let mut source = String::new();
    if let Err(error) = std::io::Read::read_to_string(&mut std::io::stdin(), &mut source) {
        eprintln!("{}: {}", "error".bright_red(), error);
        std::process::exit(1);
    }

    match styling::style_text(&source, guide) {
        Ok(styled) => {
            print!("{}", styled.text);
            styled.changed
        }
        Err(error) => {
            eprintln!(
                "{}",
                problem::full_error(&error, Path::new("<stdin>"), &source)
            );
            std::process::exit(1);
        }
    }
}

fn report(file: &PathBuf, changed: bool) {
    if changed {
        println!("{}  {}", "styled   ".bright_blue(), file.display());
    } else {
        println!("{}  {}", "unchanged".dimmed(), file.display());
    }
}

/// Print an error with as much context as we can recover.
fn present(error: &StyleError, path: &Path) {
    if let StyleError::Parse(_) = error {
        if FileType::of_path(path).is_some() {
            if let Ok(source) = parsing::load(path) {
                eprintln!("{}", problem::full_error(error, path, &source));
                return;
            }
        }
    }
    eprintln!("{}", problem::concise_error(error, path));
}

fn fatal(error: &StyleError) -> ! {
    eprintln!("{}: {}", "error".bright_red(), error);
    std::process::exit(1);
}
