//! Command-line interface for the LC-3 highlighter
//! Tokenizes assembly files the same way the editor does and prints the result.
//!
//! Usage:
//!   lc3hl `<path>` [--dialect `<id>`] [--format simple|json|styled] [--folds]   - Highlight a file
//!   lc3hl --list-languages                                                  - List registered languages
//!   lc3hl --show-theme                                                      - Print the active theme
//!
//! Settings come from the embedded defaults, then `--config <file>`, then flags.

mod output;

use clap::{Arg, ArgAction, ArgMatches, Command};
use lc3_config::{Lc3Config, Loader, SettingsError};
use lc3_syntax::lc3::Dialect;
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("no language registered for {0}")]
    NoLanguage(PathBuf),
    #[error("could not serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let matches = Command::new("lc3hl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Syntax highlighting for LC-3 assembly files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the assembly file")
                .required_unless_present_any(["list-languages", "show-theme"])
                .index(1),
        )
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .help("Language to tokenize with (default: highlight.dialect from the config)")
                .value_parser(Dialect::ALL.map(Dialect::id)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["simple", "json", "styled"])
                .default_value("simple"),
        )
        .arg(
            Arg::new("folds")
                .long("folds")
                .help("Also report fold ranges")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the default settings"),
        )
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .help("List registered languages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-theme")
                .long("show-theme")
                .help("Print the active theme as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;

    if matches.get_flag("list-languages") {
        return handle_list_languages_command(&config);
    }
    if matches.get_flag("show-theme") {
        return handle_show_theme_command(&config);
    }

    // `path` is required unless one of the flags above is present.
    let Some(path) = matches.get_one::<String>("path") else {
        return Ok(());
    };
    let format = matches
        .get_one::<String>("format")
        .map_or("simple", String::as_str);
    handle_highlight_command(&config, Path::new(path), format, matches.get_flag("folds"))
}

fn load_config(matches: &ArgMatches) -> Result<Lc3Config, CliError> {
    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        debug!("layering config file {file}");
        loader = loader.with_file(file);
    }
    if let Some(dialect) = matches.get_one::<String>("dialect") {
        loader = loader.set_override("highlight.dialect", dialect.as_str())?;
    }
    Ok(loader.build()?)
}

/// Handle the highlight command
fn handle_highlight_command(
    config: &Lc3Config,
    path: &Path,
    format: &str,
    folds: bool,
) -> Result<(), CliError> {
    let registry = config.highlight.build_registry()?;
    let language = registry
        .for_path(path)
        .ok_or_else(|| CliError::NoLanguage(path.to_path_buf()))?;
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("{} opens as {}", path.display(), language.id);

    let buffer = language.open(&source);
    let folds = folds.then(|| language.fold_provider().fold_ranges(&buffer));
    let formatted = match format {
        "json" => output::to_json(&buffer, folds.as_deref())?,
        "styled" => output::to_styled(&buffer, &language.theme, folds.as_deref()),
        _ => output::to_simple(&buffer, folds.as_deref()),
    };
    print!("{formatted}");
    Ok(())
}

/// Handle the list-languages command
fn handle_list_languages_command(config: &Lc3Config) -> Result<(), CliError> {
    let registry = config.highlight.build_registry()?;
    let owner = registry.for_extension("asm").map(|l| l.id.clone());
    println!("Registered languages:\n");
    for language in registry.languages() {
        let marker = if owner.as_deref() == Some(language.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {}", language.id);
        println!("    {}", language.name);
        println!(
            "    extensions: {}, comment: {}, folding: {:?}",
            language
                .file_extensions
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(" "),
            language.line_comment_prefix,
            language.folding
        );
        println!();
    }
    Ok(())
}

/// Handle the show-theme command
fn handle_show_theme_command(config: &Lc3Config) -> Result<(), CliError> {
    let theme = config.highlight.resolve_theme()?;
    println!("{}", serde_json::to_string_pretty(&theme)?);
    Ok(())
}
