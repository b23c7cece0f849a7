//! Command-line argument parsing and help for fen.
//!
//! When invoked with no args/flags (fen), fen simply launches the TUI in the current directory.
//! Listing and safety flags override the matching fen.toml settings for this run only.

use crate::config::Config;
use crate::core::SortBy;

/// Config values given on the command line. `None` keeps the value from fen.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub no_write: Option<bool>,
    pub show_hidden: Option<bool>,
    pub folders_first: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub sort_reverse: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    RunApp(CliOverrides),
    RunAppAtPath(String, CliOverrides),
    Exit,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Interprets the arguments following the program name.
///
/// Boolean flags take an optional `=true`/`=false`. `--sort-by` takes its value either as
/// `--sort-by=size` or as the next argument.
pub fn parse_args(args: &[String]) -> CliAction {
    let mut overrides = CliOverrides::default();
    let mut path: Option<&str> = None;
    let mut iter = args.iter().map(String::as_str);

    while let Some(arg) = iter.next() {
        match arg {
            "--version" | "-v" => {
                print_version();
                return CliAction::Exit;
            }
            "-h" | "--help" => {
                print_help();
                return CliAction::Exit;
            }
            "--init" => {
                let path = Config::default_path();
                match Config::generate_default(&path) {
                    Ok(()) => println!("Default config written to {}", path.display()),
                    Err(e) => eprintln!("Error: {}", e),
                }
                return CliAction::Exit;
            }
            flag if flag.starts_with("--") => {
                let (name, value) = match flag.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (flag, None),
                };
                let applied = match name {
                    "--sort-by" => value
                        .or_else(|| iter.next())
                        .ok_or_else(|| "--sort-by needs a value".to_string())
                        .and_then(|v| v.parse::<SortBy>())
                        .map(|v| overrides.sort_by = Some(v)),
                    "--no-write" => parse_bool(name, value).map(|v| overrides.no_write = Some(v)),
                    "--hidden-files" => {
                        parse_bool(name, value).map(|v| overrides.show_hidden = Some(v))
                    }
                    "--folders-first" => {
                        parse_bool(name, value).map(|v| overrides.folders_first = Some(v))
                    }
                    "--sort-reverse" => {
                        parse_bool(name, value).map(|v| overrides.sort_reverse = Some(v))
                    }
                    _ => Err(format!("Unknown argument: {}", flag)),
                };

                if let Err(msg) = applied {
                    eprintln!("Error: {}", msg);
                    eprintln!("Try --help for available options");
                    return CliAction::Exit;
                }
            }
            arg if arg.starts_with('-') || arg.trim().is_empty() => {
                eprintln!("Unknown argument: {}", arg);
                eprintln!("Try --help for available options");
                return CliAction::Exit;
            }
            arg => {
                if path.is_some() {
                    eprintln!("Error: fen accepts only one path.");
                    eprintln!("Usage: fen [OPTIONS] [PATH]");
                    return CliAction::Exit;
                }
                path = Some(arg);
            }
        }
    }

    match path {
        Some(path) => CliAction::RunAppAtPath(path.to_string(), overrides),
        None => CliAction::RunApp(overrides),
    }
}

fn parse_bool(flag: &str, value: Option<&str>) -> Result<bool, String> {
    match value {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(format!("{flag} expects true or false, got '{other}'")),
    }
}

fn print_version() {
    println!("fen {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"fen - A terminal file manager

USAGE:
  fen [OPTIONS] [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --no-write          Safe mode, no file write operations are performed
      --hidden-files      Show hidden files
      --folders-first     Always show folders at the top
      --sort-by <KEY>     Sort files by name, size or modified
      --sort-reverse      Reverse the sort order
      --init              Write the default configuration file
  -h, --help              Print help information
  -v, --version           Display the current installed version of fen

  Boolean options accept =false to turn off a setting enabled in fen.toml.

ENVIRONMENT:
  FEN_CONFIG              Override the default config path
  FEN_LOG                 Write debug logs to this file
"#
    );
}
