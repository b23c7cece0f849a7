//! Helpers for fen.
//!
//! Filesystem primitives used by the file operations engine (recursive copy and removal,
//! collision-free destination names), opening a path in an external program, and the small
//! path utilities used by the header and the CLI.

use crate::config::Editor;
use crate::core::Error;

use std::collections::HashSet;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::process::Command;
use std::{fs, io};

/// Programs tried, in order, after the configured editor.
pub const FALLBACK_OPENERS: [&str; 4] = ["nvim", "vim", "vi", "nano"];

/// True if something (including a dangling symlink) exists at `path`.
#[inline]
pub fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Finds the next available name by appending ` (1)`, ` (2)`, ... before the extension.
/// Paths in `reserved` count as taken too, so a batch of pastes into one directory gets
/// distinct names before any of them ran.
///
/// Example: "notes.txt" -> "notes (1).txt", ".config" -> ".config (1)"
pub fn unique_path(path: &Path, reserved: &HashSet<PathBuf>) -> PathBuf {
    let taken = |p: &Path| path_exists(p) || reserved.contains(p);
    if !taken(path) {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path.file_name().unwrap_or_default();

    let stem = Path::new(name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    let ext = Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let target = parent.join(format!("{stem} ({counter}){ext}"));
        if !taken(&target) {
            return target;
        }
        counter += 1;
    }
}

/// Recursively copies `src` to `dest`.
///
/// Symlinks are recreated as symlinks on unix rather than followed. Nothing is ever merged
/// or overwritten: an existing `dest` fails with [io::ErrorKind::AlreadyExists].
pub fn copy_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    let md = fs::symlink_metadata(src)?;
    let file_type = md.file_type();

    if file_type.is_symlink() {
        return copy_symlink(src, dest);
    }

    if file_type.is_dir() {
        fs::create_dir(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        copy_file_new(src, dest, md.permissions())?;
    }
    Ok(())
}

/// Copies file contents into a freshly created `dest`. Fails if `dest` already exists.
fn copy_file_new(src: &Path, dest: &Path, perms: fs::Permissions) -> io::Result<()> {
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)?;
    io::copy(&mut reader, &mut writer)?;
    writer.set_permissions(perms)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_recursive(&fs::canonicalize(src)?, dest)
    } else {
        fs::copy(src, dest).map(|_| ())
    }
}

/// Removes `path` recursively. A symlink is removed itself, never its target.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let md = fs::symlink_metadata(path)?;
    if md.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Checks a user supplied file name for rename and create.
pub fn validate_name(name: &str) -> crate::core::Result<&str> {
    let name = name.trim();
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(MAIN_SEPARATOR);

    if invalid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Picks the program used to open a file.
///
/// An explicit `program` wins. Otherwise the configured editor and then [FALLBACK_OPENERS] are
/// tried, and the first one found on `PATH` is returned.
pub fn resolve_opener(program: Option<&str>, editor: &Editor) -> Option<String> {
    if let Some(program) = program.map(str::trim).filter(|p| !p.is_empty()) {
        return Some(program.to_string());
    }

    std::iter::once(editor.cmd())
        .chain(FALLBACK_OPENERS)
        .find(|cmd| which::which(cmd).is_ok())
        .map(str::to_string)
}

/// Opens `path` in an external program.
///
/// Temporarily disables raw mode and leaves the alternate screen while the program runs.
/// On return, restores raw mode and the alternate screen.
pub fn open_path(path: &Path, program: Option<&str>, editor: &Editor) -> io::Result<()> {
    use crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };

    let Some(opener) = resolve_opener(program, editor) else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no program available to open the file",
        ));
    };

    let mut parts = opener.split_whitespace();
    let Some(bin) = parts.next() else {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command"));
    };

    tracing::debug!(program = %opener, path = %path.display(), "opening file");

    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    let status = Command::new(bin).args(parts).arg(path).status();

    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    status.map(|_| ())
}

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` and makes `arg` absolute against the current directory.
pub fn resolve_initial_dir(arg: &str) -> PathBuf {
    let expanded = match arg.strip_prefix('~') {
        Some(rest) => match get_home() {
            Some(home) => home.join(rest.trim_start_matches(['/', MAIN_SEPARATOR])),
            None => PathBuf::from(arg),
        },
        None => PathBuf::from(arg),
    };

    if expanded.is_absolute() {
        return expanded;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&expanded))
        .unwrap_or(expanded)
}

/// Util function to shorten home directory to ~.
/// Used by the header line.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = get_home()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    path.display().to_string()
}
