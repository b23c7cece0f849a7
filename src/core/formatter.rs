//! Sorting, filtering, and display formatting for directory entries in fen.
//!
//! [ListOptions] is the read-only snapshot of the listing preferences (sort key, reverse,
//! hidden files, folders first). It is taken from the config at startup, can be toggled at
//! runtime, and is applied on every pane refresh.
//!
//! The `format_*` helpers turn entry metadata into the strings shown by the preview pane.

use crate::core::DirEntry;

use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size};
use serde::Deserialize;
use unicode_width::UnicodeWidthChar;

use std::cmp::Ordering;
use std::fs::Metadata;
use std::time::SystemTime;

/// Sort key for directory listings.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Size,
    Modified,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "size" => Ok(SortBy::Size),
            "modified" => Ok(SortBy::Modified),
            other => Err(format!(
                "invalid sort key '{other}' (expected name, size or modified)"
            )),
        }
    }
}

/// Listing preferences applied to every [crate::core::list_dir] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub sort_by: SortBy,
    pub reverse: bool,
    pub show_hidden: bool,
    pub folders_first: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Name,
            reverse: false,
            show_hidden: false,
            folders_first: true,
        }
    }
}

impl ListOptions {
    /// Sorts entries in place.
    ///
    /// The folders-first partition is applied before the key comparison and is not affected by
    /// `reverse`. Equal keys fall back to the name so the order is total.
    pub fn sort_entries(&self, entries: &mut [DirEntry]) {
        entries.sort_by(|a, b| {
            if self.folders_first {
                match (a.is_dir(), b.is_dir()) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    _ => {}
                }
            }

            let by_key = match self.sort_by {
                SortBy::Name => Ordering::Equal,
                SortBy::Size => a.size().cmp(&b.size()),
                SortBy::Modified => a.modified().cmp(&b.modified()),
            };
            let ord = by_key.then_with(|| compare_names(a, b));

            if self.reverse { ord.reverse() } else { ord }
        });
    }

    /// Drops hidden entries unless `show_hidden` is set, then sorts.
    pub fn filter_entries(&self, entries: &mut Vec<DirEntry>) {
        if !self.show_hidden {
            entries.retain(|e| !e.is_hidden());
        }
        self.sort_entries(entries);
    }
}

fn compare_names(a: &DirEntry, b: &DirEntry) -> Ordering {
    let (an, bn) = (a.name_str(), b.name_str());
    an.to_lowercase()
        .cmp(&bn.to_lowercase())
        .then_with(|| an.cmp(&bn))
}

/// Unix-style attribute string, e.g. `drwxr-xr-x`.
pub fn format_attributes(meta: &Metadata) -> String {
    let file_type = meta.file_type();
    let first = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else {
        '-'
    };

    #[cfg(unix)]
    let mode = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode()
    };
    #[cfg(not(unix))]
    let mode: u32 = if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    };

    let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    for (i, shift) in [6u32, 3, 0].into_iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }
    chars.iter().collect()
}

pub fn format_file_size(size: u64) -> String {
    format_size(size, DECIMAL)
}

pub fn format_file_time(modified: Option<SystemTime>) -> String {
    modified
        .map(|mtime| {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Truncates or pads `line` to exactly `width` terminal columns.
///
/// Tabs expand to 4-column stops, other control characters are dropped.
pub fn sanitize_to_exact_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut current_w = 0;

    for ch in line.chars() {
        if ch == '\t' {
            let space_count = 4 - (current_w % 4);
            if current_w + space_count > width {
                break;
            }
            out.push_str(&" ".repeat(space_count));
            current_w += space_count;
            continue;
        }

        if ch.is_control() {
            continue;
        }

        let w = ch.width().unwrap_or(0);
        if current_w + w > width {
            break;
        }
        out.push(ch);
        current_w += w;
    }

    if current_w < width {
        out.push_str(&" ".repeat(width - current_w));
    }
    out
}
