//! Directory listing and file metadata for fen.
//!
//! Provides the [DirEntry] snapshot used by every pane, the [FileInfo] shown in the preview pane
//! for non-directories, and the [read_entries] / [list_dir] listing functions.
//!
//! Listings are never cached: every pane refresh reads the directory again.

use crate::core::error::Error;
use crate::core::formatter::{ListOptions, format_attributes};

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The kind of a directory entry, taken from `symlink_metadata` (links are not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_metadata(md: &Metadata) -> Self {
        let ft = md.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Directory => "Directory",
            EntryKind::File => "File",
            EntryKind::Symlink => "Symlink",
            EntryKind::Other => "Other",
        }
    }
}

/// Immutable snapshot of one child of a listed directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    name: OsString,
    path: PathBuf,
    kind: EntryKind,
    target_is_dir: bool,
    size: u64,
    mode: u32,
    modified: Option<SystemTime>,
}

impl DirEntry {
    /// Builds an entry for `path` from its (not followed) metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let md = fs::symlink_metadata(path)?;
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string());
        Ok(Self::from_metadata(name, path.to_path_buf(), &md))
    }

    fn from_metadata(name: OsString, path: PathBuf, md: &Metadata) -> Self {
        let kind = EntryKind::from_metadata(md);
        let target_is_dir = kind == EntryKind::Symlink
            && fs::metadata(&path).map(|t| t.is_dir()).unwrap_or(false);

        Self {
            name,
            path,
            kind,
            target_is_dir,
            size: md.len(),
            mode: permission_bits(md),
            modified: md.modified().ok(),
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// True for directories and for symlinks pointing at a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory || self.target_is_dir
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name_str().starts_with('.')
    }
}

#[cfg(unix)]
fn permission_bits(md: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    md.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(md: &Metadata) -> u32 {
    if md.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

/// File details shown in the preview pane when the selection is not a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    name: OsString,
    kind: EntryKind,
    size: u64,
    attributes: String,
    modified: Option<SystemTime>,
    symlink_target: Option<PathBuf>,
}

impl FileInfo {
    pub fn get_file_info(path: &Path) -> std::io::Result<FileInfo> {
        let md = fs::symlink_metadata(path)?;
        let kind = EntryKind::from_metadata(&md);
        let symlink_target = if kind == EntryKind::Symlink {
            fs::read_link(path).ok()
        } else {
            None
        };

        Ok(FileInfo {
            name: path.file_name().unwrap_or_default().to_os_string(),
            kind,
            size: md.len(),
            attributes: format_attributes(&md),
            modified: md.modified().ok(),
            symlink_target,
        })
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn attributes(&self) -> &str {
        &self.attributes
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn symlink_target(&self) -> Option<&Path> {
        self.symlink_target.as_deref()
    }
}

/// Reads the immediate children of `path`, unsorted and unfiltered.
///
/// Children that vanish between `read_dir` and `symlink_metadata` are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<DirEntry>, Error> {
    let unavailable = |_| Error::ListingUnavailable {
        path: path.to_path_buf(),
    };

    let md = fs::metadata(path).map_err(unavailable)?;
    if !md.is_dir() {
        return Err(Error::ListingUnavailable {
            path: path.to_path_buf(),
        });
    }

    let mut entries = Vec::with_capacity(64);
    for entry in fs::read_dir(path).map_err(unavailable)? {
        let Ok(entry) = entry else {
            continue;
        };
        let Ok(md) = entry.metadata() else {
            continue;
        };
        entries.push(DirEntry::from_metadata(entry.file_name(), entry.path(), &md));
    }
    Ok(entries)
}

/// Lists `path` sorted and filtered per `opts`.
///
/// A missing or non-directory path yields an empty listing: an empty working directory is a
/// valid state, not an error.
pub fn list_dir(path: &Path, opts: &ListOptions) -> Vec<DirEntry> {
    match read_entries(path) {
        Ok(mut entries) => {
            opts.filter_entries(&mut entries);
            entries
        }
        Err(e) => {
            tracing::debug!(error = %e, "listing unavailable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn read_entries_reports_kind_and_size() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut f = File::create(dir.path().join("hello.txt"))?;
        f.write_all(b"abc123")?;
        fs::create_dir(dir.path().join("sub"))?;

        let entries = read_entries(dir.path())?;
        assert_eq!(entries.len(), 2);

        let file = entries
            .iter()
            .find(|e| e.name() == "hello.txt")
            .ok_or("missing file")?;
        assert_eq!(file.kind(), EntryKind::File);
        assert_eq!(file.size(), 6);
        assert_eq!(file.path(), dir.path().join("hello.txt"));
        assert!(file.modified().is_some());

        let sub = entries
            .iter()
            .find(|e| e.name() == "sub")
            .ok_or("missing dir")?;
        assert!(sub.is_dir());
        Ok(())
    }

    #[test]
    fn list_dir_missing_path_is_empty() {
        let opts = ListOptions::default();
        assert!(list_dir(Path::new("/path/does/not/exist"), &opts).is_empty());
    }

    #[test]
    fn list_dir_on_file_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("plain.txt");
        File::create(&file)?;
        assert!(list_dir(&file, &ListOptions::default()).is_empty());
        assert!(matches!(
            read_entries(&file),
            Err(Error::ListingUnavailable { .. })
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_dir_counts_as_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("real"))?;
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link"))?;

        let link = DirEntry::from_path(&dir.path().join("link"))?;
        assert!(link.is_symlink());
        assert!(link.is_dir());
        Ok(())
    }

    #[test]
    fn file_info_basic_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("info.txt");
        fs::write(&path, "12345")?;

        let info = FileInfo::get_file_info(&path)?;
        assert_eq!(info.kind(), EntryKind::File);
        assert_eq!(info.name(), "info.txt");
        assert_eq!(info.size(), 5);
        assert!(info.symlink_target().is_none());
        Ok(())
    }
}
