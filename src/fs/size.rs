//! Byte sizes of files and directory trees
//!
//! The plain accessors follow a silent-zero policy: anything that cannot be read
//! counts as zero bytes. The `try_` variants report the failure instead.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::fs::error::FileIoError;

/// Display units, smallest first, with their fractional digits
const UNITS: [(&str, usize); 4] = [("KB", 0), ("MB", 1), ("GB", 2), ("TB", 2)];

/// How symbolic links inside a measured tree are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymlinkPolicy {
    /// Links are never followed and contribute nothing
    #[default]
    Skip,
    /// Links are followed when their target resolves inside the measured root
    FollowWithinTree,
}

/// Multiplier between two consecutive display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitConvention {
    /// 1 KB = 1000 bytes (file-count style)
    #[default]
    Decimal,
    /// 1 KB = 1024 bytes
    Binary,
}

impl UnitConvention {
    pub(crate) const fn step(self) -> f64 {
        match self {
            Self::Decimal => 1000.0,
            Self::Binary => 1024.0,
        }
    }
}

/// A non-negative byte count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub const fn bytes(self) -> u64 {
        self.0
    }

    pub fn format(self, convention: UnitConvention) -> String {
        format_size_with(self.0, convention)
    }
}

impl From<u64> for ByteSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_size(self.0))
    }
}

/// Size of a single file, or zero if it cannot be read.
pub fn file_size(path: &Path) -> ByteSize {
    try_file_size(path).unwrap_or_default()
}

/// Size of a single file.
pub fn try_file_size(path: &Path) -> Result<ByteSize, FileIoError> {
    fs::metadata(path)
        .map(|metadata| ByteSize(metadata.len()))
        .map_err(|e| FileIoError::from_io(path, e))
}

/// Sum of all non-directory entries below `root`, skipping hidden entries.
///
/// Returns zero if `root` is missing or not a directory. Entries that cannot be
/// read are counted as zero.
pub fn directory_size(root: &Path, policy: SymlinkPolicy) -> ByteSize {
    let Ok(sizes) = entry_sizes(root, policy) else {
        return ByteSize::default();
    };
    ByteSize(sizes.filter_map(Result::ok).sum())
}

/// Like [`directory_size`], but fails on the first entry that cannot be read.
pub fn try_directory_size(root: &Path, policy: SymlinkPolicy) -> Result<ByteSize, FileIoError> {
    entry_sizes(root, policy)?
        .sum::<Result<u64, FileIoError>>()
        .map(ByteSize)
}

/// Renders `bytes` with the default decimal convention, e.g. `2048` -> `"2KB"`.
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes, UnitConvention::Decimal)
}

/// Renders `bytes` in the largest unit among KB, MB, GB and TB that keeps the value
/// at or above one. Values below one KB are still shown in KB.
pub fn format_size_with(bytes: u64, convention: UnitConvention) -> String {
    if bytes == 0 {
        return format!("0{}", UNITS[0].0);
    }

    let step = convention.step();
    let mut value = bytes as f64 / step;
    let mut unit = 0usize;
    while unit < UNITS.len() - 1 && round_to(value, UNITS[unit].1) >= step {
        value /= step;
        unit += 1;
    }

    let (name, precision) = UNITS[unit];
    let mut text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    // Non-zero sizes never render as zero
    if text == "0" {
        text = "1".to_string();
    }

    format!("{text}{name}")
}

fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn entry_sizes(
    root: &Path,
    policy: SymlinkPolicy,
) -> Result<impl Iterator<Item = Result<u64, FileIoError>>, FileIoError> {
    let root = root
        .canonicalize()
        .map_err(|e| FileIoError::from_io(root, e))?;
    if !root.is_dir() {
        return Err(FileIoError::Io {
            source: io::Error::other("not a directory"),
            path: root,
        });
    }

    let follow = policy == SymlinkPolicy::FollowWithinTree;
    let walker = WalkDir::new(&root).follow_links(follow).min_depth(1);
    let tree_root = root.clone();

    let sizes = walker
        .into_iter()
        .filter_entry(move |entry| !is_hidden(entry) && (!follow || stays_within(entry, &tree_root)))
        .filter_map(move |entry| match entry {
            // Link cycles are only reachable when following links; they add nothing
            Err(err) if err.loop_ancestor().is_some() => None,
            Err(err) => Some(Err(walk_error(&root, err))),
            Ok(entry) => entry_len(&entry).transpose(),
        });

    Ok(sizes)
}

fn entry_len(entry: &DirEntry) -> Result<Option<u64>, FileIoError> {
    let file_type = entry.file_type();
    if file_type.is_dir() || file_type.is_symlink() {
        return Ok(None);
    }
    entry
        .metadata()
        .map(|metadata| Some(metadata.len()))
        .map_err(|err| walk_error(entry.path(), err))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn stays_within(entry: &DirEntry, root: &Path) -> bool {
    if !entry.path_is_symlink() {
        return true;
    }
    fs::canonicalize(entry.path()).is_ok_and(|target| target.starts_with(root))
}

fn walk_error(fallback: &Path, err: walkdir::Error) -> FileIoError {
    let path: PathBuf = err.path().unwrap_or(fallback).to_path_buf();
    match err.into_io_error() {
        Some(source) => FileIoError::from_io(&path, source),
        None => FileIoError::Io {
            path,
            source: io::Error::other("filesystem loop"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(0, "0KB")]
    #[case(1, "1KB")]
    #[case(400, "1KB")]
    #[case(2048, "2KB")]
    #[case(999_999, "1MB")]
    #[case(1_000_000, "1MB")]
    #[case(1_500_000, "1.5MB")]
    #[case(2_560_000_000, "2.56GB")]
    #[case(3_000_000_000_000, "3TB")]
    #[case(5_000_000_000_000_000, "5000TB")]
    fn format_size_uses_decimal_units(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }

    #[rstest]
    #[case(2048, "2KB")]
    #[case(1_048_576, "1MB")]
    #[case(1_258_291, "1.2MB")]
    #[case(1_073_741_824, "1GB")]
    fn format_size_with_binary_units(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size_with(bytes, UnitConvention::Binary), expected);
    }

    #[test]
    fn byte_size_displays_formatted_string() {
        assert_eq!(ByteSize(2048).to_string(), "2KB");
        assert_eq!(ByteSize(2048).format(UnitConvention::Binary), "2KB");
    }

    #[test]
    fn file_size_returns_length_of_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        assert_eq!(file_size(&path), ByteSize(2048));
    }

    #[test]
    fn file_size_returns_zero_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.bin");

        assert_eq!(file_size(&path), ByteSize(0));
        assert!(matches!(
            try_file_size(&path),
            Err(FileIoError::NotFound(_))
        ));
    }

    #[test]
    fn directory_size_sums_nested_files_and_skips_hidden_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 1000]).unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        fs::write(dir.path().join("nested/b.bin"), vec![0u8; 500]).unwrap();
        fs::write(dir.path().join("nested/deeper/c.bin"), vec![0u8; 24]).unwrap();
        fs::write(dir.path().join(".hidden"), vec![0u8; 4096]).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/object"), vec![0u8; 4096]).unwrap();

        let size = directory_size(dir.path(), SymlinkPolicy::Skip);

        assert_eq!(size, ByteSize(1524));
        assert_eq!(
            try_directory_size(dir.path(), SymlinkPolicy::Skip).unwrap(),
            ByteSize(1524)
        );
    }

    #[test]
    fn directory_size_of_empty_directory_is_zero() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        assert_eq!(directory_size(dir.path(), SymlinkPolicy::Skip), ByteSize(0));
    }

    #[test]
    fn directory_size_returns_zero_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        assert_eq!(directory_size(&missing, SymlinkPolicy::Skip), ByteSize(0));
        assert!(matches!(
            try_directory_size(&missing, SymlinkPolicy::Skip),
            Err(FileIoError::NotFound(_))
        ));
    }

    #[test]
    fn try_directory_size_rejects_regular_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.bin");
        fs::write(&path, b"abc").unwrap();

        assert_eq!(directory_size(&path, SymlinkPolicy::Skip), ByteSize(0));
        assert!(matches!(
            try_directory_size(&path, SymlinkPolicy::Skip),
            Err(FileIoError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn directory_size_applies_symlink_policy() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("big.bin"), vec![0u8; 10_000]).unwrap();

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("inner")).unwrap();
        fs::write(root.join("inner/a.bin"), vec![0u8; 100]).unwrap();
        std::os::unix::fs::symlink(outside.path().join("big.bin"), root.join("outside.bin"))
            .unwrap();
        std::os::unix::fs::symlink(root.join("inner/a.bin"), root.join("inside.bin")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("inner/loop")).unwrap();

        assert_eq!(directory_size(&root, SymlinkPolicy::Skip), ByteSize(100));
        assert_eq!(
            directory_size(&root, SymlinkPolicy::FollowWithinTree),
            ByteSize(200)
        );
    }
}
