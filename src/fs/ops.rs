//! Folder and file lifecycle operations under a base directory

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::FilesConfig;
use crate::fs::error::FileIoError;
use crate::fs::path::{base_path, build_path};
use crate::fs::size::{self, ByteSize, SymlinkPolicy, UnitConvention};

/// Marker file recognised by backup tools that honour the Cache Directory Tagging standard
const CACHEDIR_TAG: &str = "CACHEDIR.TAG";

const CACHEDIR_TAG_CONTENT: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by jkds-utility.\n\
# For information about cache directory tags, see https://bford.info/cachedir/\n";

/// Returns true if anything exists at `path`.
pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

/// Removes the file or directory (recursively) at `path`.
pub fn delete(path: &Path) -> Result<(), FileIoError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| FileIoError::from_io(path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| FileIoError::from_io(path, e))
}

/// File helpers resolving every relative name against one base directory
#[derive(Debug, Clone, PartialEq)]
pub struct FileUtils {
    base: PathBuf,
    symlinks: SymlinkPolicy,
    units: UnitConvention,
}

impl FileUtils {
    /// Helpers rooted at the platform documents directory.
    pub fn new() -> Self {
        Self::with_base(base_path())
    }

    /// Helpers rooted at `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            symlinks: SymlinkPolicy::default(),
            units: UnitConvention::default(),
        }
    }

    pub fn from_config(config: &FilesConfig) -> Self {
        Self {
            base: config.base_dir(),
            symlinks: config.symlinks,
            units: config.units,
        }
    }

    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    pub fn units(mut self, convention: UnitConvention) -> Self {
        self.units = convention;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn unit_convention(&self) -> UnitConvention {
        self.units
    }

    /// Path of `directory` under the base. A name resolving to the base itself is rejected.
    pub fn directory_url(&self, directory: &str) -> Result<PathBuf, FileIoError> {
        let path = build_path(&self.base, directory, None)?;
        if path == self.base {
            return Err(FileIoError::InvalidPath(directory.to_string()));
        }
        Ok(path)
    }

    /// Path of `file_name` inside `directory` under the base.
    pub fn file_url(&self, directory: &str, file_name: &str) -> Result<PathBuf, FileIoError> {
        build_path(&self.base, directory, Some(file_name))
    }

    /// Creates `directory_name` (and missing parents) under the base.
    ///
    /// Fails with [`FileIoError::AlreadyExists`] if anything is already there.
    pub fn create_folder(&self, directory_name: &str) -> Result<(), FileIoError> {
        let path = self.directory_url(directory_name)?;
        if exists(&path) {
            return Err(FileIoError::AlreadyExists(path));
        }
        fs::create_dir_all(&path).map_err(|e| FileIoError::from_io(&path, e))?;
        debug!("Created folder {:?}", path);
        Ok(())
    }

    /// Removes `directory_name` and everything below it.
    pub fn remove_folder(&self, directory_name: &str) -> Result<(), FileIoError> {
        let path = self.directory_url(directory_name)?;
        debug!("Removing folder {:?}", path);
        fs::remove_dir_all(&path).map_err(|e| FileIoError::from_io(&path, e))
    }

    /// Marks `directory_name` so backup tools skip it.
    ///
    /// Writes a `CACHEDIR.TAG` into the folder; on macOS the folder is also
    /// excluded from Time Machine.
    pub fn exclude_from_backup(&self, directory_name: &str) -> Result<(), FileIoError> {
        let path = self.directory_url(directory_name)?;
        let metadata = fs::metadata(&path).map_err(|e| FileIoError::from_io(&path, e))?;
        if !metadata.is_dir() {
            return Err(FileIoError::Io {
                source: io::Error::other("not a directory"),
                path,
            });
        }

        let tag = path.join(CACHEDIR_TAG);
        fs::write(&tag, CACHEDIR_TAG_CONTENT).map_err(|e| FileIoError::from_io(&tag, e))?;
        platform_exclude(&path)?;

        info!("Excluded {:?} from backup", path);
        Ok(())
    }

    /// Returns true if `file_name` exists inside `directory` under the base.
    pub fn is_exist_file(&self, file_name: &str, directory: &str) -> bool {
        self.file_url(directory, file_name)
            .is_ok_and(|path| exists(&path))
    }

    /// Writes `data` to a new file at `path`.
    ///
    /// Fails with [`FileIoError::AlreadyExists`] if the file is present and with
    /// [`FileIoError::WriteFailed`] for any other failure.
    pub fn create_file(&self, path: &Path, data: &[u8]) -> Result<(), FileIoError> {
        if exists(path) {
            return Err(FileIoError::AlreadyExists(path.to_path_buf()));
        }

        self.create_file_with(path, |file| {
            file.write_all(data)?;
            file.sync_all()
        })
    }

    /// Creates `path` and fills it with `fill`. A failed fill removes the partial file.
    fn create_file_with<F>(&self, path: &Path, fill: F) -> Result<(), FileIoError>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => FileIoError::AlreadyExists(path.to_path_buf()),
                _ => FileIoError::WriteFailed {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        if let Err(source) = fill(&mut file) {
            drop(file);
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to remove partial file {:?}: {}", path, e);
            }
            return Err(FileIoError::WriteFailed {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }

    /// Removes the file at `path`.
    pub fn delete_file(&self, path: &Path) -> Result<(), FileIoError> {
        fs::remove_file(path).map_err(|e| FileIoError::from_io(path, e))
    }

    pub fn file_size(&self, path: &Path) -> ByteSize {
        size::file_size(path)
    }

    pub fn file_size_string(&self, path: &Path) -> String {
        self.file_size(path).format(self.units)
    }

    /// File size in kilobytes of the configured convention, zero if unreadable.
    pub fn file_size_kb(&self, path: &Path) -> f64 {
        self.file_size(path).bytes() as f64 / self.units.step()
    }

    pub fn directory_size(&self, path: &Path) -> ByteSize {
        size::directory_size(path, self.symlinks)
    }

    pub fn directory_size_string(&self, path: &Path) -> String {
        self.directory_size(path).format(self.units)
    }
}

impl Default for FileUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "macos")]
fn platform_exclude(path: &Path) -> Result<(), FileIoError> {
    let status = std::process::Command::new("tmutil")
        .arg("addexclusion")
        .arg(path)
        .status()
        .map_err(|e| FileIoError::from_io(path, e))?;
    if status.success() {
        Ok(())
    } else {
        Err(FileIoError::Io {
            path: path.to_path_buf(),
            source: io::Error::other(format!("tmutil addexclusion exited with {status}")),
        })
    }
}

#[cfg(not(target_os = "macos"))]
fn platform_exclude(_path: &Path) -> Result<(), FileIoError> {
    Ok(())
}
