//! Path construction under the base directory

use std::path::{Component, Path, PathBuf};

use crate::config::documents_dir;
use crate::fs::error::FileIoError;

/// Returns the platform's user documents directory.
pub fn base_path() -> PathBuf {
    documents_dir()
}

/// Joins `dir` (and optionally `file`) onto `base` without touching the file system.
///
/// `dir` may contain `/`-separated sub folders. Empty components are ignored, so
/// `build_path(base, "", None)` is `base` itself. Any segment that would leave `base`
/// (`..`, an absolute path, a drive prefix) is rejected with [`FileIoError::InvalidPath`].
pub fn build_path(base: &Path, dir: &str, file: Option<&str>) -> Result<PathBuf, FileIoError> {
    let mut path = base.to_path_buf();
    push_relative(&mut path, dir)?;
    if let Some(file) = file {
        if file.is_empty() {
            return Err(FileIoError::InvalidPath(file.to_string()));
        }
        push_relative(&mut path, file)?;
    }
    Ok(path)
}

fn push_relative(path: &mut PathBuf, segment: &str) -> Result<(), FileIoError> {
    for component in Path::new(segment).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FileIoError::InvalidPath(segment.to_string()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("test", None, "/base/test")]
    #[case("test", Some("test.png"), "/base/test/test.png")]
    #[case("a/b/c", Some("d.bin"), "/base/a/b/c/d.bin")]
    #[case("./a/", None, "/base/a")]
    #[case("", Some("20482"), "/base/20482")]
    #[case("", None, "/base")]
    fn build_path_joins_segments_under_base(
        #[case] dir: &str,
        #[case] file: Option<&str>,
        #[case] expected: &str,
    ) {
        let path = build_path(Path::new("/base"), dir, file).unwrap();
        assert_eq!(path, PathBuf::from(expected));
    }

    #[rstest]
    #[case("../x", None)]
    #[case("a/../../x", None)]
    #[case("/etc", None)]
    #[case("ok", Some("../escape"))]
    #[case("ok", Some(""))]
    fn build_path_rejects_segments_escaping_base(#[case] dir: &str, #[case] file: Option<&str>) {
        let result = build_path(Path::new("/base"), dir, file);
        assert!(matches!(result, Err(FileIoError::InvalidPath(_))));
    }

    #[test]
    fn base_path_is_documents_dir() {
        assert_eq!(base_path(), documents_dir());
    }
}
