//! Filesystem abstraction layer for testability
//!
//! The builder and the allowlist loader read cache files and write output
//! files through the [`FileSystem`] trait, so tests can substitute a mock
//! generated by mockall instead of touching the real filesystem.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting filesystem operations for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use listforge::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_read()
///     .returning(|_| Ok(b"0.0.0.0 ads.example.com".to_vec()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to a file, creating or truncating it.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}

/// Read a file as text, dropping invalid UTF-8 sequences.
///
/// Blocklists in the wild are not always clean UTF-8; a bad byte must not
/// discard the rest of the list, nor leave a replacement character inside
/// a domain.
pub fn read_lossy<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> io::Result<String> {
    let bytes = fs.read(path)?;
    Ok(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_read_write() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        let fs = RealFileSystem;
        fs.write(&file_path, b"||ads.example.com^").unwrap();

        let content = fs.read(&file_path).unwrap();
        assert_eq!(content, b"||ads.example.com^");
    }

    #[test]
    fn test_real_fs_create_dir_all() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("ads/cache");

        let fs = RealFileSystem;
        fs.create_dir_all(&nested_path).unwrap();
        assert!(nested_path.is_dir());
    }

    #[test]
    fn test_real_fs_read_nonexistent() {
        let fs = RealFileSystem;
        let result = fs.read(Path::new("/nonexistent/path/file.txt"));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_read_lossy_drops_invalid_utf8() {
        let mut mock_fs = MockFileSystem::new();
        mock_fs
            .expect_read()
            .returning(|_| Ok(vec![b'a', 0xff, b'b']));

        let text = read_lossy(&mock_fs, Path::new("list.txt")).unwrap();
        assert_eq!(text, "ab");
    }

    #[test]
    fn test_read_lossy_keeps_valid_replacement_char() {
        // An encoded U+FFFD is content, not a decoding error
        let mut mock_fs = MockFileSystem::new();
        mock_fs
            .expect_read()
            .returning(|_| Ok(b"a\xef\xbf\xbdb\xff".to_vec()));

        let text = read_lossy(&mock_fs, Path::new("list.txt")).unwrap();
        assert_eq!(text, "a\u{fffd}b");
    }

    #[test]
    fn test_real_fs_singleton() {
        let a = real_fs() as *const RealFileSystem;
        let b = real_fs() as *const RealFileSystem;
        assert_eq!(a, b);
    }
}
