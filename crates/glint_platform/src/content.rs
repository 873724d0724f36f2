//! Content locator
//!
//! Resolves resource names to byte streams. An absent resource is a normal
//! `Ok(None)` outcome; only actual I/O failures are errors.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::{PlatformError, Result};

/// Opens byte streams for named resources.
///
/// Shared across loader worker threads, hence `Send + Sync`.
pub trait ContentSource: Send + Sync {
    /// Open a stream for `name`, or `None` when no such resource exists.
    fn open(&self, name: &str) -> Result<Option<Box<dyn Read + Send>>>;
}

/// Filesystem-backed content source rooted at a directory.
pub struct DirContentSource {
    root: PathBuf,
}

impl DirContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirContentSource {
    fn open(&self, name: &str) -> Result<Option<Box<dyn Read + Send>>> {
        let path = self.root.join(name);
        match File::open(&path) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PlatformError::AssetLoad(format!(
                "{}: {err}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_is_none_not_error() {
        let source = DirContentSource::new(std::env::temp_dir());
        let stream = source.open("glint-no-such-resource.bin").unwrap();
        assert!(stream.is_none());
    }

    #[test]
    fn existing_resource_opens_a_stream() {
        let dir = std::env::temp_dir();
        let name = "glint-content-source-test.bin";
        std::fs::write(dir.join(name), b"payload").unwrap();

        let source = DirContentSource::new(&dir);
        let mut stream = source.open(name).unwrap().unwrap();
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, b"payload");

        std::fs::remove_file(dir.join(name)).unwrap();
    }
}
