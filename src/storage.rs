use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use regex::Regex;

/// Longest piece of the client's file name kept in a stored file's name.
const MAX_NAME_HINT: usize = 64;

/// A writable destination for an uploaded file, and where it can be found afterwards.
pub struct TempFile {
    pub writer: Box<dyn Write>,
    pub path: PathBuf,
}

/// Somewhere to put uploaded files while a request is handled.
/// Implementations must hand out distinct paths, even to concurrently handled connections.
pub trait TempStorage {
    /// Creates a new, empty file for an upload of the given field and client file name.
    fn create(&self, field_name: &str, filename: &str) -> std::io::Result<TempFile>;
}

/// Storage writing uploads as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    dir: PathBuf,
}

impl DirectoryStorage {
    pub fn new(dir: impl Into<PathBuf>) -> DirectoryStorage {
        DirectoryStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TempStorage for DirectoryStorage {
    fn create(&self, _field_name: &str, filename: &str) -> std::io::Result<TempFile> {
        let path = self.dir.join(unique_name(filename));
        // create_new so two uploads can never end up sharing a file
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok(TempFile { writer: Box::new(BufWriter::new(file)), path })
    }
}

/// Deletes a stored upload. A file that can't be removed is only logged.
pub fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        debug!("could not remove upload {}: {}", path.display(), err);
    }
}

/// Builds a file name no other upload in any process on this host will get.
fn unique_name(filename: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);

    format!("upload-{}-{}-{}-{}", process::id(), count, nanos, sanitize(filename))
}

/// Makes the client's file name filesystem-friendly.
fn sanitize(filename: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("pattern is valid"));

    let mut name = unsafe_chars.replace_all(filename, "_").into_owned();
    name.truncate(MAX_NAME_HINT);
    name
}
