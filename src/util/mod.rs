/// Basic thread pool utility.
pub mod thread_pool;

/// Utility for creating mock trait implementations.
#[cfg(test)]
pub mod mock;

/// Creates an empty directory for the named test under the system temp directory.
#[cfg(test)]
pub fn test_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir()
        .join("littleserver-tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
