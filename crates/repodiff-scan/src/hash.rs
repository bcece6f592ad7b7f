//! Streaming BLAKE3 content hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;

use repodiff_core::ContentHash;

/// Read buffer size; bounds memory per file regardless of file size.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hash a file's full content, returning the digest and the bytes read.
pub fn hash_file(path: &Path) -> io::Result<(ContentHash, u64)> {
    let file = File::open(path)?;
    hash_reader(file)
}

/// Hash everything a reader yields.
pub fn hash_reader(mut reader: impl Read) -> io::Result<(ContentHash, u64)> {
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    Ok((ContentHash::new(*hasher.finalize().as_bytes()), total))
}

/// Hash an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    ContentHash::new(*blake3::hash(bytes).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_file_matches_in_memory_hash() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        let content: Vec<u8> = (0..(HASH_BUFFER_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        let (hash, size) = hash_file(&path).unwrap();
        assert_eq!(size, content.len() as u64);
        assert_eq!(hash, hash_bytes(&content));
    }

    #[test]
    fn test_different_content_different_hash() {
        assert_ne!(hash_bytes(b"hello"), hash_bytes(b"hello\n"));
        assert_eq!(hash_bytes(b""), hash_reader(io::empty()).unwrap().0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(hash_file(&temp.path().join("missing")).is_err());
    }
}
