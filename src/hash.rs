//! File content hashing using streaming xxHash64.
//!
//! Digests are the big-endian byte encoding of the 64-bit state,
//! hex-encoded lowercase. The same primitive hashes file content,
//! internal tree nodes, and the empty-tree marker, so every digest in a
//! tree is comparable.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Read buffer size for streaming. Memory use stays flat regardless of
/// file size.
const BUFFER_SIZE: usize = 32 * 1024;

/// Hash arbitrary bytes with the tree's digest primitive.
pub fn digest(data: &[u8]) -> String {
    hex::encode(xxh64(data, 0).to_be_bytes())
}

/// Combine two hex digests into a parent digest: decode both, concatenate
/// the raw bytes, and hash the concatenation.
pub fn combine(left: &str, right: &str) -> Result<String, hex::FromHexError> {
    let mut combined = hex::decode(left)?;
    combined.extend(hex::decode(right)?);
    Ok(digest(&combined))
}

/// Compute the content digest of the file at `path`.
///
/// The file is read through a bounded buffer and fed into a streaming
/// hasher, so identical content yields an identical digest no matter how
/// the reads split up. Open and read failures surface verbatim; there are
/// no retries.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh64::new(0);
    let mut buf = vec![0u8; BUFFER_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.digest().to_be_bytes()))
}
