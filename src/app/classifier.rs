use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

/// Classifies a file as binary from its first [`SNIFF_LEN`] bytes.
///
/// A NUL byte or invalid UTF-8 means binary. When the sample was cut at the
/// limit, an incomplete trailing multi-byte sequence is not held against the
/// file; a file that really ends mid-sequence is still binary.
pub fn is_binary(path: &Path) -> io::Result<bool> {
    let mut buf = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut buf)?;

    let truncated = buf.len() == SNIFF_LEN && has_more(path)?;
    Ok(is_binary_sample(&buf, truncated))
}

fn has_more(path: &Path) -> io::Result<bool> {
    Ok(path.metadata()?.len() > SNIFF_LEN as u64)
}

fn is_binary_sample(sample: &[u8], truncated: bool) -> bool {
    if sample.contains(&0) {
        return true;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => false,
        // `error_len() == None` means the input ended inside a sequence.
        Err(e) => !(truncated && e.error_len().is_none()),
    }
}
