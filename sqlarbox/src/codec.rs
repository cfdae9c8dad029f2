#[cfg(feature = "deflate")]
use std::io::prelude::*;

#[cfg(feature = "deflate")]
use flate2::read::ZlibDecoder;
#[cfg(feature = "deflate")]
use flate2::write::ZlibEncoder;

use super::util::u64_from_usize;

/// Produce the payload to store for `bytes`.
///
/// Following the reference sqlar implementation, the compressed form is only used when it is
/// actually smaller than the original; otherwise the original bytes are stored verbatim. A reader
/// tells the two apart by comparing the payload length against the recorded uncompressed size.
pub fn encode(bytes: Vec<u8>) -> crate::Result<Vec<u8>> {
    #[cfg(feature = "deflate")]
    {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&bytes)?;
        let compressed = encoder.finish()?;

        if compressed.len() < bytes.len() {
            return Ok(compressed);
        }
    }

    Ok(bytes)
}

/// Restore the original bytes of the entry named `name` from its stored payload.
///
/// A payload whose length equals the recorded `size` is stored uncompressed and is returned
/// as-is. Anything else must inflate back to exactly `size` bytes; a payload that does not is
/// reported as [`CorruptEntry`] rather than silently truncated or padded.
///
/// [`CorruptEntry`]: crate::Error::CorruptEntry
pub fn decode(name: &str, data: Vec<u8>, size: u64) -> crate::Result<Vec<u8>> {
    if u64_from_usize(data.len()) == size {
        return Ok(data);
    }

    #[cfg(feature = "deflate")]
    {
        let mut decoder = ZlibDecoder::new(data.as_slice());
        let mut bytes = Vec::new();

        decoder
            .read_to_end(&mut bytes)
            .map_err(|_| crate::Error::CorruptEntry {
                name: name.to_owned(),
            })?;

        if u64_from_usize(bytes.len()) != size {
            return Err(crate::Error::CorruptEntry {
                name: name.to_owned(),
            });
        }

        Ok(bytes)
    }

    #[cfg(not(feature = "deflate"))]
    {
        let _ = name;
        Err(crate::Error::CompressionNotSupported)
    }
}
