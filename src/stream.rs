use crate::{Error, Result};
use std::io::{self, Read};

/// Declared bound for a stream parameter.
///
/// `Exactly(n)` is a data-integrity contract: the materialized value must
/// contain exactly `n` units (bytes for binary sources, decoded characters
/// for text). `Unbounded` drains to end of stream with no check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamLimit {
    Unbounded,
    Exactly(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii,
    Utf8,
}

/// Drain a binary stream into a single in-memory value.
///
/// Materialization blocks the calling thread until the source is exhausted
/// or fails; there is no cancellation hook. A missing stream binds SQL NULL
/// unless a non-zero length was declared for it, which is a caller contract
/// violation reported before any read.
pub fn read_binary<R: Read>(stream: Option<R>, limit: StreamLimit) -> Result<Option<Box<[u8]>>> {
    let Some(stream) = stream else {
        return null_stream(limit);
    };
    Ok(Some(drain(stream, limit)?.into_boxed_slice()))
}

/// Drain a byte stream carrying text into a `String`.
///
/// ASCII sources are bounded and counted in bytes (one byte per character);
/// UTF-8 sources are drained in full and the declared length is checked
/// against the decoded character count, since a multi-byte source cannot be
/// pre-bounded by characters.
pub fn read_text<R: Read>(
    stream: Option<R>,
    limit: StreamLimit,
    encoding: TextEncoding,
) -> Result<Option<String>> {
    let Some(stream) = stream else {
        return null_stream(limit);
    };
    let buf = match encoding {
        TextEncoding::Ascii => drain(stream, limit)?,
        TextEncoding::Utf8 => drain(stream, StreamLimit::Unbounded)?,
    };
    if encoding == TextEncoding::Ascii && !buf.is_ascii() {
        return Err(Error::StreamRead(io::Error::new(
            io::ErrorKind::InvalidData,
            "ascii stream contains non-ascii bytes",
        )));
    }
    let text = String::from_utf8(buf)
        .map_err(|e| Error::StreamRead(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    if encoding == TextEncoding::Utf8
        && let StreamLimit::Exactly(declared) = limit
    {
        let actual = text.chars().count() as u64;
        if actual != declared {
            return Err(Error::StreamLengthMismatch { declared, actual });
        }
    }
    Ok(Some(text))
}

fn null_stream<T>(limit: StreamLimit) -> Result<Option<T>> {
    match limit {
        StreamLimit::Exactly(declared) if declared > 0 => {
            Err(Error::InvalidStreamLength { declared })
        }
        _ => Ok(None),
    }
}

/// The source is pre-bounded to the declared length before reading, so an
/// over-long stream is simply cut off and only an under-read is observable
/// as a mismatch.
fn drain<R: Read>(stream: R, limit: StreamLimit) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match limit {
        StreamLimit::Unbounded => {
            let mut stream = stream;
            stream.read_to_end(&mut buf)?;
        }
        StreamLimit::Exactly(declared) => {
            stream.take(declared).read_to_end(&mut buf)?;
            let actual = buf.len() as u64;
            if actual != declared {
                return Err(Error::StreamLengthMismatch { declared, actual });
            }
        }
    }
    Ok(buf)
}
