//! Gzip + tar unwrapping of index archives.
//!
//! An index archive is one or more concatenated gzip members which together
//! form a tar stream. Only the member named [`INDEX_MEMBER`] is of interest;
//! every other member (signatures, `DESCRIPTION`) is skipped by the tar reader
//! without being buffered. Once the index has been read the rest of the stream
//! is drained, so the gzip CRC and length trailers are always checked.

use std::io::{self, BufRead, BufReader, Read};

use flate2::read::MultiGzDecoder;
use tar::Archive;
use tracing::trace;

use super::error::IndexError;

/// Conventional name of the index member inside the archive.
pub const INDEX_MEMBER: &str = "APKINDEX";

/// Gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Locate `member` inside a gzip-compressed tar stream and hand its bytes to
/// `visit`.
///
/// The member stream is only valid for the duration of the callback, which
/// keeps the borrow of the tar reader scoped. The callback's result is only
/// returned after the remaining stream has been decoded to its end.
///
/// # Errors
///
/// - [`IndexError::NotGzip`] if the stream does not start with a gzip header
/// - [`IndexError::Truncated`] / [`IndexError::Corrupt`] for damaged layers,
///   including a checksum mismatch or a cut trailer after the member
/// - [`IndexError::MemberNotFound`] if the tar stream ends without `member`
pub fn with_member<R, T, F>(reader: R, member: &str, visit: F) -> Result<T, IndexError>
where
    R: Read,
    F: FnOnce(&mut dyn Read) -> Result<T, IndexError>,
{
    let mut reader = BufReader::new(reader);

    // Peek the header so a wrong content type is reported as such rather than
    // as a generic decode failure further down.
    let head = reader.fill_buf().map_err(IndexError::Io)?;
    if head.len() < GZIP_MAGIC.len() {
        return Err(if head.is_empty() {
            IndexError::Truncated
        } else {
            IndexError::NotGzip
        });
    }
    if head[..2] != GZIP_MAGIC {
        return Err(IndexError::NotGzip);
    }

    let mut archive = Archive::new(MultiGzDecoder::new(reader));
    let mut found = None;

    for entry in archive.entries().map_err(IndexError::from_decode)? {
        let mut entry = entry.map_err(IndexError::from_decode)?;
        let path = entry.path_bytes();
        trace!(member = %String::from_utf8_lossy(&path), "tar member");

        if path.as_ref() == member.as_bytes() {
            found = Some(visit(&mut entry)?);
            break;
        }
    }

    let Some(value) = found else {
        return Err(IndexError::MemberNotFound {
            member: member.to_string(),
        });
    };

    // flate2 verifies CRC32 and ISIZE only when a gzip member ends.
    io::copy(&mut archive.into_inner(), &mut io::sink()).map_err(IndexError::from_decode)?;

    Ok(value)
}
