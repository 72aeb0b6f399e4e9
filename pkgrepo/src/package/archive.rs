//! Reading and writing package archives.
//!
//! Archives are gzip-compressed tarballs. Only the descriptor is read when
//! indexing; the rest of the payload is opaque to the repository.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::descriptor::{parse_descriptor, serialize_descriptor, PackageDescriptor};
use super::{ArtifactError, ArtifactResult};

/// Descriptor file name inside an archive.
pub const DESCRIPTOR_FILENAME: &str = "package.toml";

/// File extensions recognized as package artifacts.
pub const ARTIFACT_EXTENSIONS: &[&str] = &["pkg", "tgz"];

/// Returns true if the path looks like a package artifact.
///
/// Hidden files are never artifacts. The extension check is
/// case-insensitive.
pub fn is_artifact_path(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    if file_name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            ARTIFACT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Read the embedded descriptor from an artifact.
///
/// Failing to open or read the file is an [`ArtifactError::Io`]. Anything
/// wrong with the archive contents is reported as
/// [`ArtifactError::Malformed`] or [`ArtifactError::InvalidDescriptor`].
pub fn read_descriptor(path: &Path) -> ArtifactResult<PackageDescriptor> {
    let file = File::open(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let decode_err = |e: io::Error| classify_decode_error(path, e);

    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let entries = archive.entries().map_err(decode_err)?;

    for entry in entries {
        let mut entry = entry.map_err(decode_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path().map_err(decode_err)?.into_owned();
        if !is_descriptor_entry(&entry_path) {
            continue;
        }

        let mut content = String::new();
        entry.read_to_string(&mut content).map_err(decode_err)?;
        return parse_descriptor(&content);
    }

    Err(ArtifactError::Malformed {
        path: path.to_path_buf(),
        reason: format!("no {} found", DESCRIPTOR_FILENAME),
    })
}

/// Split errors raised while decoding an archive.
///
/// flate2 and tar pass errors from the underlying file through untouched,
/// so those still carry an OS error code. Errors the decoders raise
/// themselves (bad header, corrupt stream, truncated block) do not.
fn classify_decode_error(path: &Path, e: io::Error) -> ArtifactError {
    if e.raw_os_error().is_some() {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    } else {
        ArtifactError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

/// Descriptors live at the archive root or one directory deep.
fn is_descriptor_entry(entry_path: &Path) -> bool {
    let parts: Vec<&OsStr> = entry_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    parts.len() <= 2 && parts.last() == Some(&OsStr::new(DESCRIPTOR_FILENAME))
}

/// Write an archive containing the descriptor and the given payload files.
///
/// Entries are placed under `<name>/`. Timestamps are zeroed so identical
/// inputs produce identical bytes.
pub fn write_archive(
    descriptor: &PackageDescriptor,
    files: &[(&str, &[u8])],
    dest: &Path,
) -> ArtifactResult<()> {
    let write_err = |e: io::Error| ArtifactError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    };

    let content = serialize_descriptor(descriptor)?;

    let file = File::create(dest).map_err(write_err)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    append_file(
        &mut builder,
        &format!("{}/{}", descriptor.name, DESCRIPTOR_FILENAME),
        content.as_bytes(),
    )
    .map_err(write_err)?;

    for (name, data) in files {
        append_file(&mut builder, &format!("{}/{}", descriptor.name, name), data)
            .map_err(write_err)?;
    }

    let encoder = builder.into_inner().map_err(write_err)?;
    encoder.finish().map_err(write_err)?;
    Ok(())
}

fn append_file<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) -> io::Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder.append_data(&mut header, path, data)
}

/// Calculate SHA-256 checksum of a file.
///
/// Returns the checksum as a lowercase hex string.
pub fn calculate_sha256(path: &Path) -> ArtifactResult<String> {
    use sha2::{Digest, Sha256};

    let read_err = |e: io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
