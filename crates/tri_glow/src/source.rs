use std::{
    borrow::Cow,
    fs::File,
    io::{Read as _, Seek as _, SeekFrom},
    path::{Path, PathBuf},
};

use crate::IoError;

/// The full contents of a shader source file, followed by a single `0` byte.
///
/// A `SourceBuffer` is only ever produced complete: if anything goes wrong while reading,
/// [`load_text`] returns an error instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceBuffer {
    path: PathBuf,

    /// File bytes plus the terminator. Never empty.
    bytes: Vec<u8>,
}

impl SourceBuffer {
    /// Where this source was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file contents, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// The file contents including the trailing `0`.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the file in bytes (not counting the terminator).
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The source as text. Invalid UTF-8 is replaced, and left for the shader compiler to reject.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

/// Read the whole file at `path` into a null-terminated buffer.
///
/// # Errors
/// [`IoError::Open`] if the file cannot be opened, [`IoError::Seek`] if its size cannot be
/// determined, and [`IoError::Read`] if reading fails or returns fewer bytes than expected.
pub fn load_text(path: impl AsRef<Path>) -> Result<SourceBuffer, IoError> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_owned(),
        source,
    })?;
    if file.metadata().is_ok_and(|metadata| metadata.is_dir()) {
        return Err(IoError::Open {
            path: path.to_owned(),
            source: std::io::ErrorKind::IsADirectory.into(),
        });
    }

    let seek_err = |source| IoError::Seek {
        path: path.to_owned(),
        source,
    };
    let out_of_memory = |err| std::io::Error::new(std::io::ErrorKind::OutOfMemory, err);

    let size = file.seek(SeekFrom::End(0)).map_err(seek_err)?;
    file.seek(SeekFrom::Start(0)).map_err(seek_err)?;
    let size = usize::try_from(size)
        .ok()
        .filter(|&size| size < usize::MAX)
        .ok_or_else(|| seek_err(std::io::ErrorKind::OutOfMemory.into()))?;

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size + 1)
        .map_err(|err| seek_err(out_of_memory(err)))?;
    bytes.resize(size + 1, 0);

    file.read_exact(&mut bytes[..size])
        .map_err(|source| IoError::Read {
            path: path.to_owned(),
            source,
        })?;
    bytes[size] = 0;

    log::debug!("Loaded {} ({size} bytes)", path.display());

    Ok(SourceBuffer {
        path: path.to_owned(),
        bytes,
    })
}
