//! AList file handle
//!
//! [`AListFile`] wraps the signed download URL returned by `/api/fs/get`
//! and buffers the remote content in a spool: small files stay in memory,
//! anything past [`SPOOL_MEMORY_LIMIT`] spills to an anonymous temp file
//! driven through `tokio::fs`. `open`/`close` are the async scoped
//! entry/exit hooks the blocking façade bridges.

use std::io::SeekFrom;
use std::path::Path;

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::{check_response, AListError};
use crate::types::FsGetData;
use crate::utils::name_of;

/// Bytes a spool holds in memory before spilling to a temp file (10 MiB).
pub const SPOOL_MEMORY_LIMIT: usize = 10 * 1024 * 1024;

/// Download buffer: in memory until [`SPOOL_MEMORY_LIMIT`], then an
/// anonymous temp file.
enum Spool {
    Memory(Vec<u8>),
    Disk(tokio::fs::File),
}

/// Lifecycle of a file handle. A closed handle never reopens.
enum FileState {
    Unopened,
    Open { spool: Spool, pos: u64 },
    Closed,
}

/// Handle to a remote file.
///
/// Metadata accessors are plain; all I/O is async. The handle must be
/// [`open`](AListFile::open)ed before positioned reads, and once
/// [`close`](AListFile::close)d it stays closed.
pub struct AListFile {
    path: String,
    name: String,
    size: u64,
    provider: String,
    modified: String,
    created: String,
    url: String,
    sign: String,
    raw: FsGetData,
    client: Client,
    state: FileState,
}

impl AListFile {
    /// Build a handle from `/api/fs/get` data. Downloads go through the
    /// redirect-following client; raw URLs often point at the storage
    /// provider indirectly.
    #[must_use]
    pub(crate) fn from_fs_get(path: &str, raw: FsGetData) -> Self {
        let client = crate::client::download_client();
        Self {
            path: path.to_string(),
            name: raw.name.clone(),
            size: raw.size,
            provider: raw.provider.clone(),
            modified: raw.modified.clone(),
            created: raw.created.clone(),
            url: raw.raw_url.clone(),
            sign: raw.sign.clone(),
            raw,
            client,
            state: FileState::Unopened,
        }
    }

    /// Build a handle directly from a remote path and a download URL,
    /// without a `/api/fs/get` round trip.
    #[must_use]
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        let path = path.into();
        let raw = FsGetData {
            name: name_of(&path),
            size: 0,
            is_dir: false,
            modified: String::new(),
            created: String::new(),
            sign: String::new(),
            thumb: String::new(),
            r#type: 0,
            raw_url: url.into(),
            readme: String::new(),
            header: String::new(),
            provider: String::new(),
            related: None,
        };
        Self::from_fs_get(&path, raw)
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current size in bytes; tracks truncation, not the server.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Modification time as the server's RFC 3339 string.
    #[must_use]
    pub fn modified(&self) -> &str {
        &self.modified
    }

    #[must_use]
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Signed raw download URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn sign(&self) -> &str {
        &self.sign
    }

    /// The raw `/api/fs/get` payload this handle was built from.
    #[must_use]
    pub const fn raw(&self) -> &FsGetData {
        &self.raw
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, FileState::Open { .. })
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, FileState::Closed)
    }

    /// Scoped entry: download the remote content into a fresh spool.
    ///
    /// A no-op on an already-open handle; a closed handle fails with
    /// [`AListError::FileClosed`].
    pub async fn open(&mut self) -> Result<(), AListError> {
        match self.state {
            FileState::Closed => Err(AListError::FileClosed),
            FileState::Open { .. } => Ok(()),
            FileState::Unopened => self.download().await,
        }
    }

    /// (Re-)fetch the signed URL into the spool, resetting position and
    /// size to match the downloaded content.
    pub async fn download(&mut self) -> Result<(), AListError> {
        if self.is_closed() {
            return Err(AListError::FileClosed);
        }
        if self.url.is_empty() {
            return Err(AListError::Download(format!("no raw url for {}", self.path)));
        }
        tracing::debug!(url = %self.url, path = %self.path, "alist file download");
        let response = self.client.get(&self.url).send().await?;
        let mut response = check_response(response)?;

        let mut spool = Spool::Memory(Vec::new());
        let mut len: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            len += chunk.len() as u64;
            spool = match spool {
                Spool::Memory(mut buf) => {
                    buf.extend_from_slice(&chunk);
                    if buf.len() > SPOOL_MEMORY_LIMIT {
                        // Spill: move what we have into an anonymous temp
                        // file and keep streaming there.
                        let mut file = tokio::fs::File::from_std(tempfile::tempfile()?);
                        file.write_all(&buf).await?;
                        Spool::Disk(file)
                    } else {
                        Spool::Memory(buf)
                    }
                }
                Spool::Disk(mut file) => {
                    file.write_all(&chunk).await?;
                    Spool::Disk(file)
                }
            };
        }
        if let Spool::Disk(ref mut file) = spool {
            file.flush().await?;
            file.seek(SeekFrom::Start(0)).await?;
        }
        self.size = len;
        self.state = FileState::Open { spool, pos: 0 };
        Ok(())
    }

    fn spool_mut(&mut self) -> Result<(&mut Spool, &mut u64), AListError> {
        match self.state {
            FileState::Unopened => Err(AListError::FileNotOpened),
            FileState::Closed => Err(AListError::FileClosed),
            FileState::Open { ref mut spool, ref mut pos } => Ok((spool, pos)),
        }
    }

    /// Read up to `n` bytes from the current position.
    ///
    /// Returns fewer bytes at end of spool; an empty vec at the end.
    pub async fn read(&mut self, n: usize) -> Result<Vec<u8>, AListError> {
        let size = self.size;
        let (spool, pos) = self.spool_mut()?;
        let remaining = size.saturating_sub(*pos);
        let want = (n as u64).min(remaining) as usize;
        if want == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; want];
        match spool {
            Spool::Memory(data) => {
                let start = *pos as usize;
                buf.copy_from_slice(&data[start..start + want]);
            }
            Spool::Disk(file) => {
                file.seek(SeekFrom::Start(*pos)).await?;
                file.read_exact(&mut buf).await?;
            }
        }
        *pos += want as u64;
        Ok(buf)
    }

    /// Read everything from the current position to the end.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>, AListError> {
        let remaining = {
            let size = self.size;
            let (_, pos) = self.spool_mut()?;
            size.saturating_sub(*pos) as usize
        };
        self.read(remaining).await
    }

    /// Reposition the read cursor; returns the new position.
    ///
    /// Seeking past the end is allowed (reads there return nothing);
    /// seeking before the start is an error, matching `std::io` semantics.
    pub async fn seek(&mut self, seek: SeekFrom) -> Result<u64, AListError> {
        let size = self.size;
        let (_, pos) = self.spool_mut()?;
        let base = match seek {
            SeekFrom::Start(offset) => {
                *pos = offset;
                return Ok(*pos);
            }
            SeekFrom::Current(delta) => (*pos, delta),
            SeekFrom::End(delta) => (size, delta),
        };
        let new = base.0.checked_add_signed(base.1).ok_or_else(|| {
            AListError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of file",
            ))
        })?;
        *pos = new;
        Ok(new)
    }

    /// Shrink the spooled content to `len` bytes.
    ///
    /// Growing is not supported; a `len` past the current size leaves the
    /// spool unchanged. The read cursor is clamped to the new end.
    pub async fn truncate(&mut self, len: u64) -> Result<(), AListError> {
        let size = self.size;
        let (spool, pos) = self.spool_mut()?;
        if len >= size {
            return Ok(());
        }
        match spool {
            Spool::Memory(data) => data.truncate(len as usize),
            Spool::Disk(file) => file.set_len(len).await?,
        }
        if *pos > len {
            *pos = len;
        }
        self.size = len;
        Ok(())
    }

    /// Flush the spool's backing storage.
    pub async fn flush(&mut self) -> Result<(), AListError> {
        let (spool, _) = self.spool_mut()?;
        if let Spool::Disk(file) = spool {
            file.flush().await?;
        }
        Ok(())
    }

    /// Write the full spooled content to a local file, leaving the read
    /// cursor where it was.
    pub async fn save(&mut self, local: impl AsRef<Path>) -> Result<(), AListError> {
        let (spool, pos) = self.spool_mut()?;
        let saved_pos = *pos;
        let mut out = tokio::fs::File::create(local).await?;
        match spool {
            Spool::Memory(data) => out.write_all(data).await?,
            Spool::Disk(file) => {
                file.seek(SeekFrom::Start(0)).await?;
                tokio::io::copy(file, &mut out).await?;
                file.seek(SeekFrom::Start(saved_pos)).await?;
            }
        }
        out.flush().await?;
        Ok(())
    }

    /// Scoped exit: release the spool. Idempotent; the handle cannot be
    /// reopened afterwards.
    pub async fn close(&mut self) -> Result<(), AListError> {
        // Dropping the spool releases the buffer or temp file; nothing to
        // flush back to the server (the handle is read-only remote-side).
        self.state = FileState::Closed;
        Ok(())
    }
}

impl std::fmt::Debug for AListFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AListFile")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("provider", &self.provider)
            .field("open", &self.is_open())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_with_content(content: &[u8]) -> AListFile {
        let mut file = AListFile::new("/test.bin", "http://unused.invalid/test.bin");
        file.size = content.len() as u64;
        file.state = FileState::Open {
            spool: Spool::Memory(content.to_vec()),
            pos: 0,
        };
        file
    }

    #[tokio::test]
    async fn test_read_and_seek() {
        let mut file = open_with_content(b"hello world");
        assert_eq!(file.read(5).await.unwrap(), b"hello");
        assert_eq!(file.seek(SeekFrom::Current(1)).await.unwrap(), 6);
        assert_eq!(file.read_to_end().await.unwrap(), b"world");
        // Past the end reads nothing, even after seeking beyond it.
        assert_eq!(file.read(10).await.unwrap(), b"");
        file.seek(SeekFrom::Start(100)).await.unwrap();
        assert_eq!(file.read(10).await.unwrap(), b"");
        assert_eq!(file.seek(SeekFrom::Start(0)).await.unwrap(), 0);
        assert_eq!(file.read_to_end().await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_seek_from_end() {
        let mut file = open_with_content(b"0123456789");
        assert_eq!(file.seek(SeekFrom::End(-4)).await.unwrap(), 6);
        assert_eq!(file.read(4).await.unwrap(), b"6789");
    }

    #[tokio::test]
    async fn test_seek_before_start_fails() {
        let mut file = open_with_content(b"abc");
        assert!(matches!(
            file.seek(SeekFrom::Current(-1)).await,
            Err(AListError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_truncate() {
        let mut file = open_with_content(b"hello world");
        file.seek(SeekFrom::Start(8)).await.unwrap();
        file.truncate(5).await.unwrap();
        assert_eq!(file.size(), 5);
        // Cursor clamps to the new end.
        assert_eq!(file.read_to_end().await.unwrap(), b"");
        file.seek(SeekFrom::Start(0)).await.unwrap();
        assert_eq!(file.read_to_end().await.unwrap(), b"hello");
        // Truncating past the end is a no-op.
        file.truncate(100).await.unwrap();
        assert_eq!(file.size(), 5);
    }

    #[tokio::test]
    async fn test_unopened_errors() {
        let mut file = AListFile::new("/test.bin", "http://unused.invalid/test.bin");
        assert!(!file.is_open());
        assert!(matches!(file.read(1).await, Err(AListError::FileNotOpened)));
        assert!(matches!(
            file.seek(SeekFrom::Start(0)).await,
            Err(AListError::FileNotOpened)
        ));
        assert!(matches!(file.flush().await, Err(AListError::FileNotOpened)));
    }

    #[tokio::test]
    async fn test_closed_errors_and_idempotent_close() {
        let mut file = open_with_content(b"data");
        file.close().await.unwrap();
        assert!(file.is_closed());
        // Idempotent.
        file.close().await.unwrap();
        assert!(matches!(file.read(1).await, Err(AListError::FileClosed)));
        assert!(matches!(file.open().await, Err(AListError::FileClosed)));
        assert!(matches!(file.download().await, Err(AListError::FileClosed)));
    }

    #[tokio::test]
    async fn test_save_restores_position() {
        let mut file = open_with_content(b"saved content");
        file.seek(SeekFrom::Start(6)).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.bin");
        file.save(&out).await.unwrap();
        assert_eq!(tokio::fs::read(&out).await.unwrap(), b"saved content");
        // Position untouched by save.
        assert_eq!(file.read_to_end().await.unwrap(), b"content");
    }

    #[tokio::test]
    async fn test_disk_spool_io() {
        // Force the disk variant without a 10 MiB fixture.
        let content = b"spilled to disk";
        let mut disk = tokio::fs::File::from_std(tempfile::tempfile().unwrap());
        disk.write_all(content).await.unwrap();
        disk.seek(SeekFrom::Start(0)).await.unwrap();
        let mut file = AListFile::new("/big.bin", "http://unused.invalid/big.bin");
        file.size = content.len() as u64;
        file.state = FileState::Open {
            spool: Spool::Disk(disk),
            pos: 0,
        };

        assert_eq!(file.read(7).await.unwrap(), b"spilled");
        file.seek(SeekFrom::End(-4)).await.unwrap();
        assert_eq!(file.read_to_end().await.unwrap(), b"disk");
        file.truncate(7).await.unwrap();
        file.seek(SeekFrom::Start(0)).await.unwrap();
        assert_eq!(file.read_to_end().await.unwrap(), b"spilled");
    }

    #[test]
    fn test_new_derives_name() {
        let file = AListFile::new("/docs/report.pdf", "http://h/d/report.pdf?sign=x");
        assert_eq!(file.name(), "report.pdf");
        assert_eq!(file.path(), "/docs/report.pdf");
        assert_eq!(file.url(), "http://h/d/report.pdf?sign=x");
    }
}
