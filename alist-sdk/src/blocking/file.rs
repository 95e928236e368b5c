//! Blocking file-handle delegation
//!
//! `Blocking<AListFile>` bridges the async scoped entry/exit (`open`/
//! `close`) and the positioned I/O, and additionally implements
//! `std::io::Read` and `std::io::Seek` so the handle drops into any std
//! I/O consumer (`BufReader`, `io::copy`, ...).

use std::io::SeekFrom;
use std::path::Path;

use super::{bridge, Blocking, IntoBlocking};
use crate::error::AListError;
use crate::types::FsGetData;

impl IntoBlocking for crate::AListFile {}

impl Blocking<crate::AListFile> {
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.path()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.inner.size()
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.inner.provider()
    }

    #[must_use]
    pub fn modified(&self) -> &str {
        self.inner.modified()
    }

    #[must_use]
    pub fn created(&self) -> &str {
        self.inner.created()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.inner.url()
    }

    #[must_use]
    pub fn sign(&self) -> &str {
        self.inner.sign()
    }

    #[must_use]
    pub const fn raw(&self) -> &FsGetData {
        self.inner.raw()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Scoped entry: download the content into the spool.
    pub fn open(&mut self) -> Result<(), AListError> {
        bridge::block_on(self.inner.open())
    }

    pub fn download(&mut self) -> Result<(), AListError> {
        bridge::block_on(self.inner.download())
    }

    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, AListError> {
        bridge::block_on(self.inner.read(n))
    }

    pub fn read_to_end(&mut self) -> Result<Vec<u8>, AListError> {
        bridge::block_on(self.inner.read_to_end())
    }

    pub fn seek(&mut self, seek: SeekFrom) -> Result<u64, AListError> {
        bridge::block_on(self.inner.seek(seek))
    }

    pub fn truncate(&mut self, len: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.truncate(len))
    }

    pub fn flush(&mut self) -> Result<(), AListError> {
        bridge::block_on(self.inner.flush())
    }

    pub fn save(&mut self, local: impl AsRef<Path> + Send) -> Result<(), AListError> {
        bridge::block_on(self.inner.save(local))
    }

    /// Scoped exit: release the spool. Idempotent.
    pub fn close(&mut self) -> Result<(), AListError> {
        bridge::block_on(self.inner.close())
    }
}

fn to_io_error(err: AListError) -> std::io::Error {
    match err {
        AListError::Io(io) => io,
        other => std::io::Error::other(other),
    }
}

impl std::io::Read for Blocking<crate::AListFile> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes = Self::read(self, buf.len()).map_err(to_io_error)?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl std::io::Seek for Blocking<crate::AListFile> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        Self::seek(self, pos).map_err(to_io_error)
    }
}
