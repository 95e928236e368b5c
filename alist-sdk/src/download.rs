//! Concurrent ranged downloader
//!
//! Probes the target with `HEAD`, pre-allocates the destination file, and
//! fetches one inclusive byte range per connection concurrently, each task
//! writing at its own offset. Progress is tallied in a shared atomic
//! counter so a frontend can poll it while the transfer runs.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::client::download_client;
use crate::error::{check_response, AListError};

/// Outcome of a completed transfer.
#[derive(Debug, Clone, Copy)]
pub struct DownloadStats {
    /// Bytes written to the destination.
    pub bytes: u64,
    /// Wall-clock duration of the transfer.
    pub elapsed: Duration,
}

/// Multi-connection downloader for one URL.
#[derive(Debug)]
pub struct Downloader {
    client: Client,
    url: String,
    connections: u64,
    progress: Arc<AtomicU64>,
    total: AtomicU64,
}

impl Downloader {
    /// Create a downloader with the default of 4 connections.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: download_client(),
            url: url.into(),
            connections: 4,
            progress: Arc::new(AtomicU64::new(0)),
            total: AtomicU64::new(0),
        }
    }

    /// Set the number of concurrent range connections (minimum 1).
    #[must_use]
    pub fn with_connections(mut self, connections: u64) -> Self {
        self.connections = connections.max(1);
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bytes transferred so far.
    #[must_use]
    pub fn progress(&self) -> u64 {
        self.progress.load(Ordering::Relaxed)
    }

    /// Total bytes expected; 0 until the `HEAD` probe resolves.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Run the transfer to `output`, overwriting any existing file.
    pub async fn run(&self, output: impl AsRef<Path>) -> Result<DownloadStats, AListError> {
        let output = output.as_ref().to_path_buf();
        let started = Instant::now();
        self.progress.store(0, Ordering::Relaxed);

        let head = self.client.head(&self.url).send().await?;
        let head = check_response(head)?;
        let total = head.content_length().unwrap_or(0);
        self.total.store(total, Ordering::Relaxed);
        tracing::debug!(url = %self.url, total, connections = self.connections, "download start");

        // Pre-allocate so range tasks can write at their offsets.
        let file = tokio::fs::File::create(&output).await?;
        file.set_len(total).await?;
        drop(file);

        // Unknown or empty size: no range math possible, single plain GET.
        if total == 0 || self.connections == 1 {
            self.fetch_range(&output, 0, None).await?;
        } else {
            let ranges = split_ranges(total, self.connections);
            let mut tasks = Vec::with_capacity(ranges.len());
            for (start, end) in ranges {
                let downloader = self.task_view();
                let output = output.clone();
                tasks.push(tokio::spawn(async move {
                    downloader.fetch_range(&output, start, Some(end)).await
                }));
            }
            for result in futures::future::join_all(tasks).await {
                result.map_err(|e| AListError::Download(format!("range task failed: {e}")))??;
            }
        }

        let bytes = self.progress();
        let elapsed = started.elapsed();
        tracing::debug!(url = %self.url, bytes, ?elapsed, "download complete");
        Ok(DownloadStats { bytes, elapsed })
    }

    /// Cheap clone sharing the progress counter, for spawned range tasks.
    fn task_view(&self) -> Self {
        Self {
            client: self.client.clone(),
            url: self.url.clone(),
            connections: self.connections,
            progress: Arc::clone(&self.progress),
            total: AtomicU64::new(self.total()),
        }
    }

    /// Fetch one range (or, with `end` absent, the whole body) and write
    /// it at `start` in the destination file.
    async fn fetch_range(
        &self,
        output: &Path,
        start: u64,
        end: Option<u64>,
    ) -> Result<(), AListError> {
        let mut request = self.client.get(&self.url);
        if let Some(end) = end {
            request = request.header(RANGE, format!("bytes={start}-{end}"));
        }
        let response = request.send().await?;
        let response = check_response(response)?;
        if end.is_some() && response.status() != StatusCode::PARTIAL_CONTENT {
            // Server ignored the range header; concurrent writers would
            // each write the full body.
            return Err(AListError::Download(format!(
                "server did not honor range request (status {})",
                response.status()
            )));
        }

        let mut file = tokio::fs::OpenOptions::new().write(true).open(output).await?;
        file.seek(std::io::SeekFrom::Start(start)).await?;
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            self.progress.fetch_add(chunk.len() as u64, Ordering::Relaxed);
        }
        file.flush().await?;
        Ok(())
    }
}

/// Split `total` bytes into `connections` inclusive ranges; the last
/// range absorbs the remainder.
fn split_ranges(total: u64, connections: u64) -> Vec<(u64, u64)> {
    let connections = connections.max(1).min(total.max(1));
    let chunk = total / connections;
    (0..connections)
        .map(|i| {
            let start = i * chunk;
            let end = if i == connections - 1 {
                total - 1
            } else {
                (i + 1) * chunk - 1
            };
            (start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ranges_even() {
        assert_eq!(
            split_ranges(100, 4),
            vec![(0, 24), (25, 49), (50, 74), (75, 99)]
        );
    }

    #[test]
    fn test_split_ranges_last_absorbs_remainder() {
        assert_eq!(split_ranges(10, 3), vec![(0, 2), (3, 5), (6, 9)]);
    }

    #[test]
    fn test_split_ranges_more_connections_than_bytes() {
        // Never more ranges than bytes.
        assert_eq!(split_ranges(2, 8), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_split_ranges_single() {
        assert_eq!(split_ranges(5, 1), vec![(0, 4)]);
    }

    #[test]
    fn test_ranges_cover_exactly_once() {
        for total in [1u64, 7, 100, 1023] {
            for connections in [1u64, 2, 3, 8] {
                let ranges = split_ranges(total, connections);
                let mut expected = 0;
                for (start, end) in ranges {
                    assert_eq!(start, expected);
                    assert!(end >= start);
                    expected = end + 1;
                }
                assert_eq!(expected, total);
            }
        }
    }

    #[test]
    fn test_downloader_defaults() {
        let downloader = Downloader::new("http://h/file.bin").with_connections(0);
        assert_eq!(downloader.connections, 1);
        assert_eq!(downloader.progress(), 0);
        assert_eq!(downloader.total(), 0);
        assert_eq!(downloader.url(), "http://h/file.bin");
    }
}
