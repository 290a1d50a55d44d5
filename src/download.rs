//! Bounded-concurrency image downloads with a single retry pass.
//!
//! Given a board's pins and a target directory, the engine derives each
//! pin's asset URL and destination filename, downloads everything under a
//! fixed concurrency cap, and sweeps the failures exactly once more.
//! Individual failures never abort a batch; they only lower the count the
//! engine reports back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::{client::Client, models::pin::Pin, result::Result};

/// Cap on simultaneous in-flight image requests. Going higher made the
/// client unresponsive and trips server-side throttling.
const CONCURRENT_DOWNLOADS: usize = 10;

/// Fixed-width thumbnail variant appended to every storage key.
const IMAGE_VARIANT: &str = "_fw658";

/// MIME types the service is known to store, with their file extensions.
const IMAGE_TYPES: [(&str, &str); 7] = [
    ("image/bmp", ".bmp"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/x-icon", ".ico"),
    ("image/tiff", ".tif"),
    ("image/vnd.wap.wbmp", ".wbmp"),
];

/// File extension for a MIME type; unknown and missing types fall back
/// to `.jpg`.
fn extension(mime: Option<&str>) -> &'static str {
    mime.and_then(|mime| IMAGE_TYPES.iter().find(|(ty, _)| *ty == mime))
        .map_or(".jpg", |&(_, ext)| ext)
}

/// Source of image assets, keyed by storage key.
///
/// [`Client`] is the production implementation; tests substitute an
/// instrumented stub.
#[async_trait(?Send)]
pub trait ImageHost {
    /// Asset URL of the fixed-width variant for `key`.
    fn image_url(&self, key: &str) -> String;

    /// Fetches the raw bytes at `url`.
    ///
    /// # Errors
    ///
    /// Returns a transport error or [`Error::UnexpectedStatus`] for a
    /// non-OK reply.
    ///
    /// [`Error::UnexpectedStatus`]: crate::error::Error::UnexpectedStatus
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait(?Send)]
impl ImageHost for Client {
    fn image_url(&self, key: &str) -> String {
        format!("{}/{}{}", self.image_base(), key, IMAGE_VARIANT)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_bytes(url).await
    }
}

/// One pending image: where it comes from and where it lands.
#[derive(Debug)]
struct Job {
    url: String,
    path: PathBuf,
}

/// Downloads every pin into `board_dir` and returns the number of images
/// written, including retry successes.
///
/// The batch runs under a cap of 10 in-flight requests. Failures are
/// collected and swept exactly once more; a job failing twice stays
/// failed. Callers derive the permanent failure count from the returned
/// total.
pub async fn download_all<H>(host: &H, pins: &[Pin], board_dir: &Path) -> usize
where
    H: ImageHost,
{
    let jobs: Vec<Job> = pins
        .iter()
        .map(|pin| {
            let name = format!("{}{}", pin.id(), extension(pin.file().mime()));
            Job {
                url: host.image_url(pin.file().key()),
                path: board_dir.join(name),
            }
        })
        .collect();

    let (saved, failures) = sweep(host, jobs).await;
    let mut downloaded = saved;

    if !failures.is_empty() {
        log::info!("retrying {} failed downloads", failures.len());
        let (recovered, permanent) = sweep(host, failures).await;
        downloaded += recovered;
        for job in &permanent {
            log::warn!("giving up on {}", job.url);
        }
    }

    downloaded
}

/// One bounded pass over `jobs`; returns the success count and the jobs
/// that failed.
///
/// Results are funneled back through the stream, so the accounting below
/// is the single serialization point for concurrently completing jobs.
async fn sweep<H>(host: &H, jobs: Vec<Job>) -> (usize, Vec<Job>)
where
    H: ImageHost,
{
    let outcomes: Vec<_> = stream::iter(jobs)
        .map(|job| async move {
            let result = save(host, &job).await;
            (job, result)
        })
        .buffer_unordered(CONCURRENT_DOWNLOADS)
        .collect()
        .await;

    let mut saved = 0;
    let mut failures = Vec::new();
    for (job, result) in outcomes {
        match result {
            Ok(()) => saved += 1,
            Err(err) => {
                log::warn!("download failed: {} ({})", job.url, err);
                failures.push(job);
            }
        }
    }
    (saved, failures)
}

/// Fetches one image and writes it to its destination.
async fn save<H>(host: &H, job: &Job) -> Result<()>
where
    H: ImageHost,
{
    let bytes = host.fetch_image(&job.url).await?;
    tokio::fs::write(&job.path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::StatusCode;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::time::Duration;

    fn pin(id: &str) -> Pin {
        serde_json::from_str(&format!(
            r#"{{"pin_id":"{id}","file":{{"key":"k-{id}","type":"image/png"}}}}"#
        ))
        .unwrap()
    }

    /// Counts in-flight fetches and fails urls a scripted number of times.
    struct StubHost {
        in_flight: Cell<usize>,
        peak: Cell<usize>,
        fail_counts: RefCell<HashMap<String, usize>>,
    }

    impl StubHost {
        fn new() -> Self {
            StubHost {
                in_flight: Cell::new(0),
                peak: Cell::new(0),
                fail_counts: RefCell::new(HashMap::new()),
            }
        }

        /// Makes fetches of `key` fail the next `times` attempts.
        fn fail(&self, key: &str, times: usize) {
            self.fail_counts
                .borrow_mut()
                .insert(format!("stub://{key}"), times);
        }
    }

    #[async_trait(?Send)]
    impl ImageHost for StubHost {
        fn image_url(&self, key: &str) -> String {
            format!("stub://{key}")
        }

        async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
            self.in_flight.set(self.in_flight.get() + 1);
            self.peak.set(self.peak.get().max(self.in_flight.get()));
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.set(self.in_flight.get() - 1);

            let should_fail = {
                let mut counts = self.fail_counts.borrow_mut();
                match counts.get_mut(url) {
                    Some(left) if *left > 0 => {
                        *left -= 1;
                        true
                    }
                    _ => false,
                }
            };
            if should_fail {
                return Err(Error::UnexpectedStatus(
                    StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
            Ok(b"image".to_vec())
        }
    }

    #[tokio::test]
    async fn never_exceeds_ten_in_flight_requests() {
        let host = StubHost::new();
        let pins: Vec<Pin> = (0..40).map(|i| pin(&i.to_string())).collect();
        let dir = tempfile::tempdir().unwrap();

        let downloaded = download_all(&host, &pins, dir.path()).await;

        assert_eq!(downloaded, 40);
        assert!(host.peak.get() > 1, "downloads did not overlap");
        assert!(host.peak.get() <= CONCURRENT_DOWNLOADS);
    }

    #[tokio::test]
    async fn retry_recovers_single_failures_but_not_double_ones() {
        let host = StubHost::new();
        host.fail("k-1", 1);
        host.fail("k-2", 1);
        host.fail("k-3", 2);
        let pins: Vec<Pin> = (0..25).map(|i| pin(&i.to_string())).collect();
        let dir = tempfile::tempdir().unwrap();

        let downloaded = download_all(&host, &pins, dir.path()).await;

        // pins 1 and 2 recover on the retry pass, pin 3 stays failed
        assert_eq!(downloaded, 24);
        assert!(dir.path().join("1.png").exists());
        assert!(!dir.path().join("3.png").exists());
    }

    #[tokio::test]
    async fn write_failures_count_as_failures() {
        let host = StubHost::new();
        let pins = vec![pin("9")];
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-subdir");

        let downloaded = download_all(&host, &pins, &missing).await;

        assert_eq!(downloaded, 0);
    }

    #[test]
    fn extensions_follow_the_mime_table() {
        assert_eq!(extension(Some("image/png")), ".png");
        assert_eq!(extension(Some("image/jpeg")), ".jpg");
        assert_eq!(extension(Some("image/vnd.wap.wbmp")), ".wbmp");
        assert_eq!(extension(Some("application/octet-stream")), ".jpg");
        assert_eq!(extension(None), ".jpg");
    }
}
