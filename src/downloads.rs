// Simulated downloads
//
// No bytes are transferred. Progress is advanced by a timer with a random
// increment, the same way the UI fakes a download bar.

use rand::Rng;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::Track;

pub const COMPLETE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Downloading,
    Completed,
    Paused,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Download {
    pub track: Arc<Track>,
    /// 0.0..=100.0
    pub progress: f64,
    pub status: DownloadStatus,
}

impl Download {
    pub fn start(track: Arc<Track>) -> Self {
        Self {
            track,
            progress: 0.0,
            status: DownloadStatus::Downloading,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    #[error("\"{0}\" is already in your download queue.")]
    AlreadyQueued(String),

    #[error("track {0} is not in the download queue")]
    NotQueued(String),

    #[error("cannot {action} a download that is {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: DownloadStatus,
    },
}

/// Advance one download by `increment` percent.
///
/// Only active downloads move. Progress is clamped at 100, and reaching it
/// completes the download.
pub fn advance(download: &Download, increment: f64) -> Download {
    if download.status != DownloadStatus::Downloading || download.progress >= COMPLETE {
        return download.clone();
    }

    let progress = (download.progress + increment.max(0.0)).min(COMPLETE);
    let status = if progress >= COMPLETE {
        DownloadStatus::Completed
    } else {
        DownloadStatus::Downloading
    };

    Download {
        track: download.track.clone(),
        progress,
        status,
    }
}

/// Process-local download list, in the order downloads were started
pub struct DownloadQueue {
    downloads: Mutex<Vec<Download>>,
    max_increment: f64,
}

impl DownloadQueue {
    pub fn new(max_increment: f64) -> Self {
        Self {
            downloads: Mutex::new(Vec::new()),
            max_increment,
        }
    }

    pub fn list(&self) -> Vec<Download> {
        self.lock().clone()
    }

    pub fn enqueue(&self, track: Arc<Track>) -> Result<Download, DownloadError> {
        let mut downloads = self.lock();
        if downloads.iter().any(|d| d.track.id == track.id) {
            return Err(DownloadError::AlreadyQueued(track.title.clone()));
        }

        let download = Download::start(track);
        log::info!("Download started: \"{}\"", download.track.title);
        downloads.push(download.clone());
        Ok(download)
    }

    pub fn pause(&self, track_id: &str) -> Result<Download, DownloadError> {
        self.transition(track_id, "pause", DownloadStatus::Downloading, DownloadStatus::Paused)
    }

    pub fn resume(&self, track_id: &str) -> Result<Download, DownloadError> {
        self.transition(track_id, "resume", DownloadStatus::Paused, DownloadStatus::Downloading)
    }

    /// Advance every download by a random increment in `[0, max_increment)`.
    /// Returns the downloads that completed on this tick. A non-finite or
    /// non-positive `max_increment` leaves progress unchanged.
    pub fn tick<R: Rng>(&self, rng: &mut R) -> Vec<Download> {
        let mut downloads = self.lock();
        let mut completed = Vec::new();

        for download in downloads.iter_mut() {
            let increment = if self.max_increment.is_finite() && self.max_increment > 0.0 {
                rng.gen_range(0.0..self.max_increment)
            } else {
                0.0
            };
            let next = advance(download, increment);
            if next.status == DownloadStatus::Completed
                && download.status != DownloadStatus::Completed
            {
                completed.push(next.clone());
            }
            *download = next;
        }

        completed
    }

    fn transition(
        &self,
        track_id: &str,
        action: &'static str,
        from: DownloadStatus,
        to: DownloadStatus,
    ) -> Result<Download, DownloadError> {
        let mut downloads = self.lock();
        let download = downloads
            .iter_mut()
            .find(|d| d.track.id == track_id)
            .ok_or_else(|| DownloadError::NotQueued(track_id.to_string()))?;

        if download.status != from {
            return Err(DownloadError::InvalidTransition {
                action,
                status: download.status,
            });
        }
        download.status = to;
        Ok(download.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Download>> {
        self.downloads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Drive `queue.tick` on a fixed interval until the task is dropped
pub async fn run_ticker(queue: Arc<DownloadQueue>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let completed = queue.tick(&mut rand::thread_rng());
        for download in completed {
            log::info!("Download complete: \"{}\"", download.track.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn track(id: &str) -> Arc<Track> {
        Catalog::demo().get(id).unwrap().clone()
    }

    fn at(progress: f64, status: DownloadStatus) -> Download {
        Download {
            track: track("1"),
            progress,
            status,
        }
    }

    #[test]
    fn test_advance_adds_increment() {
        let next = advance(&at(10.0, DownloadStatus::Downloading), 15.0);
        assert_eq!(next.progress, 25.0);
        assert_eq!(next.status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_advance_clamps_and_completes() {
        let next = advance(&at(95.0, DownloadStatus::Downloading), 19.9);
        assert_eq!(next.progress, COMPLETE);
        assert_eq!(next.status, DownloadStatus::Completed);
    }

    #[test]
    fn test_advance_ignores_inactive_downloads() {
        for status in [DownloadStatus::Paused, DownloadStatus::Error, DownloadStatus::Completed] {
            let download = at(40.0, status);
            assert_eq!(advance(&download, 10.0), download);
        }
    }

    #[test]
    fn test_enqueue_rejects_duplicates() {
        let queue = DownloadQueue::new(20.0);
        queue.enqueue(track("3")).unwrap();

        let err = queue.enqueue(track("3")).unwrap_err();
        assert_eq!(err, DownloadError::AlreadyQueued("Minimal Echoes".to_string()));
        assert_eq!(queue.list().len(), 1);
    }

    #[test]
    fn test_tick_reports_each_completion_once() {
        let queue = DownloadQueue::new(20.0);
        queue.enqueue(track("1")).unwrap();
        queue.enqueue(track("2")).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let mut completions = Vec::new();
        for _ in 0..10_000 {
            completions.extend(queue.tick(&mut rng).into_iter().map(|d| d.track.id.clone()));
            if queue.list().iter().all(|d| d.status == DownloadStatus::Completed) {
                break;
            }
        }
        // One more tick after completion reports nothing new
        assert!(queue.tick(&mut rng).is_empty());

        completions.sort();
        assert_eq!(completions, vec!["1", "2"]);
        assert!(queue.list().iter().all(|d| d.progress == COMPLETE));
    }

    #[test]
    fn test_tick_with_unusable_max_increment_does_not_panic() {
        for max_increment in [f64::INFINITY, f64::NAN, -5.0, 0.0] {
            let queue = DownloadQueue::new(max_increment);
            queue.enqueue(track("2")).unwrap();

            let mut rng = StdRng::seed_from_u64(3);
            assert!(queue.tick(&mut rng).is_empty());
            assert_eq!(queue.list()[0].progress, 0.0);
            assert_eq!(queue.list()[0].status, DownloadStatus::Downloading);
        }
    }

    #[test]
    fn test_pause_and_resume() {
        let queue = DownloadQueue::new(20.0);
        queue.enqueue(track("4")).unwrap();

        assert_eq!(queue.pause("4").unwrap().status, DownloadStatus::Paused);

        let mut rng = StdRng::seed_from_u64(1);
        queue.tick(&mut rng);
        assert_eq!(queue.list()[0].progress, 0.0);

        assert!(matches!(
            queue.pause("4"),
            Err(DownloadError::InvalidTransition { action: "pause", .. })
        ));
        assert_eq!(queue.resume("4").unwrap().status, DownloadStatus::Downloading);
        assert_eq!(queue.resume("99"), Err(DownloadError::NotQueued("99".to_string())));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&at(0.0, DownloadStatus::Downloading)).unwrap();
        assert!(json.contains("\"status\":\"downloading\""));
        assert!(json.contains("\"artworkUrl\""));
    }
}
