//! File operations engine for fen.
//!
//! Copy, move and delete requests are queued on a crossbeam channel and executed by a bounded
//! pool of worker threads. Each finished request is reported back as a [FileOpOutcome] on a
//! second channel, which the UI thread drains on every tick.
//!
//! The in-flight counter is the only state the workers share with the UI thread besides the
//! [StatusSink]. It is incremented in [FileOps::enqueue] before the request is handed to the
//! pool, and decremented after the filesystem work finished but before the outcome is sent, so
//! a caller that has received every outcome always reads zero.
//!
//! # Caution:
//! Workers must never touch navigation or selection state. Anything that follows from a
//! completed request (history cleanup, refreshing the listing) is applied by the receiver of
//! the outcome.

use crate::core::error::{Error, Result};
use crate::core::status::StatusSink;
use crate::utils::{copy_recursive, path_exists, remove_path};

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Upper bound for the automatic worker count.
pub const MAX_FILE_OP_WORKERS: usize = 8;

/// A single queued filesystem mutation.
///
/// Destinations are taken as given: collision-free names are chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOpRequest {
    Copy { src: PathBuf, dest: PathBuf },
    Move { src: PathBuf, dest: PathBuf },
    Delete { path: PathBuf },
}

impl FileOpRequest {
    pub fn label(&self) -> &'static str {
        match self {
            FileOpRequest::Copy { .. } => "Copy",
            FileOpRequest::Move { .. } => "Move",
            FileOpRequest::Delete { .. } => "Delete",
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            FileOpRequest::Copy { src, .. } | FileOpRequest::Move { src, .. } => src,
            FileOpRequest::Delete { path } => path,
        }
    }

    pub fn destination(&self) -> Option<&Path> {
        match self {
            FileOpRequest::Copy { dest, .. } | FileOpRequest::Move { dest, .. } => Some(dest),
            FileOpRequest::Delete { .. } => None,
        }
    }
}

/// Result of one executed request, sent back to the UI thread.
#[derive(Debug)]
pub struct FileOpOutcome {
    request: FileOpRequest,
    result: Result<()>,
}

impl FileOpOutcome {
    #[inline]
    pub fn request(&self) -> &FileOpRequest {
        &self.request
    }

    #[inline]
    pub fn result(&self) -> &Result<()> {
        &self.result
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Owns the worker pool, its queue and the in-flight counter.
pub struct FileOps {
    task_tx: Sender<FileOpRequest>,
    done_rx: Receiver<FileOpOutcome>,
    in_flight: Arc<Mutex<usize>>,
    handles: Vec<JoinHandle<()>>,
    /// Keeps the queue open when the pool has no workers.
    _parked_rx: Option<Receiver<FileOpRequest>>,
}

impl FileOps {
    /// Spawns `workers` threads (at least one).
    pub fn spawn(workers: usize, status: StatusSink) -> Self {
        Self::with_pool(workers.max(1), status)
    }

    /// An engine without workers: requests are accepted and counted but never run.
    #[cfg(test)]
    pub(crate) fn stalled(status: StatusSink) -> Self {
        Self::with_pool(0, status)
    }

    /// An engine whose queue is already closed: every enqueue fails.
    #[cfg(test)]
    pub(crate) fn closed(status: StatusSink) -> Self {
        let mut ops = Self::with_pool(0, status);
        ops._parked_rx = None;
        ops
    }

    fn with_pool(workers: usize, status: StatusSink) -> Self {
        let (task_tx, task_rx) = unbounded::<FileOpRequest>();
        let (done_tx, done_rx) = unbounded::<FileOpOutcome>();
        let in_flight = Arc::new(Mutex::new(0usize));

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let task_rx = task_rx.clone();
            let done_tx = done_tx.clone();
            let in_flight = Arc::clone(&in_flight);
            let status = status.clone();

            let spawned = thread::Builder::new()
                .name(format!("fen-fileop-{idx}"))
                .spawn(move || run_worker(task_rx, done_tx, in_flight, status));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::warn!(error = %e, "failed to spawn file operation worker"),
            }
        }

        tracing::debug!(workers = handles.len(), "file operation pool started");
        Self {
            task_tx,
            done_rx,
            in_flight,
            handles,
            _parked_rx: (workers == 0).then_some(task_rx),
        }
    }

    /// Queues a request. Never blocks on filesystem work.
    pub fn enqueue(&self, request: FileOpRequest) -> Result<()> {
        let mut count = lock_count(&self.in_flight);
        tracing::debug!(?request, "enqueue file operation");

        match self.task_tx.send(request) {
            Ok(()) => {
                *count += 1;
                Ok(())
            }
            Err(_) => Err(Error::EngineClosed),
        }
    }

    /// Number of accepted requests that have not finished yet.
    pub fn in_flight_count(&self) -> usize {
        *lock_count(&self.in_flight)
    }

    /// Receiver of finished requests, in completion order.
    pub fn completions(&self) -> &Receiver<FileOpOutcome> {
        &self.done_rx
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Closes the queue and waits until every worker has finished the queued requests.
    pub fn drain(self) {
        let FileOps {
            task_tx, handles, ..
        } = self;
        drop(task_tx);

        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("file operation worker panicked");
            }
        }
    }
}

/// Worker count used when the config asks for automatic sizing.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .clamp(1, MAX_FILE_OP_WORKERS)
}

fn lock_count(count: &Mutex<usize>) -> MutexGuard<'_, usize> {
    count.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrements the in-flight counter when dropped, so a panicking request is still accounted.
struct InFlightGuard<'a>(&'a Mutex<usize>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut count = lock_count(self.0);
        *count = count.saturating_sub(1);
    }
}

fn run_worker(
    task_rx: Receiver<FileOpRequest>,
    done_tx: Sender<FileOpOutcome>,
    in_flight: Arc<Mutex<usize>>,
    status: StatusSink,
) {
    while let Ok(request) = task_rx.recv() {
        let guard = InFlightGuard(&in_flight);
        let result = execute(&request);

        match &result {
            Ok(()) => {
                tracing::info!(?request, "file operation complete");
                status.info(success_message(&request));
            }
            Err(e) => {
                tracing::warn!(?request, error = %e, "file operation failed");
                status.error(e.to_string());
            }
        }
        drop(guard);

        if done_tx.send(FileOpOutcome { request, result }).is_err() {
            // Receiver gone: the app is shutting down, outcomes are no longer needed.
            continue;
        }
    }
}

fn success_message(request: &FileOpRequest) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    match request {
        FileOpRequest::Copy { dest, .. } => format!("Copied to {}", name(dest)),
        FileOpRequest::Move { src, dest } if src == dest => format!("{} is already here", name(src)),
        FileOpRequest::Move { dest, .. } => format!("Moved to {}", name(dest)),
        FileOpRequest::Delete { path } => format!("Deleted {}", name(path)),
    }
}

/// Executes one request synchronously on the calling thread.
pub fn execute(request: &FileOpRequest) -> Result<()> {
    match request {
        FileOpRequest::Copy { src, dest } => {
            if path_exists(dest) {
                return Err(Error::DestinationExists(dest.clone()));
            }
            if src.is_dir() && dest.starts_with(src) {
                return Err(Error::op("Copy", src, into_itself()));
            }
            copy_recursive(src, dest).map_err(|e| copy_error("Copy", src, dest, e))
        }
        FileOpRequest::Move { src, dest } => {
            if src == dest {
                return Ok(());
            }
            if path_exists(dest) {
                return Err(Error::DestinationExists(dest.clone()));
            }
            if src.is_dir() && dest.starts_with(src) {
                return Err(Error::op("Move", src, into_itself()));
            }
            match fs::rename(src, dest) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                    copy_recursive(src, dest).map_err(|e| copy_error("Move", src, dest, e))?;
                    remove_path(src).map_err(|e| Error::op("Move", src, e))
                }
                Err(e) => Err(Error::op("Move", src, e)),
            }
        }
        FileOpRequest::Delete { path } => {
            remove_path(path).map_err(|e| Error::op("Delete", path, e))
        }
    }
}

/// A destination created between the existence check and the copy is still a collision.
fn copy_error(op: &'static str, src: &Path, dest: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::AlreadyExists && path_exists(dest) {
        Error::DestinationExists(dest.to_path_buf())
    } else {
        Error::op(op, src, e)
    }
}

fn into_itself() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "cannot place a directory inside itself",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn copy_fails_when_destination_exists() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "new")?;
        fs::write(&dest, "old")?;

        let res = execute(&FileOpRequest::Copy {
            src,
            dest: dest.clone(),
        });
        assert!(matches!(res, Err(Error::DestinationExists(_))));
        assert_eq!(fs::read_to_string(&dest)?, "old");
        Ok(())
    }

    #[test]
    fn copy_directory_recursively() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("nested"))?;
        fs::write(src.join("nested/leaf.txt"), "leaf")?;

        let dest = dir.path().join("tree copy");
        execute(&FileOpRequest::Copy {
            src: src.clone(),
            dest: dest.clone(),
        })?;

        assert_eq!(fs::read_to_string(dest.join("nested/leaf.txt"))?, "leaf");
        assert!(src.join("nested/leaf.txt").exists());
        Ok(())
    }

    #[test]
    fn copy_directory_into_itself_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempdir()?;
        let src = dir.path().join("loop");
        fs::create_dir(&src)?;

        let res = execute(&FileOpRequest::Copy {
            src: src.clone(),
            dest: src.join("loop"),
        });
        assert!(matches!(res, Err(Error::OperationFailed { op: "Copy", .. })));
        assert!(!src.join("loop").exists());
        Ok(())
    }

    #[test]
    fn move_onto_itself_is_noop() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("stay.txt");
        fs::write(&path, "content")?;

        execute(&FileOpRequest::Move {
            src: path.clone(),
            dest: path.clone(),
        })?;
        assert_eq!(fs::read_to_string(&path)?, "content");
        Ok(())
    }

    #[test]
    fn delete_missing_path_fails() {
        let res = execute(&FileOpRequest::Delete {
            path: PathBuf::from("/path/does/not/exist"),
        });
        assert!(matches!(res, Err(Error::OperationFailed { op: "Delete", .. })));
    }

    #[test]
    fn pool_reports_outcomes_and_settles_counter()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let status = StatusSink::new();
        let ops = FileOps::spawn(3, status.clone());
        assert_eq!(ops.worker_count(), 3);

        let total = 12;
        for i in 0..total {
            let path = dir.path().join(format!("file_{i}.txt"));
            fs::write(&path, i.to_string())?;
            ops.enqueue(FileOpRequest::Copy {
                src: path,
                dest: dir.path().join(format!("copy_{i}.txt")),
            })?;
        }

        let mut done = 0;
        while done < total {
            let outcome = ops.completions().recv_timeout(TIMEOUT)?;
            assert!(outcome.is_ok(), "unexpected failure: {:?}", outcome.result());
            done += 1;
        }

        assert_eq!(ops.in_flight_count(), 0);
        for i in 0..total {
            assert_eq!(
                fs::read_to_string(dir.path().join(format!("copy_{i}.txt")))?,
                i.to_string()
            );
        }
        assert!(status.current().is_some());
        ops.drain();
        Ok(())
    }

    #[test]
    fn stalled_engine_keeps_requests_in_flight() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let ops = FileOps::stalled(StatusSink::new());
        assert_eq!(ops.worker_count(), 0);
        ops.enqueue(FileOpRequest::Delete {
            path: PathBuf::from("/nonexistent"),
        })?;
        ops.enqueue(FileOpRequest::Delete {
            path: PathBuf::from("/nonexistent"),
        })?;
        assert_eq!(ops.in_flight_count(), 2);
        assert!(ops.completions().try_recv().is_err());
        Ok(())
    }

    #[test]
    fn racing_copies_to_one_destination_never_overwrite()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let ops = FileOps::spawn(2, StatusSink::new());
        let dest = dir.path().join("target.txt");

        for name in ["left.txt", "right.txt"] {
            let src = dir.path().join(name);
            fs::write(&src, name)?;
            ops.enqueue(FileOpRequest::Copy {
                src,
                dest: dest.clone(),
            })?;
        }

        let outcomes = [
            ops.completions().recv_timeout(TIMEOUT)?,
            ops.completions().recv_timeout(TIMEOUT)?,
        ];
        let winners: Vec<_> = outcomes.iter().filter(|o| o.is_ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(
            outcomes
                .iter()
                .any(|o| matches!(o.result(), Err(Error::DestinationExists(_))))
        );

        let winner = winners[0]
            .request()
            .source()
            .file_name()
            .ok_or("no file name")?;
        assert_eq!(fs::read_to_string(&dest)?, winner.to_string_lossy());
        ops.drain();
        Ok(())
    }

    #[test]
    fn drain_finishes_queued_work() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let ops = FileOps::spawn(1, StatusSink::new());
        let mut victims = Vec::new();
        for i in 0..5 {
            let p = dir.path().join(format!("victim_{i}"));
            fs::write(&p, "x")?;
            ops.enqueue(FileOpRequest::Delete { path: p.clone() })?;
            victims.push(p);
        }

        ops.drain();
        assert!(victims.iter().all(|p| !p.exists()));
        Ok(())
    }

    #[test]
    fn default_worker_count_is_bounded() {
        let n = default_worker_count();
        assert!((1..=MAX_FILE_OP_WORKERS).contains(&n));
    }
}
