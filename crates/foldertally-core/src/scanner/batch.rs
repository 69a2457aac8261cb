/// Batch scanning of several roots on a bounded worker pool.
///
/// Jobs (one per root) go through a bounded crossbeam channel; each worker
/// thread scans roots until the queue closes. The pool is joined before any
/// result is returned, so appending is a separate, strictly sequential
/// stage that begins only after every scan has finished.
use super::{scan, ScanSummary};
use crate::error::{Error, Result};
use crate::logfile;
use crate::model::Session;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum number of queued root jobs.
///
/// Once the queue is full the feeding thread blocks until a worker takes a
/// job, which bounds memory when thousands of roots are passed at once.
pub const JOB_QUEUE_CAPACITY: usize = 64;

/// A unit of work: a root and its position in the caller's list.
struct ScanJob {
    index: usize,
    root: PathBuf,
}

/// Default worker count: one per logical CPU.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Scan every root, returning one result per root in input order.
///
/// `workers` is clamped to `1..=roots.len()`. If no worker thread can be
/// spawned the roots are scanned on the calling thread instead.
pub fn scan_many(roots: &[PathBuf], workers: usize) -> Vec<Result<Session>> {
    if roots.is_empty() {
        return Vec::new();
    }

    let start = Instant::now();
    let workers = workers.clamp(1, roots.len());
    let (job_tx, job_rx) = crossbeam_channel::bounded::<ScanJob>(JOB_QUEUE_CAPACITY);
    let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, Result<Session>)>();

    let spawned = thread::scope(|scope| {
        let mut spawned = 0usize;
        for n in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let result = thread::Builder::new()
                .name(format!("foldertally-scan-{n}"))
                .spawn_scoped(scope, move || {
                    for job in job_rx.iter() {
                        let result = scan(&job.root);
                        if done_tx.send((job.index, result)).is_err() {
                            break;
                        }
                    }
                });
            match result {
                Ok(_) => spawned += 1,
                Err(e) => warn!("Failed to spawn scan worker {n}: {e}"),
            }
        }

        if spawned > 0 {
            for (index, root) in roots.iter().enumerate() {
                if job_tx
                    .send(ScanJob {
                        index,
                        root: root.clone(),
                    })
                    .is_err()
                {
                    break;
                }
            }
        }
        // Closing the queue lets the workers drain it and exit; the scope
        // then joins them.
        drop(job_tx);
        spawned
    });
    drop(done_tx);

    let mut slots: Vec<Option<Result<Session>>> = (0..roots.len()).map(|_| None).collect();
    if spawned == 0 {
        for (slot, root) in slots.iter_mut().zip(roots) {
            *slot = Some(scan(root));
        }
    } else {
        for (index, result) in done_rx.iter() {
            slots[index] = Some(result);
        }
    }

    info!(
        "Batch scan of {} root(s) on {} worker(s) finished in {:?}",
        roots.len(),
        spawned.max(1),
        start.elapsed()
    );

    slots
        .into_iter()
        .zip(roots)
        .map(|(slot, root)| {
            slot.unwrap_or_else(|| {
                Err(Error::DirectoryUnreadable {
                    path: root.clone(),
                    source: std::io::Error::other("scan worker exited before finishing"),
                })
            })
        })
        .collect()
}

/// Scan every root, then append all sessions to `log_path` in input order.
///
/// If any root fails to scan, the first failure (by input order) is
/// returned and nothing is appended.
pub fn scan_many_and_append(
    roots: &[PathBuf],
    log_path: &Path,
    workers: usize,
) -> Result<Vec<ScanSummary>> {
    let sessions = scan_many(roots, workers)
        .into_iter()
        .collect::<Result<Vec<Session>>>()?;

    logfile::append_sessions(log_path, &sessions)?;
    info!(
        "Saved {} session(s) to {}",
        sessions.len(),
        log_path.display()
    );

    Ok(roots
        .iter()
        .zip(sessions)
        .map(|(root, session)| ScanSummary {
            root: root.clone(),
            log_path: log_path.to_path_buf(),
            session,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn root_with(tmp: &TempDir, name: &str, dirs: &[&str]) -> PathBuf {
        let root = tmp.path().join(name);
        fs::create_dir(&root).unwrap();
        for d in dirs {
            fs::create_dir(root.join(d)).unwrap();
        }
        root
    }

    #[test]
    fn results_follow_input_order() {
        let tmp = TempDir::new().unwrap();
        let roots: Vec<PathBuf> = (0..8)
            .map(|i| root_with(&tmp, &format!("r{i}"), &[&format!("d{i}")]))
            .collect();

        let results = scan_many(&roots, 3);
        assert_eq!(results.len(), 8);
        for (i, r) in results.into_iter().enumerate() {
            let session = r.unwrap();
            assert_eq!(session.iter().collect::<Vec<_>>(), vec![format!("d{i}")]);
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(scan_many(&[], 4).is_empty());
    }

    #[test]
    fn failure_is_reported_in_place() {
        let tmp = TempDir::new().unwrap();
        let ok = root_with(&tmp, "ok", &["a"]);
        let missing = tmp.path().join("missing");

        let results = scan_many(&[ok, missing], 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::DirectoryUnreadable { .. })));
    }

    #[test]
    fn one_failure_appends_nothing() {
        let tmp = TempDir::new().unwrap();
        let ok = root_with(&tmp, "ok", &["a"]);
        let log = tmp.path().join("list.txt");

        let err = scan_many_and_append(&[ok, tmp.path().join("missing")], &log, 2);
        assert!(err.is_err());
        assert!(!log.exists());
    }

    #[test]
    fn sessions_appended_in_argument_order() {
        let tmp = TempDir::new().unwrap();
        let first = root_with(&tmp, "first", &["one"]);
        let second = root_with(&tmp, "second", &["two"]);
        let log = tmp.path().join("list.txt");

        let summaries = scan_many_and_append(&[first, second], &log, 2).unwrap();
        assert_eq!(summaries.len(), 2);

        let text = fs::read_to_string(&log).unwrap();
        assert_eq!(
            text,
            "===========================\none\n\n\n\n===========================\ntwo\n"
        );
    }
}
