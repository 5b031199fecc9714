//! Deadline and panic isolation for a single measurement phase.
//!
//! With a deadline the phase runs on its own named thread and the caller
//! waits on a channel with `recv_timeout`. When the deadline passes the
//! phase's [`CancelFlag`] is set and the worker gets [`CANCEL_GRACE`] to
//! notice it and return. A worker stuck inside a single adapter call never
//! checks the flag; after the grace period it is detached and its result
//! discarded. A panicking adapter drops the sender, which shows up as a
//! disconnected channel.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::analysis::{CancelFlag, Phase};
use crate::error::{Error, Result};

/// How long a timed-out worker gets to observe its cancel flag.
pub const CANCEL_GRACE: Duration = Duration::from_secs(1);

/// Run `work` as `phase` of `algorithm`'s evaluation.
///
/// `work` receives the phase's cancel flag and returns `None` once it has
/// seen it set. `timeout == None` runs inline on the calling thread; the flag
/// is never set there, and a panic is still caught and reported as
/// [`Error::AdapterPanicked`].
pub fn run_phase<T, F>(algorithm: &str, phase: Phase, timeout: Option<Duration>, work: F) -> Result<T>
where
    F: FnOnce(&CancelFlag) -> Option<T> + Send + 'static,
    T: Send + 'static,
{
    let cancel = CancelFlag::new();

    let Some(limit) = timeout else {
        return match catch_unwind(AssertUnwindSafe(|| work(&cancel))) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(cancelled(algorithm, phase)),
            Err(_) => Err(panicked(algorithm, phase)),
        };
    };

    let (tx, rx) = mpsc::channel();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name(format!("{algorithm}-{phase}"))
        .spawn(move || {
            // The receiver is gone once the worker has been abandoned.
            let _ = tx.send(work(&worker_cancel));
        })
        .map_err(|e| Error::WorkerSpawn {
            algorithm: algorithm.to_string(),
            reason: e.to_string(),
        })?;

    match rx.recv_timeout(limit) {
        Ok(Some(value)) => {
            let _ = handle.join();
            Ok(value)
        }
        Ok(None) => {
            let _ = handle.join();
            Err(cancelled(algorithm, phase))
        }
        Err(RecvTimeoutError::Timeout) => {
            cancel.cancel();
            match rx.recv_timeout(CANCEL_GRACE) {
                Ok(_) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = handle.join();
                    debug!("{algorithm}: {phase} worker stopped after cancellation");
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "{algorithm}: {phase} worker ignored cancellation for {CANCEL_GRACE:?}; abandoning it"
                    );
                }
            }
            warn!("{algorithm}: {phase} phase exceeded {limit:?}");
            Err(Error::PhaseTimeout {
                algorithm: algorithm.to_string(),
                phase,
                timeout: limit,
            })
        }
        Err(RecvTimeoutError::Disconnected) => {
            let _ = handle.join();
            Err(panicked(algorithm, phase))
        }
    }
}

fn cancelled(algorithm: &str, phase: Phase) -> Error {
    debug!("{algorithm}: {phase} phase returned without a result");
    Error::PhaseCancelled {
        algorithm: algorithm.to_string(),
        phase,
    }
}

fn panicked(algorithm: &str, phase: Phase) -> Error {
    warn!("{algorithm}: adapter panicked during the {phase} phase");
    Error::AdapterPanicked {
        algorithm: algorithm.to_string(),
        phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[test]
    fn result_passes_through_with_deadline() {
        let out = run_phase("x", Phase::Timing, Some(Duration::from_secs(5)), |_| Some(41 + 1));
        assert_eq!(out, Ok(42));
    }

    #[test]
    fn result_passes_through_inline() {
        let out = run_phase("x", Phase::Bias, None, |_| Some("done"));
        assert_eq!(out, Ok("done"));
    }

    #[test]
    fn slow_phase_times_out() {
        let start = Instant::now();
        let out = run_phase("sleepy", Phase::Avalanche, Some(Duration::from_millis(50)), |_| {
            thread::sleep(Duration::from_secs(5));
            Some(())
        });
        assert_eq!(
            out,
            Err(Error::PhaseTimeout {
                algorithm: "sleepy".into(),
                phase: Phase::Avalanche,
                timeout: Duration::from_millis(50),
            })
        );
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn timed_out_worker_does_no_further_work() {
        let steps = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&steps);
        let out = run_phase("steady", Phase::Bias, Some(Duration::from_millis(50)), move |cancel| {
            for _ in 0..40 {
                if cancel.is_cancelled() {
                    return None;
                }
                thread::sleep(Duration::from_millis(10));
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Some(())
        });
        assert!(matches!(out, Err(Error::PhaseTimeout { .. })));

        let at_timeout = steps.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(300));
        assert_eq!(steps.load(Ordering::SeqCst), at_timeout);
        assert!(at_timeout < 40);
    }

    #[test]
    fn worker_thread_is_named_after_algorithm_and_phase() {
        let out = run_phase("x", Phase::Timing, Some(Duration::from_secs(5)), |_| {
            thread::current().name().map(str::to_string)
        });
        assert_eq!(out, Ok("x-timing".to_string()));
    }

    #[test]
    fn work_that_gives_up_is_reported_as_cancelled() {
        let out: Result<()> = run_phase("quitter", Phase::Bias, Some(Duration::from_secs(5)), |_| None);
        assert_eq!(
            out,
            Err(Error::PhaseCancelled {
                algorithm: "quitter".into(),
                phase: Phase::Bias,
            })
        );
    }

    #[test]
    fn panic_on_worker_thread_is_reported() {
        let out: Result<()> = run_phase("boom", Phase::Bias, Some(Duration::from_secs(5)), |_| {
            panic!("adapter bug")
        });
        assert_eq!(
            out,
            Err(Error::AdapterPanicked {
                algorithm: "boom".into(),
                phase: Phase::Bias,
            })
        );
    }

    #[test]
    fn panic_inline_is_reported() {
        let out: Result<()> = run_phase("boom", Phase::Timing, None, |_| panic!("adapter bug"));
        assert!(matches!(out, Err(Error::AdapterPanicked { .. })));
    }
}
