//! A fixed-size pool of threads, running a batch of jobs to completion.

use crate::{misc::log::targets, types::err::{self}};

/// A job for some thread of the pool.
pub type Job<'j> = Box<dyn FnOnce() + Send + 'j>;

/// The thread controller.
pub struct ThreadController {
    threads: usize,
}

impl ThreadController {
    /// A controller with `threads` threads, and at least one.
    pub fn new(threads: usize) -> Self {
        ThreadController {
            threads: threads.max(1),
        }
    }

    /// The number of threads of the controller.
    pub fn size(&self) -> usize {
        self.threads
    }

    /// Runs every job, each on a scoped thread, returning once every job has finished.
    ///
    /// At most [size](ThreadController::size) jobs are run at once.
    pub fn run_jobs<'j>(&self, jobs: Vec<Job<'j>>) -> Result<(), err::ParallelError> {
        let mut jobs = jobs.into_iter().peekable();
        while jobs.peek().is_some() {
            let batch = jobs.by_ref().take(self.threads).collect::<Vec<_>>();
            log::trace!(target: targets::PARALLEL, "Running {} jobs", batch.len());
            crossbeam::scope(|scope| {
                for job in batch {
                    scope.spawn(move |_| job());
                }
            })
            .map_err(|_| {
                log::error!(target: targets::PARALLEL, "A job panicked");
                err::ParallelError::WorkerPanic
            })?;
        }
        Ok(())
    }
}
