/*!
The parallel variant of bounded variable elimination.

A pass of the parallel variant:
1. Moves the formula and arena into a [shared formula](shared::SharedFormula), and the scheduler behind a lock.
2. Runs a [worker](worker::ParallelWorker) on each thread of a [controller](controller::ThreadController).
3. Restores the formula and arena, merges the counts of each worker, and hands every clause on the shared queues to the technique.
4. Runs propagation and the technique to a fixed point.

# Locks

The order in which locks are taken is fixed:
1. The lock of the scheduler, only while popping an atom and never with any other lock.
2. The locks of atoms, in ascending order of atom.
3. The read lock on the arena, or the reservation lock followed by the write lock, and never the read lock with the write lock.
4. The lock of a clause, of an occurrence list, of the shared data, or of a queue, only while holding the read lock, and never two at once.

Every lock is held by a guard, and so released on every path out of a worker.

Elimination of an atom is the same as in the sequential variant, though as atoms are taken in parallel the resulting formula may differ between runs.
*/

pub mod controller;
pub mod locks;
pub mod shared;
mod subsumption;
pub mod worker;

use std::sync::atomic::AtomicUsize;

use crate::{
    db::{arena::ClauseArena, formula::FormulaDB},
    misc::log::targets,
    procedures::{
        elimination::{scheduler::VariableScheduler, BoundedVariableElimination, EliminationStats},
        propagation::Propagation,
        Technique,
    },
    types::err::{self},
};

use controller::{Job, ThreadController};
use locks::SpinLock;
use shared::SharedFormula;
use worker::ParallelWorker;

/// Runs a pass of elimination over the atoms scheduled by `bve`, on `threads` threads.
pub(crate) fn parallel_pass<T: Technique>(
    bve: &mut BoundedVariableElimination,
    threads: usize,
    formula: &mut FormulaDB,
    arena: &mut ClauseArena,
    technique: &mut T,
    propagation: &mut Propagation,
) -> Result<(), err::PreprocessingError> {
    let controller = ThreadController::new(threads);
    log::debug!(target: targets::PARALLEL,
        "Parallel pass over {} atoms with {} threads", bve.scheduler.len(), controller.size());

    let scheduler = std::mem::replace(
        &mut bve.scheduler,
        VariableScheduler::new(bve.config.heap_order.value, 0),
    );
    let heap = SpinLock::new(scheduler);
    let steps = AtomicUsize::new(bve.worker.stats.anticipation_steps);
    let shared = SharedFormula::new(formula, arena);

    let mut results: Vec<Result<EliminationStats, err::PreprocessingError>> = (0..controller.size())
        .map(|_| Ok(EliminationStats::default()))
        .collect();

    let outcome = {
        let jobs = results
            .iter_mut()
            .map(|slot| {
                let worker = ParallelWorker::new(&shared, &heap, &bve.config, &steps);
                Box::new(move || *slot = worker.run()) as Job
            })
            .collect();
        controller.run_jobs(jobs)
    };

    let (subsumption_queue, strengthening_queue) = shared.restore(formula, arena);
    bve.scheduler = heap.into_inner();
    outcome?;

    let mut failure = None;
    for result in results {
        match result {
            Ok(stats) => bve.worker.stats += stats,
            Err(e) => failure = Some(e),
        }
    }
    if let Some(e) = failure {
        return Err(e);
    }
    if !formula.ok() {
        return Err(err::PreprocessingError::Unsatisfiable);
    }

    for key in subsumption_queue.into_iter().chain(strengthening_queue) {
        technique.accept_clause(key, arena);
    }

    propagation.propagate(formula, arena)?;
    technique.run_to_fixpoint(formula, arena)?;
    propagation.propagate(formula, arena)?;
    Ok(())
}
