use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::merge_config::MergeConfig;
use super::output::OutputDir;
use super::phase::RunPhase;
use super::summary::{IterationSummary, MergeRunSummary};
use super::worker::{FileOutcome, Worker};
use crate::engine::errors::{MergeError, RunError};
use crate::engine::memory::MemorySampler;
use crate::engine::query::Projection;
use crate::shared::path::list_data_files;

/// Repeats the merge pass over the existing directory `iterations` times,
/// sampling memory around each pass.
pub struct BatchMergeDriver {
    config: MergeConfig,
    sampler: MemorySampler,
    phase: RunPhase,
}

impl BatchMergeDriver {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            sampler: MemorySampler::new(),
            phase: RunPhase::Init,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn run(&mut self) -> Result<MergeRunSummary, RunError> {
        match self.run_inner() {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.enter(RunPhase::Failed);
                e.source.log_error();
                error!(target: "duck_merge::driver", phase = %e.phase, "Merge run aborted");
                Err(e)
            }
        }
    }

    fn run_inner(&mut self) -> Result<MergeRunSummary, RunError> {
        self.enter(RunPhase::Init);
        let start = self.sampler.sample("start");

        let output = OutputDir::create(
            self.config.output_root.as_deref(),
            &self.config.label,
            self.config.retain_output,
        )
        .map_err(|e| RunError::new(RunPhase::Init, MergeError::Io(e)))?;

        // Dropping a worker releases its session and scratch directory, and
        // dropping `output` removes the output directory, so an early return
        // below leaves nothing behind.
        let mut workers = Vec::with_capacity(self.config.workers.max(1));
        for id in 0..self.config.workers.max(1) {
            let session = Worker::open_session(&self.config)?;
            if id == 0 {
                self.enter(RunPhase::SessionOpen);
            }
            workers.push(Worker::with_keys(id, session, &self.config, output.path())?);
            if id == 0 {
                self.enter(RunPhase::KeysLoaded);
            }
        }
        let key_cardinality = workers[0].key_set().cardinality;
        let keys_loaded = self.sampler.sample("keys loaded");

        let pool = if workers.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers.len())
                .thread_name(|i| format!("merge-worker-{}", i))
                .build()
                .map_err(|e| {
                    RunError::new(RunPhase::KeysLoaded, MergeError::Io(std::io::Error::other(e)))
                })?;
            Some(pool)
        } else {
            None
        };

        let columns = Projection::from_names(&self.config.columns);
        let mut iterations = Vec::with_capacity(self.config.iterations);
        for iteration in 1..=self.config.iterations {
            self.enter(RunPhase::Iterating);
            let before = self.sampler.sample(format!("iteration {} start", iteration));

            let files = self.existing_files()?;
            info!(target: "duck_merge::driver", iteration, files = files.len(), "Starting iteration");

            self.enter(RunPhase::PerFile);
            let outcomes = self.dispatch(&mut workers, pool.as_ref(), files, &columns);

            let mut results = Vec::new();
            let mut failures = Vec::new();
            for outcome in outcomes {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(failure) => failures.push(failure),
                }
            }

            let engine_memory_mb = workers[0].engine_memory_mb();
            let after = self.sampler.sample(format!("iteration {} end", iteration));
            let summary = IterationSummary {
                iteration,
                results,
                failures,
                before,
                after,
                engine_memory_mb,
            };
            info!(
                target: "duck_merge::driver",
                iteration,
                succeeded = summary.results.len(),
                failed = summary.failures.len(),
                rows = summary.rows_surviving(),
                engine_memory_mb = ?summary.engine_memory_mb,
                "Finished iteration"
            );
            iterations.push(summary);
        }

        for worker in workers {
            if let Err(e) = worker.close() {
                e.log_error();
            }
        }
        let (output_dir, output_retained) = output.finish();
        self.enter(RunPhase::Done);
        let end = self.sampler.sample("end");

        Ok(MergeRunSummary {
            label: self.config.label.clone(),
            output_dir,
            output_retained,
            key_cardinality,
            iterations,
            start,
            keys_loaded,
            end,
        })
    }

    /// Existing files in name order, cut down to the configured cap.
    fn existing_files(&self) -> Result<Vec<PathBuf>, RunError> {
        let mut files = list_data_files(&self.config.existing_dir, &self.config.file_extension)
            .map_err(|e| RunError::new(RunPhase::Iterating, MergeError::Io(e)))?;
        if files.is_empty() {
            warn!(target: "duck_merge::driver", dir = %self.config.existing_dir.display(), "No existing files to merge");
        }
        if let Some(cap) = self.config.file_cap() {
            files.truncate(cap);
        }
        Ok(files)
    }

    /// Runs every file through a worker and returns outcomes in file order.
    fn dispatch(
        &self,
        workers: &mut [Worker],
        pool: Option<&rayon::ThreadPool>,
        files: Vec<PathBuf>,
        columns: &Projection,
    ) -> Vec<FileOutcome> {
        let strategy = self.config.strategy;
        let mut outcomes = match pool {
            None => workers[0].process(files.into_iter().enumerate().collect(), columns, strategy),
            Some(pool) => {
                let mut partitions: Vec<Vec<(usize, PathBuf)>> = vec![Vec::new(); workers.len()];
                for (index, file) in files.into_iter().enumerate() {
                    partitions[index % workers.len()].push((index, file));
                }
                pool.install(|| {
                    workers
                        .par_iter_mut()
                        .zip(partitions.into_par_iter())
                        .flat_map_iter(|(worker, files)| worker.process(files, columns, strategy))
                        .collect::<Vec<_>>()
                })
            }
        };
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }

    fn enter(&mut self, phase: RunPhase) {
        info!(target: "duck_merge::driver", from = %self.phase, to = %phase, label = %self.config.label, "Run phase");
        self.phase = phase;
    }
}

/// Runs one batch merge with `config`.
pub fn run_merge(config: MergeConfig) -> Result<MergeRunSummary, RunError> {
    BatchMergeDriver::new(config).run()
}
