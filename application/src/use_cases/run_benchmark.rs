//! Run Benchmark use case
//!
//! Runs the council over a dataset, once per repetition. Questions are
//! answered strictly one after another; the artifact for the repetition is
//! rewritten after each one and the agents are reset before the next.

use crate::config::CouncilParams;
use crate::ports::dataset::{DatasetError, DatasetSource};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::reasoning_endpoint::ReasoningEndpoint;
use crate::ports::result_store::{ResultStore, StoreError};
use crate::use_cases::run_council::{RunCouncilError, RunCouncilUseCase};
use docquorum_domain::{QuestionOutcome, RunSummary};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that abort a benchmark run
#[derive(Error, Debug)]
pub enum RunBenchmarkError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Council error: {0}")]
    Council(#[from] RunCouncilError),
}

/// Input for the RunBenchmark use case
#[derive(Debug, Clone)]
pub struct RunBenchmarkInput {
    /// Questions taken from the head of the dataset
    pub sample_num: usize,
    pub agent_count: usize,
    pub repetitions: usize,
}

impl RunBenchmarkInput {
    pub fn new(sample_num: usize, agent_count: usize) -> Self {
        Self {
            sample_num,
            agent_count,
            repetitions: 1,
        }
    }

    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }
}

/// Use case for running the council across a dataset
pub struct RunBenchmarkUseCase<E: ReasoningEndpoint + 'static> {
    endpoint: Arc<E>,
    dataset: Arc<dyn DatasetSource>,
    store: Arc<dyn ResultStore>,
    params: CouncilParams,
}

impl<E: ReasoningEndpoint + 'static> RunBenchmarkUseCase<E> {
    pub fn new(
        endpoint: Arc<E>,
        dataset: Arc<dyn DatasetSource>,
        store: Arc<dyn ResultStore>,
        params: CouncilParams,
    ) -> Self {
        Self {
            endpoint,
            dataset,
            store,
            params,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunBenchmarkInput,
    ) -> Result<Vec<RunSummary>, RunBenchmarkError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunBenchmarkInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<RunSummary>, RunBenchmarkError> {
        let mut summaries = Vec::with_capacity(input.repetitions);

        for repetition in 0..input.repetitions {
            let items = self.dataset.load(input.sample_num)?;
            info!(
                "Repetition {}: {} questions from {} with model {}",
                repetition,
                items.len(),
                self.dataset.name(),
                self.endpoint.model()
            );
            progress.on_run_start(repetition, items.len());

            let mut council = RunCouncilUseCase::new(
                Arc::clone(&self.endpoint),
                input.agent_count,
                self.params.clone(),
            )?;
            let mut outcomes: Vec<QuestionOutcome> = Vec::with_capacity(items.len());

            for (index, item) in items.iter().enumerate() {
                let consensus = match council.execute_with_progress(item, progress).await {
                    Ok(consensus) => consensus,
                    Err(e) => {
                        error!("[Q{}] Aborted: {}", index, e);
                        council.reset();
                        continue;
                    }
                };
                info!("[Q{}] Final Decision: {}", index, consensus.decision);
                progress.on_question_complete(index, &consensus);

                outcomes.push(QuestionOutcome::new(
                    index,
                    consensus.decision,
                    item.answer.clone(),
                ));
                self.store.save(repetition, &outcomes)?;
                council.reset();
            }

            let summary = RunSummary::from_outcomes(repetition, &outcomes);
            info!(
                "Repetition {} finished: {}/{} correct, {} abstained",
                repetition, summary.correct, summary.total, summary.abstained
            );
            progress.on_run_complete(repetition);
            summaries.push(summary);
        }

        Ok(summaries)
    }
}
