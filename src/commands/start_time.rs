use crate::config::Config;
use crate::error::CatError;
use crate::filter::time_window::{start_time_from_comment, TIMESTAMP_FORMAT};
use crate::sequence_processor::{ProcessingStats, Record, SequenceProcessor};
use crate::utils::file_discovery::InputSet;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::Result;
use chrono::NaiveDateTime;
use indicatif::ProgressBar;
use std::ops::ControlFlow;

/// Tracks the earliest `start_time=` over every record it sees.
struct StartTimeScanner {
    earliest: Option<NaiveDateTime>,
    progress: ProgressBar,
}

impl SequenceProcessor for StartTimeScanner {
    fn process_sequence(&mut self, record: &mut Record) -> Result<ControlFlow<()>> {
        let time = start_time_from_comment(&record.id, record.comment.as_deref())?;
        if self.earliest.map_or(true, |earliest| time < earliest) {
            self.earliest = Some(time);
        }
        Ok(ControlFlow::Continue(()))
    }

    fn update_progress(&mut self, stats: &ProcessingStats) {
        self.progress
            .set_message(format!("Scanning start times: {} reads", stats.processed));
    }
}

/// Earliest acquisition time over all records of all inputs.
pub fn find_min_start_time(
    inputs: &InputSet,
    config: &Config,
    progress: &ProgressBar,
) -> Result<NaiveDateTime> {
    let mut scanner = StartTimeScanner {
        earliest: None,
        progress: progress.clone(),
    };
    let stats = super::process_inputs(inputs, config, &mut scanner, progress)?;
    log::debug!(
        "Scanned {} reads in {} files for start times",
        stats.processed,
        stats.files
    );
    Ok(scanner.earliest.ok_or(CatError::NoStartTime)?)
}

/// Prints the earliest start time of the inputs and nothing else.
pub fn run(inputs: &InputSet, config: &Config, show_progress: bool) -> Result<()> {
    let progress = ProgressBarBuilder::new("Scanning start times")
        .with_template("{spinner:.green} [{elapsed_precise}] {pos} reads ({per_sec}) {msg}")
        .with_tick()
        .hidden(!show_progress)
        .build()?;
    let earliest = find_min_start_time(inputs, config, &progress)?;
    progress.finish_and_clear();

    println!("{}", earliest.format(TIMESTAMP_FORMAT));
    Ok(())
}
