pub mod concat;
pub mod start_time;

use crate::config::Config;
use crate::sequence_processor::{FastxReader, ProcessingStats, SequenceProcessor, SequenceReader};
use crate::utils::file_discovery::InputSet;
use anyhow::Result;
use indicatif::ProgressBar;

/// Streams every input file through `processor`, one file at a time, until the
/// inputs run out or the processor stops the run.
pub(crate) fn process_inputs<P: SequenceProcessor>(
    inputs: &InputSet,
    config: &Config,
    processor: &mut P,
    progress: &ProgressBar,
) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::default();

    for file in inputs.files() {
        log::debug!("Reading {}", file.display());
        let file_stats = {
            let mut reader = FastxReader::new(&file, config.read_buffer_size)?;
            reader.read_sequences(processor, progress)?
        };
        stats.merge(&file_stats);
        if stats.stopped {
            break;
        }
    }

    processor.finalize()?;
    Ok(stats)
}
