use super::processor::SequenceProcessor;
use super::stats::ProcessingStats;
use anyhow::Result;
use indicatif::ProgressBar;

pub trait SequenceReader {
    /// Feeds records to `processor` until the input ends or the processor breaks.
    fn read_sequences<P: SequenceProcessor>(
        &mut self,
        processor: &mut P,
        progress: &ProgressBar,
    ) -> Result<ProcessingStats>;
}
