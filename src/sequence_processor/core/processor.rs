use super::sequence::Record;
use super::stats::ProcessingStats;
use anyhow::Result;
use std::ops::ControlFlow;

/// Receives every record read from the inputs, in order.
pub trait SequenceProcessor {
    /// Handles one record. `ControlFlow::Break` ends the whole run.
    fn process_sequence(&mut self, record: &mut Record) -> Result<ControlFlow<()>>;
    fn update_progress(&mut self, _stats: &ProcessingStats) {}
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
