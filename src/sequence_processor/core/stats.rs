#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Records read from input files
    pub processed: u64,
    pub files: u64,
    /// Set when the processor asked to stop before the inputs were exhausted
    pub stopped: bool,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.processed += other.processed;
        self.files += other.files;
        self.stopped |= other.stopped;
    }
}
