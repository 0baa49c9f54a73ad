pub mod core;
pub mod readers;

// Re-export commonly used items
pub use self::core::{ProcessingStats, Record, SequenceProcessor, SequenceReader};
pub use readers::FastxReader;
