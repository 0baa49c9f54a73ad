mod fastx;

pub use fastx::FastxReader;
