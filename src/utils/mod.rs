pub mod file_discovery;
pub mod progress_bar_builder;
