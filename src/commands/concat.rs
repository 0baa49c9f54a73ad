use super::start_time::find_min_start_time;
use crate::config::Config;
use crate::filter::{AllowList, AllowListSources, ChannelSet, CommentMode, FilterChain, WindowSpec};
use crate::sequence_processor::{ProcessingStats, Record, SequenceProcessor};
use crate::utils::file_discovery::InputSet;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;

/// Output names that mean standard output.
const STDOUT_NAMES: [&str; 2] = ["-", "/dev/stdout"];

/// Everything a concatenation run needs, already parsed and validated for syntax.
#[derive(Debug, Clone)]
pub struct ConcatOptions {
    pub inputs: InputSet,
    pub output: String,
    pub min_length: usize,
    pub min_qscore: u32,
    pub comments: CommentMode,
    pub channels: Option<ChannelSet>,
    pub window: WindowSpec,
    pub allow_list: AllowListSources,
    pub dedup: bool,
    pub max_reads: Option<u64>,
    pub max_bases: Option<u64>,
}

impl ConcatOptions {
    pub fn new(inputs: InputSet, output: impl Into<String>) -> Self {
        Self {
            inputs,
            output: output.into(),
            min_length: 0,
            min_qscore: 0,
            comments: CommentMode::default(),
            channels: None,
            window: WindowSpec::default(),
            allow_list: AllowListSources::default(),
            dedup: false,
            max_reads: None,
            max_bases: None,
        }
    }

    /// Checks option combinations before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.allow_list.validate()?;
        self.window.validate()?;
        Ok(())
    }
}

/// Reads and bases written so far in a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunCounters {
    pub reads: u64,
    pub bases: u64,
}

impl RunCounters {
    fn add(&mut self, record: &Record) {
        self.reads += 1;
        self.bases += record.len() as u64;
    }

    /// The read cap stops at `max_reads` written; the base cap once it is exceeded.
    fn reached(&self, max_reads: Option<u64>, max_bases: Option<u64>) -> bool {
        max_reads.is_some_and(|n| self.reads >= n) || max_bases.is_some_and(|bp| self.bases > bp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub counters: RunCounters,
    pub stats: ProcessingStats,
}

struct Concatenator<W: Write> {
    chain: FilterChain,
    allow_list: Option<AllowList>,
    /// Ids already written; `None` when dedup is off
    seen: Option<HashSet<String>>,
    writer: W,
    counters: RunCounters,
    max_reads: Option<u64>,
    max_bases: Option<u64>,
    progress: ProgressBar,
}

impl<W: Write> SequenceProcessor for Concatenator<W> {
    fn process_sequence(&mut self, record: &mut Record) -> Result<ControlFlow<()>> {
        if !self.chain.apply(record)? {
            return Ok(ControlFlow::Continue(()));
        }
        if self.seen.as_ref().is_some_and(|seen| seen.contains(&record.id)) {
            return Ok(ControlFlow::Continue(()));
        }
        if self
            .allow_list
            .as_ref()
            .is_some_and(|allowed| !allowed.contains(&record.id))
        {
            return Ok(ControlFlow::Continue(()));
        }

        writeln!(self.writer, "{}", record).context("Failed to write record")?;
        self.counters.add(record);
        if let Some(seen) = self.seen.as_mut() {
            seen.insert(record.id.clone());
        }

        if self.counters.reached(self.max_reads, self.max_bases) {
            log::info!(
                "Stopping after {} reads ({} bases)",
                self.counters.reads,
                self.counters.bases
            );
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn update_progress(&mut self, stats: &ProcessingStats) {
        self.progress.set_message(format!(
            "{} reads scanned, {} written",
            stats.processed, self.counters.reads
        ));
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }
}

fn open_output(output: &str) -> Result<Box<dyn Write>> {
    if STDOUT_NAMES.contains(&output) {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(output).with_context(|| format!("Failed to create output file {}", output))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Concatenates and filters every input into `options.output`.
pub fn run(options: &ConcatOptions, config: &Config, show_progress: bool) -> Result<RunSummary> {
    options.validate()?;

    let progress = ProgressBarBuilder::new("Concatenating")
        .with_template("{spinner:.green} [{elapsed_precise}] {pos} reads ({per_sec}) {msg}")
        .with_tick()
        .hidden(!show_progress)
        .build()?;

    let allow_list = options.allow_list.load()?;
    let window = options
        .window
        .resolve(|| find_min_start_time(&options.inputs, config, &progress))?;
    if let Some(window) = &window {
        log::info!("Keeping reads with start_time in {}", window);
    }

    let chain = FilterChain::new(options.min_length, options.min_qscore, options.comments)
        .with_window(window)
        .with_channels(options.channels.clone());

    let mut concatenator = Concatenator {
        chain,
        allow_list,
        seen: options.dedup.then(HashSet::new),
        writer: open_output(&options.output)?,
        counters: RunCounters::default(),
        max_reads: options.max_reads,
        max_bases: options.max_bases,
        progress: progress.clone(),
    };

    let stats = super::process_inputs(&options.inputs, config, &mut concatenator, &progress)?;
    progress.finish_and_clear();

    let counters = concatenator.counters;
    log::info!(
        "Wrote {} reads ({} bases) from {} files",
        counters.reads,
        counters.bases,
        stats.files
    );
    Ok(RunSummary { counters, stats })
}
