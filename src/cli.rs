use crate::commands::concat::ConcatOptions;
use crate::config::Config;
use crate::error::CatError;
use crate::filter::{AllowListSources, ChannelSet, CommentMode, Decision, StartTime, WindowSpec};
use crate::logging::LogLevel;
use crate::utils::file_discovery::InputSet;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catfishq", author, version, about = "Cat long lists of FASTQ files", long_about = None)]
pub struct Args {
    /// Log verbosity
    #[arg(long, value_enum, ignore_case = true, default_value = "info")]
    pub log: LogLevel,

    /// Output file ("-" for stdout)
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: String,

    /// Minimum read length
    #[arg(short = 'l', long = "min-length", default_value_t = 0)]
    pub min_length: usize,

    /// Minimum mean q-score
    #[arg(short = 'q', long = "min-qscore", default_value_t = 0)]
    pub min_qscore: u32,

    /// Only output reads sequenced at or before start time + this many minutes
    #[arg(long = "max-sequencing-time", allow_negative_numbers = true)]
    pub max_sequencing_time: Option<i64>,

    /// Only output reads sequenced at or after start time + this many minutes
    #[arg(long = "min-sequencing-time", allow_negative_numbers = true)]
    pub min_sequencing_time: Option<i64>,

    /// Start time of the run (YYYY-MM-DDTHH:MM:SSZ), or "auto" to use the earliest read
    #[arg(long = "start-time")]
    pub start_time: Option<String>,

    /// Only output reads with ids listed in this file
    #[arg(long = "filter-id")]
    pub filter_id: Option<PathBuf>,

    /// Channels `a` or inclusive ranges `a-b` to output reads from; the first
    /// `ch=` entry of the header is used
    #[arg(long = "channels", num_args = 1..)]
    pub channels: Option<Vec<String>>,

    /// Adaptive sampling decision CSV to filter by
    #[arg(long = "filter-as")]
    pub filter_as: Option<PathBuf>,

    /// Adaptive sampling decisions to keep (requires --filter-as)
    #[arg(long = "filter-as-state", value_enum, action = clap::ArgAction::Append)]
    pub filter_as_state: Vec<Decision>,

    /// Print the earliest start_time of all inputs and exit
    #[arg(
        long = "print-start-time",
        conflicts_with_all = [
            "output", "min_length", "min_qscore", "max_sequencing_time",
            "min_sequencing_time", "start_time", "filter_id", "channels",
            "filter_as", "filter_as_state", "max_n", "max_mbp", "dedup", "comments",
        ]
    )]
    pub print_start_time: bool,

    /// Stop after this many reads
    #[arg(short = 'n', long = "max-n", visible_alias = "max_n", default_value_t = 0)]
    pub max_n: u64,

    /// Stop after this many mega base pairs
    #[arg(short = 'b', long = "max-mbp", visible_alias = "max_mbp", default_value_t = 0)]
    pub max_mbp: u64,

    /// Search folders recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Remove duplicated reads
    #[arg(short = 'd', long)]
    pub dedup: bool,

    /// How to treat FASTQ header comments
    #[arg(long, value_enum)]
    pub comments: Option<CommentMode>,

    /// FASTQ files or folders containing FASTQ files
    #[arg(value_name = "FASTQ", required = true, num_args = 1..)]
    pub fastq: Vec<PathBuf>,
}

impl Args {
    pub fn inputs(&self, config: &Config) -> InputSet {
        InputSet::new(self.fastq.clone(), self.recursive, config.extensions.clone())
    }

    /// Parses the filter arguments into run options.
    pub fn concat_options(&self, config: &Config) -> Result<ConcatOptions, CatError> {
        let channels = self
            .channels
            .as_deref()
            .map(|entries| ChannelSet::parse(entries))
            .transpose()?;
        let start = self.start_time.as_deref().map(StartTime::parse).transpose()?;

        let mut options = ConcatOptions::new(self.inputs(config), self.output.clone());
        options.min_length = self.min_length;
        options.min_qscore = self.min_qscore;
        options.comments = self.comments.unwrap_or(config.comments);
        options.channels = channels;
        options.window = WindowSpec {
            start,
            max_offset_minutes: self.max_sequencing_time,
            min_offset_minutes: self.min_sequencing_time,
        };
        options.allow_list = AllowListSources {
            read_id_file: self.filter_id.clone(),
            decision_log: self.filter_as.clone(),
            decisions: self.filter_as_state.clone(),
        };
        options.dedup = self.dedup;
        options.max_reads = (self.max_n > 0).then_some(self.max_n);
        options.max_bases = match self.max_mbp {
            0 => None,
            mbp => Some(mbp.checked_mul(1_000_000).ok_or_else(|| {
                CatError::invalid_parameter("max-mbp", format!("{} is too large", mbp))
            })?),
        };

        options.allow_list.validate()?;
        options.window.validate()?;
        Ok(options)
    }
}
