use super::channels::{channel_from_comment, ChannelSet};
use super::quality::mean_qscore;
use super::time_window::TimeWindow;
use crate::error::Result;
use crate::sequence_processor::Record;
use clap::ValueEnum;
use serde::Deserialize;

/// How header comments are written to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentMode {
    /// Keep the comment as is
    Forward,
    /// Drop the comment
    Skip,
    /// Wrap the comment into a `CO:Z:` tag
    #[default]
    Wrap,
}

impl CommentMode {
    pub fn apply(&self, record: &mut Record) {
        match self {
            CommentMode::Wrap => {
                if let Some(comment) = record.comment.as_mut().filter(|c| !c.is_empty()) {
                    comment.insert_str(0, "CO:Z:");
                }
            }
            CommentMode::Skip => record.comment = None,
            CommentMode::Forward => {}
        }
    }
}

/// Per-record predicates, evaluated in a fixed order; the first failure rejects.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    min_length: usize,
    min_qscore: u32,
    window: Option<TimeWindow>,
    comments: CommentMode,
    channels: Option<ChannelSet>,
}

impl FilterChain {
    pub fn new(min_length: usize, min_qscore: u32, comments: CommentMode) -> Self {
        Self {
            min_length,
            min_qscore,
            window: None,
            comments,
            channels: None,
        }
    }

    pub fn with_window(mut self, window: Option<TimeWindow>) -> Self {
        self.window = window.filter(|w| !w.is_unbounded());
        self
    }

    pub fn with_channels(mut self, channels: Option<ChannelSet>) -> Self {
        self.channels = channels;
        self
    }

    /// Returns whether `record` survives. The comment is rewritten once the
    /// time check has read it, even if the channel check then rejects.
    pub fn apply(&self, record: &mut Record) -> Result<bool> {
        if self.min_length > 0 && record.len() < self.min_length {
            return Ok(false);
        }

        if self.min_qscore > 0 && mean_qscore(record.quality_scores()) < self.min_qscore as f64 {
            return Ok(false);
        }

        if let Some(window) = &self.window {
            if !window.accepts(&record.id, record.comment.as_deref())? {
                return Ok(false);
            }
        }

        self.comments.apply(record);

        if let Some(channels) = &self.channels {
            if !channels.contains(channel_from_comment(record.comment.as_deref())) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
