use crate::error::{CatError, Result};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// First `ch=<digits>` token in a header comment.
static CHANNEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)ch=(?P<channel>\d+)").expect("valid channel regex"));

/// Single channel `a` or inclusive range `a-b`.
static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<c1>\d+)(-(?P<c2>\d+))?$").expect("valid range regex"));

const WRAP_TAG: &str = "CO:Z:";

/// Set of channel ids selected on the command line, kept as sorted disjoint
/// closed ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    ranges: Vec<RangeInclusive<u32>>,
}

impl ChannelSet {
    /// Builds the union of every range in `entries`. An entry may hold several
    /// tokens separated by commas or whitespace.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut parsed = Vec::new();
        for entry in entries {
            for token in entry
                .as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                parsed.push(parse_range(token)?);
            }
        }
        parsed.sort_unstable();

        let mut ranges: Vec<RangeInclusive<u32>> = Vec::with_capacity(parsed.len());
        for (lower, upper) in parsed {
            match ranges.last_mut() {
                // overlapping or adjacent
                Some(last) if lower <= last.end().saturating_add(1) => {
                    if upper > *last.end() {
                        *last = *last.start()..=upper;
                    }
                }
                _ => ranges.push(lower..=upper),
            }
        }
        Ok(Self { ranges })
    }

    /// Membership test for a read's channel; a read without a channel never matches.
    pub fn contains(&self, channel: Option<u32>) -> bool {
        let Some(ch) = channel else {
            return false;
        };
        let idx = self.ranges.partition_point(|r| *r.end() < ch);
        self.ranges.get(idx).is_some_and(|r| r.contains(&ch))
    }

    /// Number of channels selected.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|r| u64::from(*r.end()) - u64::from(*r.start()) + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().flat_map(|r| r.clone())
    }
}

fn parse_range(token: &str) -> Result<(u32, u32)> {
    let format_error = || CatError::ChannelFormat {
        input: token.to_string(),
    };

    let caps = RANGE_PATTERN.captures(token.trim()).ok_or_else(format_error)?;
    let lower: u32 = caps["c1"].parse().map_err(|_| format_error())?;
    let upper: u32 = match caps.name("c2") {
        Some(c2) => c2.as_str().parse().map_err(|_| format_error())?,
        None => lower,
    };

    if upper < lower {
        return Err(CatError::ChannelRange {
            input: token.to_string(),
            lower,
            upper,
        });
    }
    Ok((lower, upper))
}

/// Channel id from the first `ch=` token of a header comment. A leading wrap
/// tag is ignored so wrapped comments resolve the same as the original text.
pub fn channel_from_comment(comment: Option<&str>) -> Option<u32> {
    let comment = comment?;
    let comment = comment.strip_prefix(WRAP_TAG).unwrap_or(comment);
    CHANNEL_PATTERN
        .captures(comment)
        .and_then(|caps| caps["channel"].parse().ok())
}
