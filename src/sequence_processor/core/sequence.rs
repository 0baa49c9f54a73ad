use std::fmt;

/// Phred+33 offset used by FASTQ quality strings.
pub const PHRED_OFFSET: u8 = 33;

/// Highest decoded score accepted from a quality string.
pub const MAX_PHRED_SCORE: u8 = 99;

/// One FASTA/FASTQ entry. Only `comment` is rewritten while filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub comment: Option<String>,
    pub data: Vec<u8>,
    /// Decoded Phred scores, one per base; `None` for FASTA.
    pub quality: Option<Vec<u8>>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn quality_scores(&self) -> &[u8] {
        self.quality.as_deref().unwrap_or(&[])
    }
}

/// FASTQ records print as `@id comment`, sequence, `+`, qualities; FASTA
/// records as `>id comment` and sequence. No trailing newline.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.quality.is_some() { '@' } else { '>' };
        write!(f, "{}{}", marker, self.id)?;
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            write!(f, " {}", comment)?;
        }
        write!(f, "\n{}", String::from_utf8_lossy(&self.data))?;

        if let Some(quality) = &self.quality {
            let encoded: String = quality
                .iter()
                .map(|&q| char::from(q.saturating_add(PHRED_OFFSET)))
                .collect();
            write!(f, "\n+\n{}", encoded)?;
        }
        Ok(())
    }
}
