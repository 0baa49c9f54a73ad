use crate::error::CatError;
use crate::sequence_processor::core::*;
use anyhow::{Context, Result};
use bio::io::{fasta, fastq};
use indicatif::ProgressBar;
use niffler::get_reader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const PROGRESS_INTERVAL: u64 = 10_000;
const MIN_SNIFF_LEN: u64 = 5;

type Buffered = BufReader<Box<dyn Read>>;

enum FastxRecords {
    Fasta(fasta::Records<Buffered>),
    Fastq(fastq::Records<Buffered>),
    Empty,
}

/// FASTA or FASTQ reader, plain or compressed, format sniffed from the first record.
pub struct FastxReader {
    path: PathBuf,
    records: FastxRecords,
}

impl FastxReader {
    pub fn new(path: &Path, buffer_capacity: usize) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();

        // niffler needs five bytes to sniff a compression magic number
        let inner_reader: Box<dyn Read> = if len < MIN_SNIFF_LEN {
            Box::new(file)
        } else {
            get_reader(Box::new(file))
                .with_context(|| format!("Failed to detect compression of {}", path.display()))?
                .0
        };
        let mut buffered = BufReader::with_capacity(buffer_capacity, inner_reader);

        let records = match peek_first_byte(&mut buffered)
            .with_context(|| format!("Failed to read {}", path.display()))?
        {
            Some(b'>') => FastxRecords::Fasta(fasta::Reader::from_bufread(buffered).records()),
            Some(b'@') => FastxRecords::Fastq(fastq::Reader::from_bufread(buffered).records()),
            Some(other) => anyhow::bail!(
                "{} is neither FASTA nor FASTQ (starts with {:?})",
                path.display(),
                char::from(other)
            ),
            None => FastxRecords::Empty,
        };

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn create_record_from_fastq(record: &fastq::Record) -> Result<Record, CatError> {
        // bio splits the FASTQ header on spaces only
        let (id, rest) = match record.id().split_once(char::is_whitespace) {
            Some((id, rest)) => (id, Some(rest.trim_start())),
            None => (record.id(), None),
        };
        let comment = match (rest.filter(|r| !r.is_empty()), record.desc()) {
            (Some(rest), Some(desc)) => Some(format!("{} {}", rest, desc)),
            (Some(rest), None) => Some(rest.to_string()),
            (None, desc) => desc.map(str::to_string),
        };

        let quality = record
            .qual()
            .iter()
            .map(|&b| {
                b.checked_sub(PHRED_OFFSET)
                    .filter(|&q| q <= MAX_PHRED_SCORE)
                    .ok_or_else(|| CatError::InvalidQuality {
                        read_id: id.to_string(),
                        byte: b,
                    })
            })
            .collect::<Result<Vec<u8>, CatError>>()?;

        Ok(Record {
            id: id.to_string(),
            comment,
            data: record.seq().to_vec(),
            quality: Some(quality),
        })
    }

    fn create_record_from_fasta(record: &fasta::Record) -> Record {
        Record {
            id: record.id().to_string(),
            comment: record.desc().map(str::to_string),
            data: record.seq().to_vec(),
            quality: None,
        }
    }
}

/// Skips leading whitespace and returns the next byte without consuming it.
fn peek_first_byte<R: BufRead>(reader: &mut R) -> std::io::Result<Option<u8>> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let byte = buf[pos];
                reader.consume(pos);
                return Ok(Some(byte));
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

impl Iterator for FastxReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = &self.path;
        let record = match &mut self.records {
            FastxRecords::Fastq(records) => records.next()?.map_err(anyhow::Error::from).and_then(|r| {
                Self::create_record_from_fastq(&r).map_err(anyhow::Error::from)
            }),
            FastxRecords::Fasta(records) => records
                .next()?
                .map(|r| Self::create_record_from_fasta(&r))
                .map_err(anyhow::Error::from),
            FastxRecords::Empty => return None,
        };
        Some(record.with_context(|| format!("Failed to parse a record in {}", path.display())))
    }
}

impl SequenceReader for FastxReader {
    fn read_sequences<P: SequenceProcessor>(
        &mut self,
        processor: &mut P,
        progress: &ProgressBar,
    ) -> Result<ProcessingStats> {
        let mut stats = ProcessingStats {
            files: 1,
            ..Default::default()
        };

        while let Some(record) = self.next() {
            let mut record = record?;
            stats.processed += 1;
            progress.inc(1);
            if stats.processed % PROGRESS_INTERVAL == 0 {
                processor.update_progress(&stats);
            }

            if processor.process_sequence(&mut record)?.is_break() {
                stats.stopped = true;
                break;
            }
        }

        Ok(stats)
    }
}
