//! Sequential scanning of simulation results files into run blocks
//!
//! A results file is a sequence of fixed-size blocks, one per simulation
//! run: `requesters` result lines followed by one control line holding the
//! total control bytes sent in that run.

use crate::{
    error::{AppError, ErrorContext, Result},
    models::records::{parse_control_bytes, ResultLine},
};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One simulation run read from a results file
#[derive(Debug, Clone, PartialEq)]
pub struct RunBlock {
    /// Zero-based run index within the file
    pub index: usize,
    /// 1-based line number of the first requester line
    pub start_line: usize,
    /// Requester result lines, in file order
    pub results: Vec<ResultLine>,
    /// Total control bytes reported by the trailing control line
    pub control_bytes: f64,
}

/// Iterator over the run blocks of a results file
pub struct RunBlockReader<R> {
    lines: Lines<R>,
    source: PathBuf,
    block_size: usize,
    line_number: usize,
    runs: usize,
    pending: Vec<ResultLine>,
    finished: bool,
}

impl RunBlockReader<BufReader<File>> {
    /// Open a results file for scanning
    pub fn open(path: &Path, requesters: u32) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open results file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file), path, requesters))
    }
}

impl<R: BufRead> RunBlockReader<R> {
    /// Scan `reader`; `source` is only used in error messages
    pub fn new<P: Into<PathBuf>>(reader: R, source: P, requesters: u32) -> Self {
        let requesters = requesters as usize;
        Self {
            lines: reader.lines(),
            source: source.into(),
            block_size: requesters + 1,
            line_number: 0,
            runs: 0,
            pending: Vec::with_capacity(requesters),
            finished: false,
        }
    }

    /// Lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Complete runs produced so far
    pub fn runs_read(&self) -> usize {
        self.runs
    }

    /// Requester lines read after the last control line
    pub fn dangling_lines(&self) -> usize {
        self.pending.len()
    }

    /// Path used in error messages
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn next_block(&mut self) -> Option<Result<RunBlock>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(AppError::io(format!(
                        "{}:{}: {}",
                        self.source.display(),
                        self.line_number + 1,
                        e
                    ))))
                }
            };
            self.line_number += 1;

            if self.line_number % self.block_size == 0 {
                let control_bytes = match parse_control_bytes(&line) {
                    Ok(bytes) => bytes,
                    Err(msg) => return Some(Err(AppError::parse_at(&self.source, self.line_number, msg))),
                };

                let results = std::mem::replace(&mut self.pending, Vec::with_capacity(self.block_size - 1));
                let block = RunBlock {
                    index: self.runs,
                    start_line: self.line_number + 1 - self.block_size,
                    results,
                    control_bytes,
                };
                self.runs += 1;
                return Some(Ok(block));
            }

            match ResultLine::parse_fields(&line) {
                Ok(result) => self.pending.push(result),
                Err(msg) => return Some(Err(AppError::parse_at(&self.source, self.line_number, msg))),
            }
        }
    }
}

impl<R: BufRead> Iterator for RunBlockReader<R> {
    type Item = Result<RunBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.next_block();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}
