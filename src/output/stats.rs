//! Crawl growth statistics
//!
//! Each processed document adds one row: how many documents had been
//! processed at that moment, and how many URLs were known in total
//! (unique discovered plus visited).

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Growth curve of a crawl run, keyed by documents processed (1..N)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    rows: BTreeMap<usize, usize>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the snapshot taken when the `processed`-th document finished
    pub fn record(&mut self, processed: usize, unique_count: usize) {
        self.rows.insert(processed, unique_count + processed);
    }

    /// Number of recorded rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot for the `processed`-th document, if recorded
    pub fn get(&self, processed: usize) -> Option<usize> {
        self.rows.get(&processed).copied()
    }

    /// Rows in increasing document order
    pub fn rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().map(|(&i, &stat)| (i, stat))
    }

    /// Writes one `<i> <stat(i)>` line per row
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (i, stat) in self.rows() {
            writeln!(out, "{} {}", i, stat)?;
        }
        Ok(())
    }

    /// Prints the table to stdout
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle)?;
        handle.flush()
    }
}
