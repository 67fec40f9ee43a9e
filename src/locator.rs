//! Section location inside a Gaussian log.
//!
//! The [`Locator`] scans the complete log text once for every recognized
//! section header and hands out [`SectionBlock`]s: the text that follows one
//! header occurrence, up to the line of the next recognized header or the end
//! of the file.
//!
//! # Examples
//!
//! ```
//! use gaussnbo::locator::Locator;
//! use gaussnbo::sections::SectionMarker;
//!
//! let log = " Summary of Natural Population Analysis:\n C  -0.1  2.0  4.0  0.1\n";
//! let locator = Locator::new(log);
//! let blocks = locator.locate(SectionMarker::NaturalPopulation);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].first_line, 2);
//! ```

use crate::error::{NboError, Result};
use crate::sections::SectionMarker;
use log::debug;

/// One occurrence of a section in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBlock<'a> {
    /// Section this block belongs to
    pub marker: SectionMarker,
    /// Zero-based occurrence of the marker in file order
    pub occurrence: usize,
    /// 1-based line number of the first line of `text`
    pub first_line: usize,
    /// Block content, starting after the header line
    pub text: &'a str,
}

impl<'a> SectionBlock<'a> {
    /// Iterates the block lines paired with their 1-based log line numbers.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        let first = self.first_line;
        self.text
            .lines()
            .enumerate()
            .map(move |(i, line)| (first + i, line))
    }
}

#[derive(Debug, Clone, Copy)]
struct Header {
    marker: SectionMarker,
    /// Byte offset of the start of the header line
    line_start: usize,
    /// Byte offset of the line following the header
    body: usize,
    /// 1-based line number of the header line
    line: usize,
}

/// Finds section blocks in an immutable log text.
#[derive(Debug, Clone)]
pub struct Locator<'a> {
    log: &'a str,
    headers: Vec<Header>,
}

impl<'a> Locator<'a> {
    /// Scans `log` for every recognized section header.
    pub fn new(log: &'a str) -> Self {
        let mut headers = Vec::new();
        for marker in SectionMarker::ALL {
            for (pos, _) in log.match_indices(marker.header()) {
                let line_start = log[..pos].rfind('\n').map_or(0, |i| i + 1);
                let body = log[pos..].find('\n').map_or(log.len(), |i| pos + i + 1);
                let line = log[..pos].matches('\n').count() + 1;
                headers.push(Header {
                    marker,
                    line_start,
                    body,
                    line,
                });
            }
        }
        headers.sort_by_key(|h| h.line_start);
        debug!("Located {} section headers", headers.len());
        Self { log, headers }
    }

    /// Returns every block of `marker` in file order.
    ///
    /// A block ends where the next recognized header line starts, whatever
    /// its marker, or at the end of the log. The result is empty when the
    /// marker never appears.
    pub fn locate(&self, marker: SectionMarker) -> Vec<SectionBlock<'a>> {
        let mut blocks = Vec::new();
        for (i, header) in self.headers.iter().enumerate() {
            if header.marker != marker {
                continue;
            }
            let end = self.headers[i + 1..]
                .iter()
                .map(|next| next.line_start)
                .find(|&start| start >= header.body)
                .unwrap_or(self.log.len());
            blocks.push(SectionBlock {
                marker,
                occurrence: blocks.len(),
                first_line: header.line + 1,
                text: &self.log[header.body..end],
            });
        }
        debug!("{}: {} occurrence(s)", marker, blocks.len());
        blocks
    }

    /// Returns the requested occurrence of `marker`.
    ///
    /// Fails with [`NboError::SectionNotFound`] when the log holds fewer
    /// occurrences.
    pub fn require(&self, marker: SectionMarker, occurrence: usize) -> Result<SectionBlock<'a>> {
        let blocks = self.locate(marker);
        let found = blocks.len();
        blocks
            .into_iter()
            .nth(occurrence)
            .ok_or(NboError::SectionNotFound {
                marker,
                occurrence,
                found,
            })
    }

    /// Number of times `marker` occurs in the log.
    pub fn occurrences(&self, marker: SectionMarker) -> usize {
        self.headers.iter().filter(|h| h.marker == marker).count()
    }
}
