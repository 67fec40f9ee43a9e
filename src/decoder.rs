//! The contract every section decoder implements.
//!
//! A decoder is a stateless value that turns one [`SectionBlock`] into a typed
//! record. Decoders do not scan the log themselves: a [`Locator`] is handed to
//! [`SectionDecoder::extract`], which selects the occurrence declared in the
//! section table and attaches the section identity to any decoding failure.

use crate::error::{DecodeError, NboError, Result};
use crate::locator::{Locator, SectionBlock};
use crate::sections::SectionMarker;
use log::debug;

/// Decodes the table of one section type.
pub trait SectionDecoder {
    /// Decoded record of one block
    type Record;

    /// Section this decoder reads
    const MARKER: SectionMarker;

    /// Decodes one block.
    ///
    /// Fails with [`DecodeError::EmptySection`] when the block has no data
    /// rows and with [`DecodeError::MalformedRow`] on the first row that does
    /// not match the table layout. Rows are never skipped.
    fn decode(&self, block: &SectionBlock<'_>) -> std::result::Result<Self::Record, DecodeError>;

    /// Locates the configured occurrence of [`Self::MARKER`] and decodes it.
    fn extract(&self, locator: &Locator<'_>) -> Result<Self::Record> {
        let occurrence = Self::MARKER.occurrence();
        let block = locator.require(Self::MARKER, occurrence)?;
        debug!(
            "Decoding {} (occurrence #{}, line {})",
            Self::MARKER,
            occurrence,
            block.first_line
        );
        self.decode(&block).map_err(|source| NboError::Section {
            marker: Self::MARKER,
            occurrence,
            source,
        })
    }
}

/// Returns `rows`, or [`DecodeError::EmptySection`] when there are none.
pub(crate) fn non_empty<T>(rows: Vec<T>) -> std::result::Result<Vec<T>, DecodeError> {
    if rows.is_empty() {
        Err(DecodeError::EmptySection)
    } else {
        Ok(rows)
    }
}
