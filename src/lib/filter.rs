//! Per-record quality filtering.
//!
//! Each mapped alignment is tested against three fixed thresholds before it
//! is allowed into a read group: mapping quality, percent identity (derived
//! from the `NM` tag and the aligned query length), and aligned length.
//! Rejection drops the record silently; malformed records are fatal because
//! they indicate an upstream contract violation, not bad data to skip.

use noodles::sam::alignment::record_buf::RecordBuf;

use crate::errors::{PairecError, Result};
use crate::sam::{aligned_query_length, edit_distance, name_lossy};

/// MAPQ value used when a record carries the SAM "unavailable" sentinel
/// (255); it compares numerically, so it passes any threshold.
const MAPQ_UNAVAILABLE: u8 = 255;

/// Why a record was rejected, or `Pass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Record survives all thresholds
    Pass,
    /// Mapping quality below the threshold
    LowMappingQuality,
    /// Percent identity below the threshold
    LowIdentity,
    /// Aligned query length below the threshold
    ShortAlignment,
}

impl FilterDecision {
    /// True when the record passed every threshold.
    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, FilterDecision::Pass)
    }
}

/// Fixed per-run filter thresholds.
#[derive(Debug, Clone, Copy)]
pub struct FilterThresholds {
    /// Minimum mapping quality (records strictly below are rejected)
    pub min_mapq: u8,
    /// Minimum percent identity in `[0, 100]`
    pub min_percent_identity: f64,
    /// Minimum aligned query length in bases
    pub min_alignment_length: usize,
}

impl FilterThresholds {
    /// Evaluates one record against the thresholds.
    ///
    /// Checks run in a fixed order (MAPQ, identity, length) so that a
    /// record already rejected on MAPQ never requires the `NM` tag.
    ///
    /// # Errors
    ///
    /// Fatal errors, per the input contract:
    /// - [`PairecError::UnmappedRecord`] when an unmapped record reaches
    ///   the filter (the source must exclude them);
    /// - [`PairecError::MissingTag`] when `NM` is absent;
    /// - [`PairecError::ZeroLengthAlignment`] when the CIGAR consumes no
    ///   query bases, leaving percent identity undefined.
    pub fn evaluate(&self, record: &RecordBuf) -> Result<FilterDecision> {
        if record.flags().is_unmapped() {
            return Err(PairecError::UnmappedRecord { read: name_lossy(record) });
        }

        let mapq = record.mapping_quality().map_or(MAPQ_UNAVAILABLE, |q| q.get());
        if mapq < self.min_mapq {
            return Ok(FilterDecision::LowMappingQuality);
        }

        let aligned_len = aligned_query_length(record);
        if aligned_len == 0 {
            return Err(PairecError::ZeroLengthAlignment { read: name_lossy(record) });
        }

        let nm = edit_distance(record)?;
        if percent_identity(nm, aligned_len) < self.min_percent_identity {
            return Ok(FilterDecision::LowIdentity);
        }

        if aligned_len < self.min_alignment_length {
            return Ok(FilterDecision::ShortAlignment);
        }

        Ok(FilterDecision::Pass)
    }
}

/// Percent identity of an alignment: `(1 - NM / aligned_len) * 100`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_identity(edit_distance: u64, aligned_len: usize) -> f64 {
    (1.0 - edit_distance as f64 / aligned_len as f64) * 100.0
}
