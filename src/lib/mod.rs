//! Library for converting multi-way alignments into synthetic paired-end
//! BAM records.
//!
//! The core pipeline filters alignments on mapping quality, percent
//! identity, and aligned length, groups survivors by read name, and emits
//! every pairwise combination within a group as paired-end records suitable
//! for tools that only understand read pairs.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod bam_io;
pub mod errors;
pub mod filter;
pub mod header;
pub mod logging;
pub mod pairing;
pub mod progress;
pub mod sam;
pub mod validation;
