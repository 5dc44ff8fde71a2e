//! Custom error types for pairec operations.

use thiserror::Error;

/// Result type alias for pairec operations
pub type Result<T> = std::result::Result<T, PairecError>;

/// Error type for pairec operations
#[derive(Error, Debug)]
pub enum PairecError {
    /// A required auxiliary tag was absent from a record
    #[error("Read '{read}' is missing required {tag} tag")]
    MissingTag {
        /// Name of the read carrying the defect
        read: String,
        /// The two-character SAM tag
        tag: String,
    },

    /// A record consumed zero query bases, so percent identity is undefined
    #[error("Read '{read}' has a zero-length alignment; percent identity is undefined")]
    ZeroLengthAlignment {
        /// Name of the read carrying the defect
        read: String,
    },

    /// An unmapped record reached the filter despite the upstream contract
    #[error("Read '{read}' is unmapped; input must be restricted to mapped records")]
    UnmappedRecord {
        /// Name of the read carrying the defect
        read: String,
    },

    /// A record without a read name cannot participate in grouping
    #[error("Encountered a record without a read name; grouping requires named reads")]
    UnnamedRecord,

    /// A run parameter was outside its valid range
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Parameter name as given on the command line
        parameter: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A file was missing or not usable as its expected format
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Expected file kind, e.g. "Input BAM"
        file_type: String,
        /// Offending path
        path: String,
        /// Why the file was rejected
        reason: String,
    },
}
