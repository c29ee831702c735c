//! Error types for the chain codec.
//!
//! All failures here are local, typed and non-retryable: a decoder reports
//! the precise failure kind with its offending context (offset, expected vs.
//! actual length) and leaves retry or escalation policy to the caller.

/// Byte-level decode/encode failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Buffer ended before a field's bytes.
    #[error(
        "truncated input reading {field}: wanted {wanted} bytes at offset \
         {offset}, {available} available"
    )]
    TruncatedInput {
        /// Field being read when the buffer ran out.
        field: &'static str,
        /// Cursor offset at which the read started.
        offset: usize,
        /// Bytes the field demands.
        wanted: usize,
        /// Bytes remaining in the buffer.
        available: usize,
    },

    /// A fixed-length field holds the wrong number of bytes at encode time.
    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidFieldLength {
        /// Field whose bytes have the wrong length.
        field: &'static str,
        /// Length the wire format demands.
        expected: usize,
        /// Length the in-memory value actually has.
        actual: usize,
    },

    /// A special payload's decoder did not land exactly on its declared end.
    #[error("special payload ended at offset {actual_end}, declared end {expected_end}")]
    PayloadLengthMismatch {
        /// Offset the length prefix declared the payload to end at.
        expected_end: usize,
        /// Offset the payload decoder actually stopped at.
        actual_end: usize,
    },

    /// A CompactSize value exceeds the range of its target type.
    #[error("CompactSize value out of range for {field}")]
    Oversized {
        /// Field whose count or length overflowed.
        field: &'static str,
    },
}

/// Coin registry and address-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinError {
    /// No registered coin matches the name/network pair.
    #[error("unknown coin {name} and network {net} combination")]
    UnknownCoin {
        /// Requested coin name.
        name: String,
        /// Requested network tag.
        net: String,
    },

    /// The coin is registered but lacks the transaction-count statistics
    /// required for sync-progress estimation.
    #[error("coin {name} {net} is missing transaction-count statistics")]
    IncompleteCoin {
        /// Requested coin name.
        name: String,
        /// Requested network tag.
        net: String,
    },

    /// Extended-key version bytes match no registered coin.
    #[error("version bytes unrecognised")]
    UnknownVersionBytes,

    /// Address failed Base58Check decoding or matched no configured version
    /// marker.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Computed genesis header hash differs from the configured hash.
    #[error("genesis block has hash {computed} expected {expected}")]
    GenesisMismatch {
        /// Hash computed from the decoded height-0 header.
        computed: String,
        /// Hash the coin configuration expects.
        expected: String,
    },

    /// Underlying byte-level decode failure.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
