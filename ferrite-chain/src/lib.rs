//! Chain definitions and the binary-codec layer of the Ferrite indexer.
//!
//! Decodes raw block and transaction bytes from Bitcoin-derived networks
//! (standard headers, Equihash-family headers, Zcash-style headers, Dash
//! DIP2 special transactions) into structured records, re-encodes them back
//! to bytes, and exposes per-network parameters through the coin capability
//! table.
//!
//! Every decode and encode call is a pure function of its input and the
//! chain configuration: no shared state is mutated, nothing is logged, and
//! malformed input fails fast with a typed error instead of returning a
//! partial result. The registry in [`coin`] is fixed at startup and
//! read-only for the life of the process, so any number of workers may
//! decode concurrently without locking.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod block;
pub mod coin;
pub mod dash;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod header;
pub mod script;
pub mod transaction;

pub use block::Block;
pub use coin::{lookup_coin, lookup_selection, lookup_xverbytes, Coin, TxStats, COINS};
pub use dash::SpecialPayload;
pub use encoding::CompactSize;
pub use error::{CoinError, ParseError};
pub use hash::{double_sha256, hash_to_hex_str, hashx_from_script, HASHX_LEN};
pub use header::{BlockHeader, DecodedHeader, HeaderLayout, Nonce};
pub use transaction::{Tx, TxInput, TxLayout, TxOutput};
