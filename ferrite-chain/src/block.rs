//! Structured blocks assembled from raw bytes.

use crate::transaction::Tx;

/// A raw block, its decoded header region, and its transactions paired
/// with their verbatim byte spans.
///
/// Assembled by [`crate::Coin::block`] and consumed immediately by the
/// indexing pipeline; nothing here is persisted by this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Complete raw block bytes.
    pub raw: Vec<u8>,
    /// Header bytes as defined by the chain's layout.
    pub header: Vec<u8>,
    /// Transactions in block order, each with its verbatim encoding.
    pub transactions: Vec<(Tx, Vec<u8>)>,
}

#[cfg(test)]
mod block_tests {
    use crate::coin::lookup_coin;
    use crate::error::{CoinError, ParseError};
    use crate::header::STANDARD_HEADER_SIZE;

    /// The 80-byte Bitcoin mainnet genesis header.
    fn bitcoin_genesis_header() -> Vec<u8> {
        hex::decode(concat!(
            "01000000",                                                         // version
            "0000000000000000000000000000000000000000000000000000000000000000", // prev_hash
            "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a", // merkle_root
            "29ab5f49",                                                         // timestamp
            "ffff001d",                                                         // bits
            "1dac2b7c",                                                         // nonce
        ))
        .unwrap()
    }

    /// A miniature block: genesis header followed by one standard
    /// transaction.
    fn bitcoin_block() -> (Vec<u8>, Vec<u8>) {
        let mut tx = Vec::new();
        tx.extend_from_slice(&1i32.to_le_bytes()); // version
        tx.push(1); // input count
        tx.extend_from_slice(&[0x00; 32]); // prev_hash
        tx.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // prev_idx
        tx.push(2); // script length
        tx.extend_from_slice(&[0x04, 0xff]); // script
        tx.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // sequence
        tx.push(1); // output count
        tx.extend_from_slice(&5_000_000_000i64.to_le_bytes()); // value
        tx.push(1); // pk_script length
        tx.push(0xac); // pk_script
        tx.extend_from_slice(&0u32.to_le_bytes()); // locktime

        let mut raw = bitcoin_genesis_header();
        raw.extend_from_slice(&tx);
        (raw, tx)
    }

    #[test]
    fn genesis_block_hashes_to_the_published_value() {
        let coin = lookup_coin("Bitcoin", "mainnet").unwrap();
        let header = bitcoin_genesis_header();

        let trimmed = coin.genesis_block(&header).unwrap();
        // Header plus the one-byte sentinel standing in for the removed
        // unspendable coinbase.
        assert_eq!(trimmed.len(), STANDARD_HEADER_SIZE + 1);
        assert_eq!(&trimmed[..STANDARD_HEADER_SIZE], header.as_slice());
        assert_eq!(trimmed[STANDARD_HEADER_SIZE], 0);
    }

    #[test]
    fn a_wrong_genesis_block_is_rejected() {
        let coin = lookup_coin("Bitcoin", "mainnet").unwrap();
        let mut header = bitcoin_genesis_header();
        header[40] ^= 0x01; // corrupt one merkle-root byte

        match coin.genesis_block(&header) {
            Err(CoinError::GenesisMismatch { computed, expected }) => {
                assert_eq!(expected, coin.genesis_hash);
                assert_ne!(computed, expected);
            }
            other => panic!("Expected GenesisMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn genesis_comparison_is_case_insensitive() {
        let mut coin = *lookup_coin("Bitcoin", "mainnet").unwrap();
        coin.genesis_hash = "000000000019D6689C085AE165831E934FF763AE46A2A6C172B3F1B60A8CE26F";
        assert!(coin.genesis_block(&bitcoin_genesis_header()).is_ok());
    }

    #[test]
    fn blocks_pair_transactions_with_their_spans() {
        let coin = lookup_coin("Bitcoin", "mainnet").unwrap();
        let (raw, tx_bytes) = bitcoin_block();

        let block = coin.block(&raw, 0).unwrap();
        assert_eq!(block.raw, raw);
        assert_eq!(block.header, bitcoin_genesis_header());
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].1, tx_bytes);
        assert_eq!(block.transactions[0].0.outputs[0].value, 5_000_000_000);
    }

    #[test]
    fn header_prevhash_reads_the_invariant_offset() {
        let coin = lookup_coin("Bitcoin", "mainnet").unwrap();
        let header = bitcoin_genesis_header();
        assert_eq!(coin.header_prevhash(&header).unwrap(), [0u8; 32]);

        match coin.header_prevhash(&header[..20]) {
            Err(ParseError::TruncatedInput { field, .. }) => {
                assert_eq!(field, "header prev_hash");
            }
            other => panic!("Expected TruncatedInput, got: {other:?}"),
        }
    }

    #[test]
    fn truncated_blocks_never_yield_partial_results() {
        let coin = lookup_coin("Bitcoin", "mainnet").unwrap();
        let (raw, _) = bitcoin_block();

        // Inside the header.
        assert!(matches!(
            coin.block(&raw[..79], 0),
            Err(ParseError::TruncatedInput { .. })
        ));
        // Inside the transaction list.
        assert!(matches!(
            coin.block(&raw[..raw.len() - 1], 0),
            Err(ParseError::TruncatedInput { .. })
        ));
    }
}
