//! Block-header layouts and decoding.
//!
//! Three layouts cover the supported chains: the standard fixed 80-byte
//! header, the Equihash-family header whose variable-length solution is
//! skipped by its own length prefix, and the Zcash-style header that embeds
//! a fixed-size solution consumed by position. The previous-block hash sits
//! at bytes 4..36 in all of them.

use std::io::Cursor;

use crate::encoding::{read_array, read_bytes, read_le_u32, skip_bytes, CompactSize};
use crate::error::ParseError;

/// Standard fixed header length in bytes.
pub const STANDARD_HEADER_SIZE: usize = 80;

/// Fixed field region of an Equihash-family header, excluding the solution.
pub const EQUIHASH_BASE_SIZE: usize = 140;

/// Byte layout of a chain's block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Fixed-size header: `size` bytes at every height.
    Static {
        /// Header length in bytes.
        size: usize,
    },

    /// Equihash-family header: `base_size` fixed bytes followed by a
    /// CompactSize-prefixed proof-of-work solution. The solution is skipped
    /// to find the end of the header region and is not part of the header
    /// bytes returned to callers.
    Equihash {
        /// Fixed field region length, excluding the solution.
        base_size: usize,
    },

    /// Zcash-style header: `total_size` bytes consumed by position, of
    /// which only the first `header_size` are the semantic header.
    EquihashFixed {
        /// Total bytes the header region occupies in a raw block.
        total_size: usize,
        /// Length of the semantic header returned to callers.
        header_size: usize,
    },
}

/// Proof-of-work nonce, whose width depends on the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nonce {
    /// 4-byte nonce of the standard layout.
    U32(u32),
    /// 32-byte nonce of the Equihash layouts.
    Wide([u8; 32]),
}

/// Decoded block-header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version.
    pub version: u32,
    /// Hash of the previous block's header.
    pub prev_hash: [u8; 32],
    /// Merkle root over the block's transactions.
    pub merkle_root: [u8; 32],
    /// Reserved field of the Equihash layouts; absent in the standard one.
    pub reserved: Option<[u8; 32]>,
    /// Block timestamp.
    pub timestamp: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: Nonce,
}

/// A decoded header: its bytes, parsed fields, and the number of bytes the
/// header region occupies in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHeader {
    /// Semantic header bytes, excluding any skipped solution.
    pub bytes: Vec<u8>,
    /// Parsed field record.
    pub fields: BlockHeader,
    /// Bytes consumed from the source buffer; transactions start here.
    pub consumed: usize,
}

impl HeaderLayout {
    /// True when the chain uses the standard fixed layout, making flat-file
    /// header offsets computable from a height alone.
    pub fn is_static(&self) -> bool {
        matches!(self, HeaderLayout::Static { .. })
    }

    /// Byte offset of header `height` in a flat headers store.
    ///
    /// This equality only holds while the header length never changes; it
    /// is a precondition that the layout is the standard fixed one.
    pub fn static_header_offset(&self, height: u64) -> u64 {
        match *self {
            HeaderLayout::Static { size } => height * size as u64,
            _ => panic!("static_header_offset requires a fixed-size header layout"),
        }
    }

    /// Decodes the header region at the start of `raw`.
    ///
    /// `raw` is typically an entire raw block; bytes beyond the header
    /// region are ignored. The input is never mutated.
    pub fn decode(&self, raw: &[u8]) -> Result<DecodedHeader, ParseError> {
        let mut cursor = Cursor::new(raw);
        match *self {
            HeaderLayout::Static { size } => {
                let bytes = read_bytes(&mut cursor, size, "header")?;
                let fields = read_standard_fields(&mut Cursor::new(&bytes[..]))?;
                Ok(DecodedHeader {
                    bytes,
                    fields,
                    consumed: size,
                })
            }
            HeaderLayout::Equihash { base_size } => {
                let bytes = read_bytes(&mut cursor, base_size, "header")?;
                let fields = read_equihash_fields(&mut Cursor::new(&bytes[..]))?;
                let solution_len: usize =
                    CompactSize::read_t(&mut cursor, "header solution length")?;
                skip_bytes(&mut cursor, solution_len, "header solution")?;
                Ok(DecodedHeader {
                    bytes,
                    fields,
                    consumed: cursor.position() as usize,
                })
            }
            HeaderLayout::EquihashFixed {
                total_size,
                header_size,
            } => {
                let region = read_bytes(&mut cursor, total_size, "header")?;
                let bytes = region[..header_size].to_vec();
                let fields = read_equihash_fields(&mut Cursor::new(&bytes[..]))?;
                Ok(DecodedHeader {
                    bytes,
                    fields,
                    consumed: total_size,
                })
            }
        }
    }
}

fn read_standard_fields(cursor: &mut Cursor<&[u8]>) -> Result<BlockHeader, ParseError> {
    Ok(BlockHeader {
        version: read_le_u32(cursor, "header version")?,
        prev_hash: read_array(cursor, "header prev_hash")?,
        merkle_root: read_array(cursor, "header merkle_root")?,
        reserved: None,
        timestamp: read_le_u32(cursor, "header timestamp")?,
        bits: read_le_u32(cursor, "header bits")?,
        nonce: Nonce::U32(read_le_u32(cursor, "header nonce")?),
    })
}

fn read_equihash_fields(cursor: &mut Cursor<&[u8]>) -> Result<BlockHeader, ParseError> {
    Ok(BlockHeader {
        version: read_le_u32(cursor, "header version")?,
        prev_hash: read_array(cursor, "header prev_hash")?,
        merkle_root: read_array(cursor, "header merkle_root")?,
        reserved: Some(read_array(cursor, "header reserved")?),
        timestamp: read_le_u32(cursor, "header timestamp")?,
        bits: read_le_u32(cursor, "header bits")?,
        nonce: Nonce::Wide(read_array(cursor, "header nonce")?),
    })
}

#[cfg(test)]
mod header_tests {
    use super::*;

    /// 80-byte standard header with recognisable field values.
    fn standard_header() -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(&2u32.to_le_bytes()); // version
        header.extend_from_slice(&[0xaa; 32]); // prev_hash
        header.extend_from_slice(&[0xbb; 32]); // merkle_root
        header.extend_from_slice(&1_500_000_000u32.to_le_bytes()); // timestamp
        header.extend_from_slice(&0x1d00ffffu32.to_le_bytes()); // bits
        header.extend_from_slice(&42u32.to_le_bytes()); // nonce
        header
    }

    /// 140-byte Equihash field region followed by a 3-byte solution.
    fn equihash_header(solution: &[u8]) -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(&4u32.to_le_bytes()); // version
        header.extend_from_slice(&[0xaa; 32]); // prev_hash
        header.extend_from_slice(&[0xbb; 32]); // merkle_root
        header.extend_from_slice(&[0xcc; 32]); // reserved
        header.extend_from_slice(&1_600_000_000u32.to_le_bytes()); // timestamp
        header.extend_from_slice(&0x1f07ffffu32.to_le_bytes()); // bits
        header.extend_from_slice(&[0xdd; 32]); // nonce
        header.push(solution.len() as u8); // solution length
        header.extend_from_slice(solution);
        header
    }

    #[test]
    fn static_layout_decodes_the_standard_fields() {
        let layout = HeaderLayout::Static {
            size: STANDARD_HEADER_SIZE,
        };
        let raw = standard_header();

        let decoded = layout.decode(&raw).unwrap();
        assert_eq!(decoded.bytes, raw);
        assert_eq!(decoded.consumed, STANDARD_HEADER_SIZE);
        assert_eq!(decoded.fields.version, 2);
        assert_eq!(decoded.fields.prev_hash, [0xaa; 32]);
        assert_eq!(decoded.fields.merkle_root, [0xbb; 32]);
        assert_eq!(decoded.fields.reserved, None);
        assert_eq!(decoded.fields.bits, 0x1d00ffff);
        assert_eq!(decoded.fields.nonce, Nonce::U32(42));
    }

    #[test]
    fn static_layout_ignores_trailing_block_bytes() {
        let layout = HeaderLayout::Static {
            size: STANDARD_HEADER_SIZE,
        };
        let mut raw = standard_header();
        raw.extend_from_slice(&[0xff; 64]); // transactions follow the header

        let decoded = layout.decode(&raw).unwrap();
        assert_eq!(decoded.bytes.len(), STANDARD_HEADER_SIZE);
        assert_eq!(decoded.consumed, STANDARD_HEADER_SIZE);
    }

    #[test]
    fn static_offsets_advance_by_the_header_length() {
        let layout = HeaderLayout::Static {
            size: STANDARD_HEADER_SIZE,
        };
        for height in 0..5u64 {
            assert_eq!(
                layout.static_header_offset(height + 1) - layout.static_header_offset(height),
                STANDARD_HEADER_SIZE as u64
            );
        }
    }

    #[test]
    fn equihash_layout_skips_the_solution() {
        let layout = HeaderLayout::Equihash {
            base_size: EQUIHASH_BASE_SIZE,
        };
        let solution = [0xee, 0xee, 0xee];
        let raw = equihash_header(&solution);

        let decoded = layout.decode(&raw).unwrap();
        assert_eq!(decoded.bytes, &raw[..EQUIHASH_BASE_SIZE]);
        assert_eq!(decoded.consumed, EQUIHASH_BASE_SIZE + 1 + solution.len());
        assert_eq!(decoded.fields.reserved, Some([0xcc; 32]));
        assert_eq!(decoded.fields.nonce, Nonce::Wide([0xdd; 32]));
    }

    #[test]
    fn equihash_fixed_layout_consumes_by_position() {
        let layout = HeaderLayout::EquihashFixed {
            total_size: 243,
            header_size: EQUIHASH_BASE_SIZE,
        };
        // 140 bytes of fields, then 103 bytes of embedded solution.
        let mut raw = equihash_header(&[]);
        raw.truncate(EQUIHASH_BASE_SIZE);
        raw.extend_from_slice(&[0x55; 103]);

        let decoded = layout.decode(&raw).unwrap();
        assert_eq!(decoded.bytes, &raw[..EQUIHASH_BASE_SIZE]);
        assert_eq!(decoded.consumed, 243);
        assert_eq!(decoded.fields.version, 4);
    }

    #[test]
    fn truncated_headers_are_rejected() {
        let layout = HeaderLayout::Static {
            size: STANDARD_HEADER_SIZE,
        };
        let mut raw = standard_header();
        raw.pop();

        match layout.decode(&raw) {
            Err(ParseError::TruncatedInput { field, wanted, .. }) => {
                assert_eq!(field, "header");
                assert_eq!(wanted, STANDARD_HEADER_SIZE);
            }
            other => panic!("Expected TruncatedInput, got: {other:?}"),
        }
    }

    #[test]
    fn truncated_solution_is_rejected() {
        let layout = HeaderLayout::Equihash {
            base_size: EQUIHASH_BASE_SIZE,
        };
        let mut raw = equihash_header(&[0xee; 3]);
        raw.pop();

        match layout.decode(&raw) {
            Err(ParseError::TruncatedInput { field, .. }) => {
                assert_eq!(field, "header solution");
            }
            other => panic!("Expected TruncatedInput, got: {other:?}"),
        }
    }
}
