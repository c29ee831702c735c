//! Transaction decoding and encoding.

use std::io::Cursor;

use crate::dash::{self, SpecialPayload};
use crate::encoding::{
    read_bytes, read_le_i32, read_le_i64, read_le_u32, read_varbytes, remaining, write_fixed,
    write_varbytes, CompactSize,
};
use crate::error::ParseError;

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// Hash of the transaction holding the spent output. 32 bytes.
    pub prev_hash: Vec<u8>,
    /// Index of the spent output.
    pub prev_idx: u32,
    /// Signature script.
    pub script: Vec<u8>,
    /// Sequence number.
    pub sequence: u32,
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in the chain's smallest units.
    pub value: i64,
    /// Output script.
    pub pk_script: Vec<u8>,
}

/// A decoded transaction.
///
/// `tx_type` is zero for every chain without special-transaction support.
/// When non-zero, `extra_payload` holds the payload decoded for that tag
/// and conforms to it; decoding never produces a tag without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    /// Version number. Chains with special-transaction support carry it in
    /// the low 16 bits of the header word; all others use the full word.
    pub version: i32,
    /// Inputs in wire order.
    pub inputs: Vec<TxInput>,
    /// Outputs in wire order.
    pub outputs: Vec<TxOutput>,
    /// Lock time.
    pub locktime: u32,
    /// Special-transaction type tag; zero when untagged.
    pub tx_type: u16,
    /// Special-transaction payload for a non-zero tag.
    pub extra_payload: Option<SpecialPayload>,
}

/// Transaction wire-format variant, selected per chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxLayout {
    /// Version, inputs, outputs, locktime.
    Standard,
    /// Standard fields plus the DIP2 type tag and special payload.
    DashSpecial,
}

impl TxLayout {
    /// Decodes one transaction at the cursor.
    pub fn read_tx(&self, cursor: &mut Cursor<&[u8]>) -> Result<Tx, ParseError> {
        match self {
            TxLayout::Standard => read_standard_tx(cursor),
            TxLayout::DashSpecial => dash::read_dash_tx(cursor),
        }
    }

    /// Encodes a transaction; the exact inverse of [`TxLayout::read_tx`].
    pub fn serialize_tx(&self, tx: &Tx) -> Result<Vec<u8>, ParseError> {
        match self {
            TxLayout::Standard => serialize_standard_tx(tx),
            TxLayout::DashSpecial => dash::serialize_dash_tx(tx),
        }
    }

    /// Reads transactions from `start` until the buffer is exhausted,
    /// pairing each with its verbatim byte span (needed downstream for
    /// hash computation and storage).
    pub fn read_tx_block(
        &self,
        raw: &[u8],
        start: usize,
    ) -> Result<Vec<(Tx, Vec<u8>)>, ParseError> {
        let mut cursor = Cursor::new(raw);
        cursor.set_position(start as u64);

        let mut transactions = Vec::new();
        while remaining(&cursor) > 0 {
            let tx_start = cursor.position() as usize;
            let tx = self.read_tx(&mut cursor)?;
            let tx_end = cursor.position() as usize;
            transactions.push((tx, raw[tx_start..tx_end].to_vec()));
        }
        Ok(transactions)
    }
}

fn read_standard_tx(cursor: &mut Cursor<&[u8]>) -> Result<Tx, ParseError> {
    let version = read_le_i32(cursor, "tx version")?;
    let inputs = read_inputs(cursor)?;
    let outputs = read_outputs(cursor)?;
    let locktime = read_le_u32(cursor, "tx locktime")?;
    Ok(Tx {
        version,
        inputs,
        outputs,
        locktime,
        tx_type: 0,
        extra_payload: None,
    })
}

fn serialize_standard_tx(tx: &Tx) -> Result<Vec<u8>, ParseError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tx.version.to_le_bytes());
    write_inputs(&mut buf, &tx.inputs)?;
    write_outputs(&mut buf, &tx.outputs)?;
    buf.extend_from_slice(&tx.locktime.to_le_bytes());
    Ok(buf)
}

pub(crate) fn read_inputs(cursor: &mut Cursor<&[u8]>) -> Result<Vec<TxInput>, ParseError> {
    let count: usize = CompactSize::read_t(cursor, "tx input count")?;
    (0..count).map(|_| read_input(cursor)).collect()
}

fn read_input(cursor: &mut Cursor<&[u8]>) -> Result<TxInput, ParseError> {
    Ok(TxInput {
        prev_hash: read_bytes(cursor, 32, "input prev_hash")?,
        prev_idx: read_le_u32(cursor, "input prev_idx")?,
        script: read_varbytes(cursor, "input script")?,
        sequence: read_le_u32(cursor, "input sequence")?,
    })
}

pub(crate) fn read_outputs(cursor: &mut Cursor<&[u8]>) -> Result<Vec<TxOutput>, ParseError> {
    let count: usize = CompactSize::read_t(cursor, "tx output count")?;
    (0..count).map(|_| read_output(cursor)).collect()
}

fn read_output(cursor: &mut Cursor<&[u8]>) -> Result<TxOutput, ParseError> {
    Ok(TxOutput {
        value: read_le_i64(cursor, "output value")?,
        pk_script: read_varbytes(cursor, "output pk_script")?,
    })
}

pub(crate) fn write_inputs(buf: &mut Vec<u8>, inputs: &[TxInput]) -> Result<(), ParseError> {
    CompactSize::write(buf, inputs.len() as u64);
    for input in inputs {
        write_fixed(buf, &input.prev_hash, 32, "input prev_hash")?;
        buf.extend_from_slice(&input.prev_idx.to_le_bytes());
        write_varbytes(buf, &input.script);
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }
    Ok(())
}

pub(crate) fn write_outputs(buf: &mut Vec<u8>, outputs: &[TxOutput]) -> Result<(), ParseError> {
    CompactSize::write(buf, outputs.len() as u64);
    for output in outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        write_varbytes(buf, &output.pk_script);
    }
    Ok(())
}
