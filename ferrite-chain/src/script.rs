//! Base58Check and output-script construction.

use crate::error::CoinError;

// Opcodes used by the pay-to-address script constructors.
const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xa9;
const OP_CHECKSIG: u8 = 0xac;

/// Base58Check-encodes a payload (version marker plus body).
pub fn base58check_encode(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Base58Check-decodes a string, returning the payload without its
/// checksum.
pub fn base58check_decode(s: &str) -> Result<Vec<u8>, CoinError> {
    bs58::decode(s)
        .with_check(None)
        .into_vec()
        .map_err(|e| CoinError::InvalidAddress(format!("{s}: {e}")))
}

/// Base58Check address wrapping a version marker and hash160.
pub fn encode_address(verbytes: &[u8], hash160: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(verbytes.len() + hash160.len());
    payload.extend_from_slice(verbytes);
    payload.extend_from_slice(hash160);
    base58check_encode(&payload)
}

/// Builds a pay-to-pubkey-hash output script.
pub fn p2pkh_script(hash160: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    script.push(20);
    script.extend_from_slice(hash160);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// Builds a pay-to-script-hash output script.
pub fn p2sh_script(hash160: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(23);
    script.push(OP_HASH160);
    script.push(20);
    script.extend_from_slice(hash160);
    script.push(OP_EQUAL);
    script
}
