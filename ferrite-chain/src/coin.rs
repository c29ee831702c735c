//! Per-chain capability records and the startup registry.
//!
//! One [`Coin`] record parameterizes every chain-specific decision the
//! codec makes: header layout, transaction variant, address version
//! markers, genesis hash. The registry is a static table built into the
//! binary, consulted once per process at startup and read-only thereafter,
//! so lookups need no synchronisation.

use std::io::Cursor;

use ferrite_common::{CoinSelection, Network};
use rust_decimal::Decimal;

use crate::block::Block;
use crate::encoding::{read_array, skip_bytes};
use crate::error::{CoinError, ParseError};
use crate::hash::{double_sha256, hash_to_hex_str, hashx_from_script, HASHX_LEN};
use crate::header::{DecodedHeader, HeaderLayout, EQUIHASH_BASE_SIZE, STANDARD_HEADER_SIZE};
use crate::script::{base58check_decode, base58check_encode, p2pkh_script, p2sh_script};
use crate::transaction::TxLayout;

/// Historical transaction-count statistics used only for sync-progress
/// estimation: at `count_height` the chain had seen `count` transactions,
/// and `per_block` more are assumed per block beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStats {
    /// Transactions on the chain at the snapshot height.
    pub count: u64,
    /// Height of the snapshot.
    pub count_height: u32,
    /// Estimated transactions per block beyond the snapshot.
    pub per_block: u32,
}

/// Immutable capability record for one chain+network pair.
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    /// Coin name, matched case-insensitively on lookup.
    pub name: &'static str,
    /// Ticker-style short name.
    pub shortname: &'static str,
    /// Network tag.
    pub net: Network,
    /// Depth beyond which a chain reorganisation is assumed impossible.
    pub reorg_limit: u32,
    /// Headers per difficulty-retarget chunk.
    pub chunk_size: u32,
    /// Smallest units per coin unit.
    pub value_per_coin: i64,
    /// Header byte layout.
    pub header: HeaderLayout,
    /// Transaction wire-format variant.
    pub tx_layout: TxLayout,
    /// Version marker prefixing P2PKH address payloads.
    pub p2pkh_verbyte: &'static [u8],
    /// Version markers accepted for P2SH address payloads.
    pub p2sh_verbytes: &'static [&'static [u8]],
    /// Extended public key version bytes.
    pub xpub_verbytes: [u8; 4],
    /// Extended private key version bytes.
    pub xprv_verbytes: [u8; 4],
    /// WIF version byte(s).
    pub wif_byte: &'static [u8],
    /// Hex hash the height-0 header must produce.
    pub genesis_hash: &'static str,
    /// Height at which genesis-era consensus rules activate.
    pub genesis_activation: u32,
    /// Default daemon RPC port.
    pub rpc_port: u16,
    /// Sync-ETA statistics; a coin without them fails name lookup with
    /// [`CoinError::IncompleteCoin`].
    pub tx_stats: Option<TxStats>,
}

const BITCOIN: Coin = Coin {
    name: "Bitcoin",
    shortname: "BTC",
    net: Network::Mainnet,
    reorg_limit: 200,
    chunk_size: 2016,
    value_per_coin: 100_000_000,
    header: HeaderLayout::Static {
        size: STANDARD_HEADER_SIZE,
    },
    tx_layout: TxLayout::Standard,
    p2pkh_verbyte: &[0x00],
    p2sh_verbytes: &[&[0x05]],
    xpub_verbytes: [0x04, 0x88, 0xb2, 0x1e],
    xprv_verbytes: [0x04, 0x88, 0xad, 0xe4],
    wif_byte: &[0x80],
    genesis_hash: "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f",
    genesis_activation: 100_000_000,
    rpc_port: 8332,
    tx_stats: Some(TxStats {
        count: 318_337_769,
        count_height: 524_213,
        per_block: 1400,
    }),
};

const BITCOIN_TESTNET: Coin = Coin {
    name: "Bitcoin",
    shortname: "XTN",
    net: Network::Testnet,
    reorg_limit: 8000,
    p2pkh_verbyte: &[0x6f],
    p2sh_verbytes: &[&[0xc4]],
    xpub_verbytes: [0x04, 0x35, 0x87, 0xcf],
    xprv_verbytes: [0x04, 0x35, 0x83, 0x94],
    wif_byte: &[0xef],
    genesis_hash: "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943",
    rpc_port: 18332,
    tx_stats: Some(TxStats {
        count: 12_242_438,
        count_height: 1_035_428,
        per_block: 21,
    }),
    ..BITCOIN
};

const BITCOIN_REGTEST: Coin = Coin {
    name: "Bitcoin",
    shortname: "XRT",
    net: Network::Regtest,
    genesis_hash: "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
    rpc_port: 18443,
    // Sync ETAs are meaningless on a local chain.
    tx_stats: None,
    ..BITCOIN_TESTNET
};

const DASH: Coin = Coin {
    name: "Dash",
    shortname: "DASH",
    net: Network::Mainnet,
    reorg_limit: 200,
    chunk_size: 2016,
    value_per_coin: 100_000_000,
    header: HeaderLayout::Static {
        size: STANDARD_HEADER_SIZE,
    },
    tx_layout: TxLayout::DashSpecial,
    p2pkh_verbyte: &[0x4c],
    p2sh_verbytes: &[&[0x10]],
    xpub_verbytes: [0x02, 0xfe, 0x52, 0xf8],
    xprv_verbytes: [0x02, 0xfe, 0x52, 0xcc],
    wif_byte: &[0xcc],
    genesis_hash: "00000ffd590b1485b3caadc19b22e6379c733355108f107a430458cdf3407ab6",
    genesis_activation: 100_000_000,
    rpc_port: 9998,
    tx_stats: Some(TxStats {
        count: 2_157_510,
        count_height: 775_890,
        per_block: 4,
    }),
};

const DASH_TESTNET: Coin = Coin {
    shortname: "tDASH",
    net: Network::Testnet,
    p2pkh_verbyte: &[0x8c],
    p2sh_verbytes: &[&[0x13]],
    // Same extended-key bytes as Bitcoin testnet; registration order makes
    // Bitcoin testnet shadow this entry in lookup_xverbytes.
    xpub_verbytes: [0x04, 0x35, 0x87, 0xcf],
    xprv_verbytes: [0x04, 0x35, 0x83, 0x94],
    wif_byte: &[0xef],
    genesis_hash: "00000bafbc94add76cb75e2ec92894837288a481e5c005f6563d91623bf8bc2c",
    rpc_port: 19998,
    tx_stats: Some(TxStats {
        count: 132_681,
        count_height: 101_619,
        per_block: 1,
    }),
    ..DASH
};

const ZCASH: Coin = Coin {
    name: "Zcash",
    shortname: "ZEC",
    net: Network::Mainnet,
    reorg_limit: 200,
    chunk_size: 2016,
    value_per_coin: 100_000_000,
    header: HeaderLayout::Equihash {
        base_size: EQUIHASH_BASE_SIZE,
    },
    tx_layout: TxLayout::Standard,
    p2pkh_verbyte: &[0x1c, 0xb8],
    p2sh_verbytes: &[&[0x1c, 0xbd]],
    xpub_verbytes: [0x04, 0x88, 0xb2, 0x1e],
    xprv_verbytes: [0x04, 0x88, 0xad, 0xe4],
    wif_byte: &[0x80],
    genesis_hash: "00040fe8ec8471911baa1db1266ea15dd06b4a8a5c453883c000b031973dce08",
    genesis_activation: 100_000_000,
    rpc_port: 8232,
    tx_stats: Some(TxStats {
        count: 329_196,
        count_height: 68_379,
        per_block: 5,
    }),
};

const BITCOINZ: Coin = Coin {
    name: "BitcoinZ",
    shortname: "BTCZ",
    net: Network::Mainnet,
    reorg_limit: 800,
    header: HeaderLayout::EquihashFixed {
        total_size: 243,
        header_size: EQUIHASH_BASE_SIZE,
    },
    genesis_hash: "f499ee3d498b4298ac6a64205b8addb7c43197e2a660229be65db8a4534d75c1",
    rpc_port: 1979,
    tx_stats: Some(TxStats {
        count: 171_976,
        count_height: 81_323,
        per_block: 3,
    }),
    ..ZCASH
};

/// Registered chains, in explicit registration order.
///
/// Order is load-bearing for [`lookup_xverbytes`]: an earlier entry's
/// version bytes shadow any later entry carrying the same bytes, so
/// Bitcoin testnet resolves ahead of Dash testnet.
pub const COINS: &[Coin] = &[
    BITCOIN,
    BITCOIN_TESTNET,
    BITCOIN_REGTEST,
    DASH,
    DASH_TESTNET,
    ZCASH,
    BITCOINZ,
];

/// Returns the capability record for a name/network pair.
///
/// Both strings are matched case-insensitively. A registered coin without
/// transaction-count statistics is reported as incomplete rather than
/// unknown.
pub fn lookup_coin(name: &str, net: &str) -> Result<&'static Coin, CoinError> {
    for coin in COINS {
        if coin.name.eq_ignore_ascii_case(name) && coin.net.as_str().eq_ignore_ascii_case(net) {
            if coin.tx_stats.is_none() {
                return Err(CoinError::IncompleteCoin {
                    name: name.to_string(),
                    net: net.to_string(),
                });
            }
            return Ok(coin);
        }
    }
    Err(CoinError::UnknownCoin {
        name: name.to_string(),
        net: net.to_string(),
    })
}

/// Looks up the coin named by a startup selection.
pub fn lookup_selection(selection: &CoinSelection) -> Result<&'static Coin, CoinError> {
    lookup_coin(&selection.coin, selection.network.as_str())
}

/// Resolves extended-key version bytes to `(is_xpub, coin)`.
///
/// Scans [`COINS`] in registration order; see there for the shadowing rule.
pub fn lookup_xverbytes(verbytes: &[u8; 4]) -> Result<(bool, &'static Coin), CoinError> {
    for coin in COINS {
        if *verbytes == coin.xpub_verbytes {
            return Ok((true, coin));
        }
        if *verbytes == coin.xprv_verbytes {
            return Ok((false, coin));
        }
    }
    Err(CoinError::UnknownVersionBytes)
}

impl Coin {
    /// Header hash: double SHA-256, uniform across layouts.
    pub fn header_hash(&self, header: &[u8]) -> [u8; 32] {
        double_sha256(header)
    }

    /// Previous-block hash, read at the layout-invariant offset 4..36.
    pub fn header_prevhash(&self, header: &[u8]) -> Result<[u8; 32], ParseError> {
        let mut cursor = Cursor::new(header);
        skip_bytes(&mut cursor, 4, "header version")?;
        read_array(&mut cursor, "header prev_hash")
    }

    /// Byte offset of header `height` in a flat headers store.
    pub fn static_header_offset(&self, height: u64) -> u64 {
        self.header.static_header_offset(height)
    }

    /// Byte length of header `height`.
    pub fn static_header_len(&self, height: u64) -> u64 {
        self.static_header_offset(height + 1) - self.static_header_offset(height)
    }

    /// Decodes the header region of a raw block.
    pub fn block_header(&self, raw: &[u8], height: u64) -> Result<DecodedHeader, ParseError> {
        let decoded = self.header.decode(raw)?;
        if self.header.is_static() {
            debug_assert_eq!(decoded.consumed as u64, self.static_header_len(height));
        }
        Ok(decoded)
    }

    /// Assembles a structured [`Block`] from a raw block and its height.
    pub fn block(&self, raw: &[u8], height: u64) -> Result<Block, ParseError> {
        let header = self.block_header(raw, height)?;
        let transactions = self.tx_layout.read_tx_block(raw, header.consumed)?;
        Ok(Block {
            raw: raw.to_vec(),
            header: header.bytes,
            transactions,
        })
    }

    /// Checks that the height-0 block is the right one for this coin.
    ///
    /// Returns the block less its unspendable coinbase: the header bytes
    /// with a single zero byte appended, the sentinel marking the removal
    /// for downstream code.
    pub fn genesis_block(&self, raw: &[u8]) -> Result<Vec<u8>, CoinError> {
        let decoded = self.block_header(raw, 0)?;
        let computed = hash_to_hex_str(&self.header_hash(&decoded.bytes));
        if !computed.eq_ignore_ascii_case(self.genesis_hash) {
            return Err(CoinError::GenesisMismatch {
                computed,
                expected: self.genesis_hash.to_string(),
            });
        }
        let mut block = decoded.bytes;
        block.push(0);
        Ok(block)
    }

    /// Decodes an address into its version marker and hash160.
    pub fn decode_address(&self, address: &str) -> Result<(Vec<u8>, [u8; 20]), CoinError> {
        let raw = base58check_decode(address)?;
        // Require version byte(s) plus hash160.
        if raw.len() <= 20 {
            return Err(CoinError::InvalidAddress(address.to_string()));
        }
        let (verbytes, hash) = raw.split_at(raw.len() - 20);
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(hash);

        if verbytes == self.p2pkh_verbyte || self.p2sh_verbytes.contains(&verbytes) {
            Ok((verbytes.to_vec(), hash160))
        } else {
            Err(CoinError::InvalidAddress(address.to_string()))
        }
    }

    /// Output script paying to a Base58Check address, P2PKH or P2SH
    /// depending on which configured version marker matches.
    pub fn pay_to_address_script(&self, address: &str) -> Result<Vec<u8>, CoinError> {
        let (verbytes, hash160) = self.decode_address(address)?;
        if verbytes == self.p2pkh_verbyte {
            Ok(p2pkh_script(&hash160))
        } else {
            Ok(p2sh_script(&hash160))
        }
    }

    /// Index key for a script.
    pub fn hashx_from_script(&self, script: &[u8]) -> [u8; HASHX_LEN] {
        hashx_from_script(script)
    }

    /// Index key for an address.
    pub fn address_to_hashx(&self, address: &str) -> Result<[u8; HASHX_LEN], CoinError> {
        Ok(hashx_from_script(&self.pay_to_address_script(address)?))
    }

    /// Index key for a P2PKH output paying `hash160`.
    pub fn hash160_to_p2pkh_hashx(&self, hash160: &[u8; 20]) -> [u8; HASHX_LEN] {
        hashx_from_script(&p2pkh_script(hash160))
    }

    /// Private key encoded in Wallet Import Format.
    pub fn privkey_wif(&self, privkey: &[u8], compressed: bool) -> String {
        let mut payload = Vec::with_capacity(self.wif_byte.len() + privkey.len() + 1);
        payload.extend_from_slice(self.wif_byte);
        payload.extend_from_slice(privkey);
        if compressed {
            payload.push(0x01);
        }
        base58check_encode(&payload)
    }

    /// Number of coin units for a quantity of smallest units.
    ///
    /// For example 1 BTC is returned for 100 million satoshis.
    pub fn decimal_value(&self, value: i64) -> Decimal {
        Decimal::from(value) / Decimal::from(self.value_per_coin)
    }
}
