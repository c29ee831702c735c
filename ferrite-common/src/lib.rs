//! Shared configuration types for Ferrite components.
//!
//! Holds the network tag and the startup chain-selection record consumed by
//! the codec layer. The selection is made externally (by name and network
//! string); the codec only looks it up against its registry.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod network;

pub use config::{CoinSelection, ConfigError};
pub use network::{Network, UnknownNetwork};
