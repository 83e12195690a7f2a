// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CIDR range parsing and membership tests for the IP whitelist.
//!
//! A bare address parses as a host-length prefix (/32 for v4, /128 for
//! v6), so whitelist entries can mix single machines and ranges freely.
//! Mixed-family comparisons never match.

use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CidrError {
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
    #[error("invalid prefix length: {0}")]
    InvalidPrefix(String),
    #[error("prefix length {prefix} exceeds {max} for this address family")]
    PrefixTooLong { prefix: u8, max: u8 },
}

/// A parsed CIDR range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// True when `ip` falls inside this range.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(network), IpAddr::V4(ip)) => {
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u32::MAX << (32 - u32::from(self.prefix))
                };
                (u32::from(network) & mask) == (u32::from(ip) & mask)
            }
            (IpAddr::V6(network), IpAddr::V6(ip)) => {
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(self.prefix))
                };
                (u128::from(network) & mask) == (u128::from(ip) & mask)
            }
            _ => false,
        }
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_part, prefix_part) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let network: IpAddr = addr_part
            .parse()
            .map_err(|_| CidrError::InvalidAddress(addr_part.to_string()))?;
        let max = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };

        let prefix = match prefix_part {
            Some(p) => p
                .parse::<u8>()
                .map_err(|_| CidrError::InvalidPrefix(p.to_string()))?,
            None => max,
        };
        if prefix > max {
            return Err(CidrError::PrefixTooLong { prefix, max });
        }

        Ok(Self { network, prefix })
    }
}
