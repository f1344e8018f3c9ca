//! Memory-Reference Traces.
//!
//! This module reads and replays traces of system reads and writes. It provides:
//! 1. **Parsing:** One operation per line, with line-numbered errors.
//! 2. **Replay:** Runs each operation against a cache system and records the
//!    value, hit/miss, and resulting coherence state, or the request error.
//!
//! # Format
//!
//! ```text
//! # comment
//! r <cache-id> <address> <width>
//! w <cache-id> <address> <width> <value>
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex. Widths are in bytes. Blank lines
//! and anything after `#` are ignored.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::cache::CoherenceState;
use crate::coherence::CacheSystem;
use crate::common::{AccessError, CacheId, TraceError, Width};

/// A single traced operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TraceOp {
    /// System read.
    Read {
        /// Issuing cache.
        id: CacheId,
        /// Byte address.
        address: u32,
        /// Width in bytes, checked at replay.
        width: u32,
    },
    /// System write of the low `width` bytes of `value`.
    Write {
        /// Issuing cache.
        id: CacheId,
        /// Byte address.
        address: u32,
        /// Width in bytes, checked at replay.
        width: u32,
        /// Value to store.
        value: u64,
    },
}

impl TraceOp {
    /// Issuing cache.
    pub const fn id(&self) -> CacheId {
        match *self {
            Self::Read { id, .. } | Self::Write { id, .. } => id,
        }
    }

    /// Byte address.
    pub const fn address(&self) -> u32 {
        match *self {
            Self::Read { address, .. } | Self::Write { address, .. } => address,
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { id, address, width } => write!(f, "r {id} {address:#010x} {width}"),
            Self::Write {
                id,
                address,
                width,
                value,
            } => write!(f, "w {id} {address:#010x} {width} {value:#x}"),
        }
    }
}

fn parse_num<T: TryFrom<u64>>(token: &str, what: &str) -> Result<T, String> {
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse::<u64>(),
    };
    parsed
        .ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| format!("invalid {what} '{token}'"))
}

fn parse_line(line: &str) -> Result<Option<TraceOp>, String> {
    let body = line.split('#').next().unwrap_or_default();
    let tokens: Vec<&str> = body.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok(None),
        ["r" | "R", id, address, width] => Ok(Some(TraceOp::Read {
            id: CacheId(parse_num(id, "cache id")?),
            address: parse_num(address, "address")?,
            width: parse_num(width, "width")?,
        })),
        ["w" | "W", id, address, width, value] => Ok(Some(TraceOp::Write {
            id: CacheId(parse_num(id, "cache id")?),
            address: parse_num(address, "address")?,
            width: parse_num(width, "width")?,
            value: parse_num(value, "value")?,
        })),
        ["r" | "R", ..] => Err("expected 'r <cache-id> <address> <width>'".to_owned()),
        ["w" | "W", ..] => Err("expected 'w <cache-id> <address> <width> <value>'".to_owned()),
        [op, ..] => Err(format!("unknown operation '{op}'")),
    }
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    let mut ops = Vec::new();
    for (n, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(op)) => ops.push(op),
            Ok(None) => {}
            Err(reason) => return Err(TraceError { line: n + 1, reason }),
        }
    }
    Ok(ops)
}

/// What happened when one operation was replayed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceOutcome {
    /// The operation.
    pub op: TraceOp,
    /// Whether the block was resident in the issuing cache beforehand.
    pub hit: bool,
    /// Value read, for reads that succeeded.
    pub value: Option<u64>,
    /// State of the block in the issuing cache afterwards.
    pub state: Option<CoherenceState>,
    /// Why the request was rejected, if it was.
    pub error: Option<String>,
}

impl TraceOutcome {
    /// Whether the operation completed.
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for TraceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<36}", self.op.to_string())?;
        if let Some(err) = &self.error {
            return write!(f, " error: {err}");
        }
        write!(f, " {}", if self.hit { "hit " } else { "miss" })?;
        if let Some(state) = self.state {
            write!(f, " {}", state.letter())?;
        }
        if let Some(value) = self.value {
            write!(f, " -> {value:#x}")?;
        }
        Ok(())
    }
}

fn apply(system: &mut CacheSystem, op: TraceOp) -> Result<Option<u64>, AccessError> {
    match op {
        TraceOp::Read { id, address, width } => {
            let width = Width::from_bytes(width).ok_or(AccessError::InvalidWidth(width))?;
            system.read_width(address, id, width).map(Some)
        }
        TraceOp::Write {
            id,
            address,
            width,
            value,
        } => {
            let width = Width::from_bytes(width).ok_or(AccessError::InvalidWidth(width))?;
            system.write_width(address, id, width, value).map(|()| None)
        }
    }
}

/// Replays `ops` in order. Rejected requests are recorded and skipped.
pub fn replay(system: &mut CacheSystem, ops: &[TraceOp]) -> Vec<TraceOutcome> {
    ops.iter()
        .map(|&op| {
            let hit = system.is_resident(op.id(), op.address());
            match apply(system, op) {
                Ok(value) => TraceOutcome {
                    op,
                    hit,
                    value,
                    state: system.state(op.id(), op.address()).ok(),
                    error: None,
                },
                Err(err) => {
                    debug!(%op, %err, "rejected");
                    TraceOutcome {
                        op,
                        hit,
                        value: None,
                        state: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect()
}
