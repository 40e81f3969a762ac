// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::AliasType;
use thiserror::Error;

/// Everything that can go wrong while decoding one sample. Any of these
/// abandons the current event only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("reading {what}: needed {needed} bytes, only {available} left")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("reading {what}: declared length {declared} exceeds the {available} bytes left")]
    MalformedLength {
        what: &'static str,
        declared: u32,
        available: usize,
    },

    #[error("argument {index}: alias type {alias:?} has no structural decoder")]
    NonStructuralAlias { index: usize, alias: AliasType },

    #[error("argument {index}: scalar argument routed to structural decode")]
    ScalarArgument { index: usize },

    #[error("{point}: event declares {declared} arguments, only {described} described")]
    MissingDescriptor {
        point: String,
        declared: u8,
        described: usize,
    },

    #[error("no probe point configured for {kind} {id}")]
    UnknownProbePoint { kind: &'static str, id: u32 },

    #[error("unknown event kind id {0}")]
    UnknownEventKind(u32),

    #[error("{remaining} unexpected bytes after the last argument")]
    TrailingBytes { remaining: usize },
}

impl DecodeError {
    /// The probe descriptors and the decoder disagree; the capture itself may
    /// be fine.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            DecodeError::NonStructuralAlias { .. }
                | DecodeError::ScalarArgument { .. }
                | DecodeError::MissingDescriptor { .. }
                | DecodeError::UnknownProbePoint { .. }
                | DecodeError::UnknownEventKind(_)
        )
    }

    /// The capture is short or corrupt.
    pub fn is_corrupt_stream(&self) -> bool {
        matches!(
            self,
            DecodeError::Truncated { .. }
                | DecodeError::MalformedLength { .. }
                | DecodeError::TrailingBytes { .. }
        )
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;
