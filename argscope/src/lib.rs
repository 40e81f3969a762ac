// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

pub mod builder;
pub mod capture;
pub mod config;
pub mod decode;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod filter;
pub mod format_helpers;
pub mod formatting;
pub mod header;
pub mod padding;
pub mod pool;
pub mod reader;
pub mod structs;

#[cfg(test)]
mod tests;

pub use config::{DisplayOptions, ProbeConfig, ProbeKind, ProbePoint};
pub use descriptor::ArgDescriptor;
pub use error::DecodeError;
pub use events::{decode_event, DecodedArg, Event};
