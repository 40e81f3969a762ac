// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::{EventHeader, REGISTER_SIZE};
use log::{debug, log_enabled, trace, Level};

use crate::{
    config::{ProbeConfig, ProbeKind, ProbePoint},
    decode::{decode_arg, decode_scalar},
    error::{DecodeError, Result},
    format_helpers::hex_dump,
    header::{decode_header, EventKind, HeaderExt as _},
    reader::SampleReader,
};

/// Registers captured at a syscall boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallPrelude {
    pub nr: u32,
    pub lr: u64,
    pub pc: u64,
    pub sp: u64,
    /// Only present on exit.
    pub ret: Option<i64>,
}

/// Registers captured when a uprobe fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UprobePrelude {
    pub probe_index: u32,
    pub lr: u64,
    pub pc: u64,
    pub sp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArg {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallEvent {
    pub header: EventHeader,
    pub kind: EventKind,
    pub prelude: SyscallPrelude,
    pub name: String,
    pub args: Vec<DecodedArg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UprobeEvent {
    pub header: EventHeader,
    pub prelude: UprobePrelude,
    pub name: String,
    pub args: Vec<DecodedArg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Syscall(SyscallEvent),
    Uprobe(UprobeEvent),
}

impl Event {
    pub fn header(&self) -> &EventHeader {
        match self {
            Event::Syscall(e) => &e.header,
            Event::Uprobe(e) => &e.header,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Syscall(e) => e.kind,
            Event::Uprobe(_) => EventKind::UprobeEnter,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Event::Syscall(e) => &e.name,
            Event::Uprobe(e) => &e.name,
        }
    }

    pub fn args(&self) -> &[DecodedArg] {
        match self {
            Event::Syscall(e) => &e.args,
            Event::Uprobe(e) => &e.args,
        }
    }
}

fn decode_syscall_prelude(reader: &mut SampleReader<'_>, exit: bool) -> Result<SyscallPrelude> {
    Ok(SyscallPrelude {
        nr: reader.u32("syscall nr")?,
        lr: reader.u64("syscall lr")?,
        pc: reader.u64("syscall pc")?,
        sp: reader.u64("syscall sp")?,
        ret: if exit {
            Some(reader.i64("syscall ret")?)
        } else {
            None
        },
    })
}

fn decode_uprobe_prelude(reader: &mut SampleReader<'_>) -> Result<UprobePrelude> {
    Ok(UprobePrelude {
        probe_index: reader.u32("uprobe index")?,
        lr: reader.u64("uprobe lr")?,
        pc: reader.u64("uprobe pc")?,
        sp: reader.u64("uprobe sp")?,
    })
}

fn lookup(config: &ProbeConfig, kind: ProbeKind, id: u32) -> Result<&ProbePoint> {
    config
        .point(kind, id)
        .ok_or(DecodeError::UnknownProbePoint {
            kind: match kind {
                ProbeKind::Syscall => "syscall",
                ProbeKind::Uprobe => "uprobe",
            },
            id,
        })
}

/// Runs the argument loop. `argnum` decides how many arguments are read;
/// the probe point must describe at least that many.
fn decode_args(
    reader: &mut SampleReader<'_>,
    header: &EventHeader,
    point: &ProbePoint,
    config: &ProbeConfig,
) -> Result<Vec<DecodedArg>> {
    let argnum = header.argnum as usize;
    if point.args.len() < argnum {
        return Err(DecodeError::MissingDescriptor {
            point: point.name.clone(),
            declared: header.argnum,
            described: point.args.len(),
        });
    }

    let mut args = Vec::with_capacity(argnum);
    for (index, desc) in point.args.iter().take(argnum).enumerate() {
        let mut values = Vec::with_capacity(1);
        if desc.is_scalar() {
            decode_scalar(reader, &mut values)?;
        } else {
            decode_arg(reader, index, desc, &config.display, &mut values)?;
        }
        trace!("{} arg {index} {}: {values:?}", point.name, desc.name);
        args.push(DecodedArg {
            name: desc.name.clone(),
            values,
        });
    }

    Ok(args)
}

/// The producer may pad the raw sample with a few zero bytes; anything else
/// after the last argument means the descriptors do not match the capture.
fn check_trailing(reader: &SampleReader<'_>) -> Result<()> {
    let rest = reader.rest();
    if rest.is_empty() || (rest.len() < REGISTER_SIZE && rest.iter().all(|&b| b == 0)) {
        return Ok(());
    }
    Err(DecodeError::TrailingBytes {
        remaining: rest.len(),
    })
}

fn decode_event_inner(sample: &[u8], config: &ProbeConfig) -> Result<Event> {
    let mut reader = SampleReader::new(sample);
    let header = decode_header(&mut reader)?;

    let kind = header
        .kind()
        .ok_or(DecodeError::UnknownEventKind(header.eventid))?;

    let event = match kind {
        EventKind::SyscallEnter | EventKind::SyscallExit => {
            let prelude = decode_syscall_prelude(&mut reader, kind == EventKind::SyscallExit)?;
            let point = lookup(config, ProbeKind::Syscall, prelude.nr)?;
            let args = decode_args(&mut reader, &header, point, config)?;
            Event::Syscall(SyscallEvent {
                header,
                kind,
                prelude,
                name: point.name.clone(),
                args,
            })
        }
        EventKind::UprobeEnter => {
            let prelude = decode_uprobe_prelude(&mut reader)?;
            let point = lookup(config, ProbeKind::Uprobe, prelude.probe_index)?;
            let args = decode_args(&mut reader, &header, point, config)?;
            Event::Uprobe(UprobeEvent {
                header,
                prelude,
                name: point.name.clone(),
                args,
            })
        }
    };

    check_trailing(&reader)?;
    Ok(event)
}

/// Decodes one raw sample into an event. Every error is local to this
/// sample; the raw bytes are dumped at debug level to help diagnose it.
pub fn decode_event(sample: &[u8], config: &ProbeConfig) -> Result<Event> {
    decode_event_inner(sample, config).inspect_err(|e| {
        if log_enabled!(Level::Debug) {
            debug!(
                "failed to decode {} byte sample: {e}\n{}",
                sample.len(),
                hex_dump(sample, config.display.color)
            );
        }
    })
}

#[cfg(test)]
mod test {
    use argscope_common::{AliasType, ArgType};

    use super::*;
    use crate::{builder::event_header, descriptor::ArgDescriptor};

    #[test]
    fn struct_with_scalar_alias_is_a_schema_mismatch() {
        // ProbeConfig::add would refuse this descriptor; the loop must too.
        let point = ProbePoint::new(
            ProbeKind::Syscall,
            1,
            "broken",
            vec![ArgDescriptor {
                name: "s".to_string(),
                arg_type: ArgType::Struct,
                alias: AliasType::None,
                size: 0,
            }],
        );
        let header = event_header(EventKind::SyscallEnter, 1, 1, "x", 1);
        let registers = 7u64.to_le_bytes();
        let mut reader = SampleReader::new(&registers);

        let err = decode_args(&mut reader, &header, &point, &ProbeConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NonStructuralAlias {
                index: 0,
                alias: AliasType::None
            }
        );
        assert!(err.is_schema_mismatch());
        assert_eq!(reader.consumed(), 0);
    }

    #[test]
    fn unfollowed_pointer_is_one_register() {
        let point = ProbePoint::new(
            ProbeKind::Syscall,
            1,
            "mmap",
            vec![ArgDescriptor::pointer("addr", AliasType::None)],
        );
        let header = event_header(EventKind::SyscallEnter, 1, 1, "x", 1);
        let registers = 0x7f00u64.to_le_bytes();
        let mut reader = SampleReader::new(&registers);

        let args = decode_args(&mut reader, &header, &point, &ProbeConfig::default()).unwrap();
        assert_eq!(args[0].values, vec!["0x7f00"]);
        assert_eq!(reader.remaining(), 0);
    }
}
