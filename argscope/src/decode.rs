// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::{
    kernel_types::{
        EpollEvent, Itimerspec, Msghdr, Pollfd, PthreadAttr, Rusage, Sigaction, Siginfo, Sigset,
        SockaddrUn, StackT, Stat, Statfs, Sysinfo, Timespec, Timeval, Timezone, Utsname,
    },
    AliasType, ArgType,
};
use log::{debug, trace};

use crate::{
    config::DisplayOptions,
    descriptor::ArgDescriptor,
    error::{DecodeError, Result},
    padding::resolve_padding,
    reader::{RegisterValue, SampleReader},
    structs::{render, render_opaque, IovecPayload, LenBuffer, LenString, StringArray},
};

/// Decodes the value of `desc.alias` sitting at the cursor. Variable-length
/// kinds also consume their padding footer.
pub fn decode_structural(
    reader: &mut SampleReader<'_>,
    index: usize,
    desc: &ArgDescriptor,
    opts: &DisplayOptions,
) -> Result<String> {
    let value = match desc.alias {
        AliasType::None | AliasType::Num => {
            return Err(DecodeError::NonStructuralAlias {
                index,
                alias: desc.alias,
            })
        }
        AliasType::Pointer => render::<RegisterValue>(reader, opts)?,
        AliasType::Struct => render_opaque(reader, desc.size)?,
        AliasType::Buffer => render::<LenBuffer>(reader, opts)?,
        AliasType::String => render::<LenString>(reader, opts)?,
        AliasType::StringArray => render::<StringArray>(reader, opts)?,
        AliasType::Sigset => render::<Sigset>(reader, opts)?,
        AliasType::Pollfd => render::<Pollfd>(reader, opts)?,
        AliasType::Timezone => render::<Timezone>(reader, opts)?,
        AliasType::PthreadAttr => render::<PthreadAttr>(reader, opts)?,
        AliasType::Timeval => render::<Timeval>(reader, opts)?,
        AliasType::Timespec => render::<Timespec>(reader, opts)?,
        AliasType::Stat => render::<Stat>(reader, opts)?,
        AliasType::Statfs => render::<Statfs>(reader, opts)?,
        AliasType::Sigaction => render::<Sigaction>(reader, opts)?,
        AliasType::Utsname => render::<Utsname>(reader, opts)?,
        AliasType::Sockaddr => render::<SockaddrUn>(reader, opts)?,
        AliasType::Rusage => render::<Rusage>(reader, opts)?,
        AliasType::Iovec => render::<IovecPayload>(reader, opts)?,
        AliasType::EpollEvent => render::<EpollEvent>(reader, opts)?,
        AliasType::Sysinfo => render::<Sysinfo>(reader, opts)?,
        AliasType::Siginfo => render::<Siginfo>(reader, opts)?,
        AliasType::Msghdr => render::<Msghdr>(reader, opts)?,
        AliasType::Itimerspec => render::<Itimerspec>(reader, opts)?,
        AliasType::StackT => render::<StackT>(reader, opts)?,
    };

    if desc.alias.is_variable_length() {
        let footer = resolve_padding(reader)?;
        let footer_index = footer.index;
        if footer_index as usize != index {
            debug!(
                "argument {index} ({}): padding footer carries index {footer_index}",
                desc.name
            );
        }
    }

    Ok(value)
}

/// Decodes one pointer or struct argument and appends its display string to
/// `sink`. A pointer is two sequential register reads: the argument itself
/// and the address it holds, which is where the structure lives.
pub fn decode_arg(
    reader: &mut SampleReader<'_>,
    index: usize,
    desc: &ArgDescriptor,
    opts: &DisplayOptions,
    sink: &mut Vec<String>,
) -> Result<()> {
    match desc.arg_type {
        ArgType::Num => Err(DecodeError::ScalarArgument { index }),
        ArgType::Struct => {
            sink.push(decode_structural(reader, index, desc, opts)?);
            Ok(())
        }
        ArgType::Pointer => {
            if desc.alias.is_scalar() {
                return Err(DecodeError::NonStructuralAlias {
                    index,
                    alias: desc.alias,
                });
            }

            let outer = reader.register()?;
            if outer.is_null() {
                trace!("argument {index}: null pointer");
                sink.push("(NULL)".to_string());
                return Ok(());
            }

            let inner = reader.register()?;
            if inner.is_null() {
                sink.push("(0x0)".to_string());
                return Ok(());
            }

            let value = decode_structural(reader, index, desc, opts)?;
            sink.push(format!("(*0x{:x}){value}", inner.address));
            Ok(())
        }
    }
}

/// Scalars, and pointers nobody asked to follow, are a single register.
pub fn decode_scalar(reader: &mut SampleReader<'_>, sink: &mut Vec<String>) -> Result<()> {
    let value = reader.register()?;
    sink.push(format!("0x{:x}", value.address));
    Ok(())
}
