// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::str::FromStr;

use anyhow::{anyhow, bail};
use argscope_common::{AliasType, ArgType};

/// How one traced argument of a probe point is laid out in the sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDescriptor {
    pub name: String,
    pub arg_type: ArgType,
    pub alias: AliasType,
    /// Byte count of an opaque `AliasType::Struct` blob; unused otherwise.
    pub size: u32,
}

impl ArgDescriptor {
    pub fn num(name: &str) -> Self {
        ArgDescriptor {
            name: name.to_string(),
            arg_type: ArgType::Num,
            alias: AliasType::Num,
            size: 0,
        }
    }

    pub fn pointer(name: &str, alias: AliasType) -> Self {
        ArgDescriptor {
            name: name.to_string(),
            arg_type: ArgType::Pointer,
            alias,
            size: 0,
        }
    }

    pub fn structural(name: &str, alias: AliasType) -> Self {
        ArgDescriptor {
            name: name.to_string(),
            arg_type: ArgType::Struct,
            alias,
            size: 0,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Scalars are read as a single register and never reach structural
    /// decoding. A pointer without an alias is shown like a scalar; a struct
    /// never is.
    pub fn is_scalar(&self) -> bool {
        match self.arg_type {
            ArgType::Num => true,
            ArgType::Pointer => self.alias.is_scalar(),
            ArgType::Struct => false,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.arg_type == ArgType::Struct && self.alias.is_scalar() {
            bail!(
                "argument {}: structural argument needs a structural alias type",
                self.name
            );
        }
        if self.arg_type == ArgType::Num && !self.alias.is_scalar() {
            bail!(
                "argument {}: numeric argument cannot carry alias type {:?}",
                self.name,
                self.alias
            );
        }
        if self.alias == AliasType::Struct && self.size == 0 {
            bail!("argument {}: opaque struct needs a size", self.name);
        }
        Ok(())
    }
}

pub fn alias_name(alias: AliasType) -> &'static str {
    match alias {
        AliasType::None => "none",
        AliasType::Num => "int",
        AliasType::Pointer => "ptr",
        AliasType::Struct => "struct",
        AliasType::Buffer => "buf",
        AliasType::String => "str",
        AliasType::StringArray => "str_arr",
        AliasType::Sigset => "sigset",
        AliasType::Pollfd => "pollfd",
        AliasType::Timezone => "timezone",
        AliasType::PthreadAttr => "pthread_attr",
        AliasType::Timeval => "timeval",
        AliasType::Timespec => "timespec",
        AliasType::Stat => "stat",
        AliasType::Statfs => "statfs",
        AliasType::Sigaction => "sigaction",
        AliasType::Utsname => "utsname",
        AliasType::Sockaddr => "sockaddr",
        AliasType::Rusage => "rusage",
        AliasType::Iovec => "iovec",
        AliasType::EpollEvent => "epoll_event",
        AliasType::Sysinfo => "sysinfo",
        AliasType::Siginfo => "siginfo",
        AliasType::Msghdr => "msghdr",
        AliasType::Itimerspec => "itimerspec",
        AliasType::StackT => "stack_t",
    }
}

fn alias_from_name(name: &str) -> Option<AliasType> {
    AliasType::ALL
        .iter()
        .copied()
        .find(|alias| alias_name(*alias) == name)
}

/// Parses `name=type`, where type is `int`, `ptr`, a structural kind
/// (`str`, `stat`, ...), `struct(<size>)`, or one of those prefixed with `*`
/// for a pointer to it.
impl FromStr for ArgDescriptor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, ty) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("argument {s:?} is not of the form name=type"))?;
        let name = name.trim();
        let ty = ty.trim();
        if name.is_empty() {
            bail!("argument {s:?} has no name");
        }

        let (pointer, kind) = match ty.strip_prefix('*') {
            Some(kind) => (true, kind),
            None => (false, ty),
        };

        let (alias, size) = if let Some(size) = kind
            .strip_prefix("struct(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let size = size
                .parse::<u32>()
                .map_err(|e| anyhow!("argument {name}: bad struct size {size:?}: {e}"))?;
            (AliasType::Struct, size)
        } else {
            let alias = match kind {
                "num" => AliasType::Num,
                _ => alias_from_name(kind)
                    .ok_or_else(|| anyhow!("argument {name}: unknown type {kind:?}"))?,
            };
            (alias, 0)
        };

        let desc = match (pointer, alias) {
            (false, AliasType::Num) => ArgDescriptor::num(name),
            // A bare `ptr` is an address shown as-is.
            (false, AliasType::Pointer) => ArgDescriptor::pointer(name, AliasType::None),
            (false, AliasType::None) => bail!("argument {name}: type \"none\" is not usable"),
            (false, alias) => ArgDescriptor::structural(name, alias),
            (true, alias) if alias.is_scalar() => {
                bail!("argument {name}: cannot point to a scalar")
            }
            (true, alias) => ArgDescriptor::pointer(name, alias),
        }
        .with_size(size);

        desc.validate()?;
        Ok(desc)
    }
}
