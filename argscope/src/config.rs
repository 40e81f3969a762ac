// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{collections::HashMap, fmt, str::FromStr};

use anyhow::{anyhow, bail};

use crate::descriptor::ArgDescriptor;

pub const DEFAULT_PREVIEW_LEN: usize = 64;

/// How buffers are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Full hex dump instead of an escaped preview.
    pub dump_hex: bool,
    /// Highlight hex dumps with ANSI colors.
    pub color: bool,
    pub preview_len: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            dump_hex: false,
            color: false,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Syscall,
    Uprobe,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::Syscall => f.write_str("syscall"),
            ProbeKind::Uprobe => f.write_str("uprobe"),
        }
    }
}

/// A traced syscall or function and the layout of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePoint {
    pub kind: ProbeKind,
    /// Syscall number or uprobe index.
    pub id: u32,
    pub name: String,
    pub args: Vec<ArgDescriptor>,
}

impl ProbePoint {
    pub fn new(kind: ProbeKind, id: u32, name: &str, args: Vec<ArgDescriptor>) -> Self {
        ProbePoint {
            kind,
            id,
            name: name.to_string(),
            args,
        }
    }
}

/// `syscall:<nr>:<name>[:<arg>,<arg>...]` or `uprobe:<index>:<name>[:...]`.
impl FromStr for ProbePoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');

        let kind = match parts.next() {
            Some("syscall") => ProbeKind::Syscall,
            Some("uprobe") => ProbeKind::Uprobe,
            other => bail!("probe point {s:?}: unknown kind {other:?}"),
        };
        let id = parts
            .next()
            .ok_or_else(|| anyhow!("probe point {s:?}: missing id"))?
            .parse::<u32>()
            .map_err(|e| anyhow!("probe point {s:?}: bad id: {e}"))?;
        let name = parts
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("probe point {s:?}: missing name"))?;

        let args = match parts.next() {
            Some(args) if !args.trim().is_empty() => args
                .split(',')
                .map(str::parse)
                .collect::<anyhow::Result<Vec<ArgDescriptor>>>()?,
            _ => vec![],
        };

        Ok(ProbePoint::new(kind, id, name, args))
    }
}

/// Read-only configuration shared by every decode.
#[derive(Debug, Clone, Default)]
pub struct ProbeConfig {
    points: HashMap<(ProbeKind, u32), ProbePoint>,
    pub display: DisplayOptions,
}

impl ProbeConfig {
    pub fn new(display: DisplayOptions) -> Self {
        ProbeConfig {
            points: HashMap::new(),
            display,
        }
    }

    pub fn add(&mut self, point: ProbePoint) -> anyhow::Result<()> {
        for arg in &point.args {
            arg.validate()?;
        }

        let key = (point.kind, point.id);
        if let Some(existing) = self.points.get(&key) {
            bail!(
                "{} {} configured twice ({} and {})",
                point.kind,
                point.id,
                existing.name,
                point.name
            );
        }
        self.points.insert(key, point);
        Ok(())
    }

    pub fn with_point(mut self, point: ProbePoint) -> anyhow::Result<Self> {
        self.add(point)?;
        Ok(self)
    }

    pub fn point(&self, kind: ProbeKind, id: u32) -> Option<&ProbePoint> {
        self.points.get(&(kind, id))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
