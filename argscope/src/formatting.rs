// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::pin::Pin;

use anyhow::Result;
use clap::ValueEnum;
use tokio::io::{AsyncWrite, AsyncWriteExt as _};

use crate::{
    events::{Event, SyscallEvent, UprobeEvent},
    header::{EventKind, HeaderExt as _},
};

/// Push formatted argument to the formatter
#[macro_export]
macro_rules! argf {
    ($ef:expr, $($arg:tt)*) => {
        $ef.push_arg(format!($($arg)*).as_bytes()).await?
    };
}

/// Push argument to the formatter
#[macro_export]
macro_rules! arg {
    ($ef:expr, $arg:expr) => {
        $ef.push_arg($arg.as_bytes()).await?
    };
}

/// Finish formatting with an optional return value
#[macro_export]
macro_rules! finish {
    ($ef:expr, $retval:expr) => {
        $ef.finish($retval, None).await?
    };
    ($ef:expr, $retval:expr, $extra:expr) => {
        $ef.finish($retval, Some($extra)).await?
    };
}

#[macro_export]
macro_rules! with_array {
    ($ef:expr, $($body:tt)*) => {
        $ef.push_depth(b"[").await?;
        $($body)*
        $ef.pop_depth(b"]").await?;
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormattingStyle {
    #[default]
    OneLine,
    MultiLine,
}

pub struct Formatter<'f> {
    style: FormattingStyle,
    output: Pin<&'f mut dyn AsyncWrite>,
}

impl<'f> Formatter<'f> {
    pub fn new(output: Pin<&'f mut dyn AsyncWrite>, style: FormattingStyle) -> Self {
        Formatter { style, output }
    }

    /// Starts an event line: `<pid>_<tid> <comm> <name>(`.
    pub async fn push_event(mut self, event: &Event) -> Result<EventFormatter<'f>> {
        let header = event.header();
        let output = &mut self.output;

        output.write_all(header.uuid().as_bytes()).await?;
        output.write_all(b" ").await?;
        output.write_all(header.comm_str().as_bytes()).await?;

        match self.style {
            FormattingStyle::OneLine => output.write_all(b" ").await?,
            FormattingStyle::MultiLine => output.write_all(b"\n\t").await?,
        };

        output.write_all(event.name().as_bytes()).await?;
        output.write_all(b"(").await?;

        Ok(EventFormatter {
            formatter: self,
            args: vec![0],
        })
    }
}

pub struct EventFormatter<'f> {
    formatter: Formatter<'f>,
    args: Vec<usize>,
}

const INDENT_STEP: &[u8] = &[b' '; 4];
impl<'f> EventFormatter<'f> {
    fn argc(&self) -> usize {
        self.args.last().copied().unwrap_or(0)
    }

    fn inc_argc(&mut self) {
        if let Some(argc) = self.args.last_mut() {
            *argc += 1;
        }
    }

    pub fn get_depth(&self) -> usize {
        self.args.len()
    }

    pub async fn push_depth(&mut self, bracket: &[u8]) -> Result<()> {
        self.formatter.output.write_all(bracket).await?;
        self.args.push(0);
        Ok(())
    }

    pub async fn pop_depth(&mut self, bracket: &[u8]) -> Result<()> {
        if self.get_depth() > 1 {
            self.args.pop();
        }

        let depth = self.get_depth();
        let output = &mut self.formatter.output;
        if let FormattingStyle::MultiLine = self.formatter.style {
            output.write_all(b"\n\t").await?;
            for _ in 0..depth {
                output.write_all(INDENT_STEP).await?;
            }
        }

        output.write_all(bracket).await?;

        Ok(())
    }

    pub async fn push_arg(&mut self, arg: &[u8]) -> Result<()> {
        let argc = self.argc();
        let depth = self.get_depth();

        let output = &mut self.formatter.output;

        // Always add a comma after a previous argument, if any.
        if argc > 0 {
            output.write_all(b",").await?;
        }
        match self.formatter.style {
            FormattingStyle::OneLine => {
                if argc > 0 {
                    output.write_all(b" ").await?;
                }
                output.write_all(arg).await?;
            }
            FormattingStyle::MultiLine => {
                output.write_all(b"\n\t").await?;
                for _ in 0..depth {
                    output.write_all(INDENT_STEP).await?;
                }
                output.write_all(arg).await?;
            }
        }

        self.inc_argc();

        Ok(())
    }

    /// Writes `name=` as a new argument; a nested array follows.
    pub async fn push_arg_name(&mut self, name: &str) -> Result<()> {
        self.push_arg(format!("{name}=").as_bytes()).await
    }

    /// Closes the argument list, ` = <ret>` when there is a return value.
    pub async fn finish(
        mut self,
        return_value: Option<i64>,
        suffix: Option<&[u8]>,
    ) -> Result<Formatter<'f>> {
        let output = &mut self.formatter.output;

        if let FormattingStyle::MultiLine = self.formatter.style {
            output.write_all(b"\n\t").await?;
        }

        output.write_all(b")").await?;
        if let Some(ret) = return_value {
            output.write_all(b" = ").await?;
            output.write_all(ret.to_string().as_bytes()).await?;
        }

        if let Some(suffix) = suffix {
            output.write_all(suffix).await?;
        }

        output.write_all(b"\n").await?;

        Ok(self.formatter)
    }
}

async fn push_args(ef: &mut EventFormatter<'_>, event: &Event) -> Result<()> {
    for arg in event.args() {
        match arg.values.as_slice() {
            [value] => argf!(ef, "{}={}", arg.name, value),
            values => {
                ef.push_arg_name(&arg.name).await?;
                with_array!(ef, {
                    for value in values {
                        arg!(ef, value);
                    }
                });
            }
        }
    }
    Ok(())
}

/// Writes one decoded event.
pub async fn write_event<'f>(formatter: Formatter<'f>, event: &Event) -> Result<Formatter<'f>> {
    let mut ef = formatter.push_event(event).await?;
    push_args(&mut ef, event).await?;

    let formatter = match event {
        Event::Syscall(SyscallEvent {
            kind: EventKind::SyscallExit,
            prelude,
            ..
        }) => finish!(ef, prelude.ret),
        Event::Syscall(_) => finish!(ef, None),
        Event::Uprobe(UprobeEvent { prelude, .. }) => {
            let regs = format!(
                " LR:0x{:x} PC:0x{:x} SP:0x{:x}",
                prelude.lr, prelude.pc, prelude.sp
            );
            finish!(ef, None, regs.as_bytes())
        }
    };

    Ok(formatter)
}
