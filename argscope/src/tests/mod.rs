// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

mod pool;
mod structs;

use crate::{
    builder::{event_header, SampleBuilder},
    config::{DisplayOptions, ProbeConfig, ProbePoint},
    header::EventKind,
};

pub(crate) fn config_with(points: &[&str]) -> ProbeConfig {
    config_with_display(points, DisplayOptions::default())
}

pub(crate) fn config_with_display(points: &[&str], display: DisplayOptions) -> ProbeConfig {
    let mut config = ProbeConfig::new(display);
    for point in points {
        config.add(point.parse::<ProbePoint>().unwrap()).unwrap();
    }
    config
}

/// A syscall entry sample for `pid`/`tid` 100 named "test", up to the
/// first argument.
pub(crate) fn syscall_enter(nr: u32, argnum: u8) -> SampleBuilder {
    SampleBuilder::new()
        .header(&event_header(EventKind::SyscallEnter, 100, 100, "test", argnum))
        .syscall_prelude(nr, 0x7f00_0000_1000, 0x7f00_0000_2000, 0x7fff_ffff_0000)
}

/// Decodes a sample against the given probe points and checks its one-line
/// rendering.
#[macro_export]
macro_rules! event_test {
    ($name:ident, $points:expr, display = $display:expr, $init:block, $expected:expr) => {
        #[::tokio::test]
        async fn $name() {
            let config = $crate::tests::config_with_display(&$points, $display);
            let sample: ::bytes::Bytes = $init;

            let event = $crate::events::decode_event(&sample, &config).unwrap();

            let mut output: Vec<u8> = vec![];
            let pin_output = std::pin::Pin::new(&mut output);
            let formatter = $crate::formatting::Formatter::new(
                pin_output,
                $crate::formatting::FormattingStyle::OneLine,
            );

            $crate::formatting::write_event(formatter, &event)
                .await
                .unwrap();

            assert_eq!(
                String::from_utf8_lossy(&output).to_string().as_str(),
                $expected
            );
        }
    };
    ($name:ident, $points:expr, $init:block, $expected:expr) => {
        $crate::event_test!(
            $name,
            $points,
            display = $crate::config::DisplayOptions::default(),
            $init,
            $expected
        );
    };
}
