// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argscope_common::PaddingFooter;
use log::trace;

use crate::{error::Result, reader::SampleReader};

/// Consumes the footer that trails a variable-length payload, then the pad
/// bytes that realign the stream to 4 bytes. The footer is always present,
/// even when no pad follows.
pub fn resolve_padding(reader: &mut SampleReader<'_>) -> Result<PaddingFooter> {
    let index = reader.u8("padding footer index")?;
    let part_raw_size = reader.u32("padding footer size")?;

    let pad = PaddingFooter::pad_len(part_raw_size) as usize;
    trace!("part_raw_size: {part_raw_size} padding: {pad}");
    if pad != 0 {
        reader.skip(pad, "alignment padding")?;
    }

    Ok(PaddingFooter {
        index,
        part_raw_size,
    })
}

#[cfg(test)]
mod test {
    use argscope_common::PADDING_FOOTER_SIZE;

    use super::*;
    use crate::error::DecodeError;

    fn footer(index: u8, part_raw_size: u32, pad: usize) -> Vec<u8> {
        let mut data = vec![index];
        data.extend_from_slice(&part_raw_size.to_le_bytes());
        data.extend(std::iter::repeat_n(0u8, pad));
        data
    }

    #[test]
    fn pad_length_formula() {
        // (4 - (s + 5) % 4) % 4
        assert_eq!(PaddingFooter::pad_len(0), 3);
        assert_eq!(PaddingFooter::pad_len(1), 2);
        assert_eq!(PaddingFooter::pad_len(2), 1);
        assert_eq!(PaddingFooter::pad_len(3), 0);
        assert_eq!(PaddingFooter::pad_len(4), 3);
        assert_eq!(PaddingFooter::pad_len(u32::MAX), 0);
    }

    #[test]
    fn segment_plus_footer_plus_pad_is_aligned() {
        for size in 0u32..64 {
            let pad = PaddingFooter::pad_len(size) as usize;
            assert!(pad < 4);
            assert_eq!((size as usize + PADDING_FOOTER_SIZE + pad) % 4, 0, "size {size}");
        }
    }

    #[test]
    fn consumes_footer_and_pad() {
        let mut data = footer(2, 4, 3);
        data.push(0x55);
        let mut reader = SampleReader::new(&data);

        let f = resolve_padding(&mut reader).unwrap();
        assert_eq!({ f.index }, 2);
        assert_eq!({ f.part_raw_size }, 4);
        assert_eq!(reader.consumed(), PADDING_FOOTER_SIZE + 3);
        assert_eq!(reader.rest(), &[0x55]);
    }

    #[test]
    fn footer_is_read_even_without_pad() {
        let data = footer(0, 7, 0);
        let mut reader = SampleReader::new(&data);

        resolve_padding(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_pad_is_fatal() {
        let data = footer(0, 4, 2);
        let mut reader = SampleReader::new(&data);

        assert!(matches!(
            resolve_padding(&mut reader),
            Err(DecodeError::Truncated {
                what: "alignment padding",
                ..
            })
        ));
    }

    #[test]
    fn short_footer_is_fatal() {
        let data = [0u8, 4, 0];
        let mut reader = SampleReader::new(&data);

        assert!(resolve_padding(&mut reader).is_err());
    }
}
