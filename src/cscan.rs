// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Encoder for the vendor-private combo-scan ("CSCAN") payload.
//!
//! The payload is a fixed header followed by single-tag sections: one channel
//! section per requested dwell repetition, then passive-dwell, home-dwell and
//! scan-type sections. Dwell times are little-endian u16.

use {
    crate::{
        append::Appendable,
        buffer_writer::BufferWriter,
        commands::ascii_int,
        error::Error,
    },
    log::debug,
};

/// Recommended capacity for a combo-scan payload buffer.
pub const CSCAN_BUF_LEN: usize = 360;

const HEADER: &[u8] = b"CSCAN S\x01\x00\x00S\x00";
const CHANNEL_SECTION: u8 = b'C';
const PASV_DWELL_SECTION: u8 = b'P';
const HOME_DWELL_SECTION: u8 = b'H';
const TYPE_SECTION: u8 = b'T';
const TYPE_PASSIVE: u8 = 1;

pub(crate) const PASV_DWELL_TIME_DEF: u16 = 250;
const PASV_DWELL_TIME_MAX: u16 = 3000;
const HOME_DWELL_TIME: u16 = 40;

/// Space a channel repetition must leave available before it is added.
const CHANNEL_REPEAT_RESERVE: usize = 12;

/// Parsed parameters of a `CSCAN <channel>[,TIME=<dwell_ms>]` command.
///
/// Channel 0 requests a scan of all channels. Both numbers parse
/// permissively: non-numeric text reads as 0, and a missing or zero dwell
/// falls back to [`PASV_DWELL_TIME_DEF`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscanArgs {
    pub channel: u8,
    pub dwell: u16,
}

impl CscanArgs {
    pub fn from_command(cmd: &str) -> Self {
        let params = cmd.get("CSCAN".len()..).unwrap_or("");
        let (chan_text, dwell) = match params.find(",TIME=") {
            Some(idx) => {
                let dwell = ascii_int(&params[idx + ",TIME=".len()..]) as u16;
                (&params[..idx], dwell)
            }
            None => (params, 0),
        };
        let dwell = if dwell == 0 { PASV_DWELL_TIME_DEF } else { dwell };
        Self { channel: ascii_int(chan_text) as u8, dwell }
    }
}

/// Builds the combo-scan payload into `buf` and returns its length.
///
/// A dwell time of `n * PASV_DWELL_TIME_DEF` is expressed by repeating the
/// channel section; repetitions that would not leave
/// [`CHANNEL_REPEAT_RESERVE`] bytes available are dropped rather than
/// reported as an error. A scan of all channels (channel 0) carries the
/// dwell time, clamped to `PASV_DWELL_TIME_MAX`, in the passive-dwell
/// section instead.
pub fn write_cscan_request(args: &CscanArgs, buf: &mut [u8]) -> Result<usize, Error> {
    debug!("cscan request: channel {} dwell {}", args.channel, args.dwell);

    let mut w = BufferWriter::new(buf);
    w.append_bytes(HEADER)?;

    w.append_byte(CHANNEL_SECTION)?;
    w.append_byte(args.channel)?;
    let mut dwell = args.dwell;
    if args.channel != 0 {
        let mut repeats = dwell.saturating_sub(1) / PASV_DWELL_TIME_DEF;
        while repeats > 0 {
            if w.remaining() <= CHANNEL_REPEAT_RESERVE {
                break;
            }
            w.append_byte(CHANNEL_SECTION)?;
            w.append_byte(args.channel)?;
            repeats -= 1;
        }
    } else if dwell > PASV_DWELL_TIME_MAX {
        dwell = PASV_DWELL_TIME_MAX;
    }

    let pasv_dwell = if args.channel != 0 { PASV_DWELL_TIME_DEF } else { dwell };
    w.append_byte(PASV_DWELL_SECTION)?;
    w.append_byte(pasv_dwell as u8)?;
    w.append_byte((pasv_dwell >> 8) as u8)?;

    w.append_byte(HOME_DWELL_SECTION)?;
    w.append_byte(HOME_DWELL_TIME as u8)?;
    w.append_byte((HOME_DWELL_TIME >> 8) as u8)?;

    w.append_byte(TYPE_SECTION)?;
    w.append_byte(TYPE_PASSIVE)?;

    Ok(w.bytes_written())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_channel_and_dwell() {
        assert_eq!(
            CscanArgs::from_command("CSCAN 6,TIME=300"),
            CscanArgs { channel: 6, dwell: 300 }
        );
        assert_eq!(CscanArgs::from_command("CSCAN 11"), CscanArgs { channel: 11, dwell: 250 });
        assert_eq!(CscanArgs::from_command("CSCAN0"), CscanArgs { channel: 0, dwell: 250 });
        // Zero or malformed dwell falls back to the default.
        assert_eq!(CscanArgs::from_command("CSCAN 1,TIME=0"), CscanArgs { channel: 1, dwell: 250 });
        assert_eq!(
            CscanArgs::from_command("CSCAN 1,TIME=junk"),
            CscanArgs { channel: 1, dwell: 250 }
        );
        assert_eq!(CscanArgs::from_command("CSCAN"), CscanArgs { channel: 0, dwell: 250 });
    }

    #[test]
    fn single_channel_no_repetition() {
        let mut buf = [0u8; CSCAN_BUF_LEN];
        let args = CscanArgs { channel: 1, dwell: 250 };
        let n = write_cscan_request(&args, &mut buf[..]).expect("failed to write cscan");
        #[rustfmt::skip]
        assert_eq!(
            &buf[..n],
            &[
                b'C', b'S', b'C', b'A', b'N', b' ', b'S', 1, 0, 0, b'S', 0, // header
                b'C', 1, // channel
                b'P', 250, 0, // passive dwell
                b'H', 40, 0, // home dwell
                b'T', 1, // scan type: passive
            ][..]
        );
    }

    #[test]
    fn dwell_expressed_as_channel_repetitions() {
        let mut buf = [0u8; CSCAN_BUF_LEN];
        // (501 - 1) / 250 = 2 extra repetitions.
        let args = CscanArgs { channel: 6, dwell: 501 };
        let n = write_cscan_request(&args, &mut buf[..]).expect("failed to write cscan");
        assert_eq!(&buf[12..18], &[b'C', 6, b'C', 6, b'C', 6]);
        // The passive dwell stays at the default when a channel is given.
        assert_eq!(&buf[18..21], &[b'P', 250, 0]);
        assert_eq!(n, 26);
    }

    #[test]
    fn repetitions_dropped_when_buffer_fills() {
        // Room for the header, the first channel section, the terminal
        // sections and exactly two repetitions.
        let mut buf = [0u8; 30];
        let args = CscanArgs { channel: 6, dwell: 65_535 };
        let n = write_cscan_request(&args, &mut buf[..]).expect("failed to write cscan");
        assert_eq!(&buf[12..18], &[b'C', 6, b'C', 6, b'C', 6]);
        assert_eq!(n, 26);
        assert_eq!(&buf[n - 8..n], &[b'P', 250, 0, b'H', 40, 0, b'T', 1]);
    }

    #[test]
    fn scan_all_channels_clamps_dwell() {
        let mut buf = [0u8; CSCAN_BUF_LEN];
        let args = CscanArgs::from_command("CSCAN0,TIME=5000");
        assert_eq!(args, CscanArgs { channel: 0, dwell: 5000 });
        let n = write_cscan_request(&args, &mut buf[..]).expect("failed to write cscan");
        // A single channel-0 section, no repetition, dwell clamped to 3000.
        assert_eq!(&buf[12..14], &[b'C', 0]);
        assert_eq!(&buf[14..17], &[b'P', 0xb8, 0x0b]);
        assert_eq!(n, 22);
    }

    #[test]
    fn never_overflows_capacity() {
        for channel in 1..=14u8 {
            for &dwell in &[1u16, 40, 250, 251, 999, 3000, 65_535] {
                for capacity in 22..=64usize {
                    let mut buf = vec![0u8; capacity];
                    let args = CscanArgs { channel, dwell };
                    let n = write_cscan_request(&args, &mut buf[..])
                        .expect("failed to write cscan");
                    assert!(n <= capacity, "overflow: {} > {}", n, capacity);
                }
            }
        }
    }

    #[test]
    fn terminal_sections_always_present() {
        for &dwell in &[1u16, 250, 2500, 65_535] {
            for capacity in 22..=64usize {
                let mut buf = vec![0u8; capacity];
                let args = CscanArgs { channel: 9, dwell };
                let n =
                    write_cscan_request(&args, &mut buf[..]).expect("failed to write cscan");
                assert_eq!(&buf[n - 8..n], &[b'P', 250, 0, b'H', 40, 0, b'T', 1]);
            }
        }
    }

    #[test]
    fn fails_when_header_does_not_fit() {
        let mut buf = [0u8; 10];
        let args = CscanArgs { channel: 1, dwell: 250 };
        assert_variant!(write_cscan_request(&args, &mut buf[..]), Err(Error::BufferTooSmall));
    }
}
