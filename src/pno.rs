// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Encoder for the preferred-network-offload ("PNOSETUP") payload.
//!
//! The payload carries a TLV preamble, one tag-length-value section per
//! offloaded SSID, and trailing scan-interval/repeat sections whose values
//! are fixed-width hexadecimal ASCII rather than binary.

use {
    crate::{
        append::Appendable,
        buffer_writer::BufferWriter,
        device::IW_ESSID_MAX_SIZE,
        error::Error,
    },
    log::debug,
};

/// Capacity the dispatcher allocates for a PNO setup payload.
pub const PNO_MAX_COMMAND_SIZE: usize = 340;

/// Most SSIDs a single PNO setup can carry.
pub const PNO_AMOUNT: usize = 16;

const HEADER: &[u8] = b"PNOSETUP ";
const TLV_PREFIX: u8 = b'S';
const TLV_VERSION: u8 = b'1';
const TLV_SUBVERSION: u8 = b'2';
const TLV_RESERVED: u8 = b'0';
const TLV_VERSION_SIZE: usize = 4;

const SSID_SECTION: u8 = b'S';
const SSID_HEADER_SIZE: usize = 2;

const SCAN_INTERVAL_SECTION: u8 = b'T';
const SCAN_INTERVAL: u32 = 30;
const SCAN_INTERVAL_LENGTH: usize = 2;

const REPEAT_SECTION: u8 = b'R';
const REPEAT: u32 = 4;
const REPEAT_LENGTH: usize = 1;

const MAX_REPEAT_SECTION: u8 = b'M';
const MAX_REPEAT: u32 = 3;
const MAX_REPEAT_LENGTH: usize = 1;

/// Combined size of every non-SSID section following the header.
const NONSSID_SECTIONS_SIZE: usize = TLV_VERSION_SIZE
    + (SCAN_INTERVAL_LENGTH + 1)
    + (REPEAT_LENGTH + 1)
    + (MAX_REPEAT_LENGTH + 1);

/// Space that must stay available for an SSID section to be added: one
/// maximum-size SSID section, the trailing sections and a terminator.
const SSID_SECTION_RESERVE: usize =
    SSID_HEADER_SIZE + IW_ESSID_MAX_SIZE + NONSSID_SECTIONS_SIZE + 1;

/// A configured network profile, as read from the supplicant's network list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub ssid: Vec<u8>,
    pub disabled: bool,
}

/// Builds the PNO setup payload for `networks` into `buf` and returns its
/// length.
///
/// Disabled profiles and profiles with an over-length SSID are skipped.
/// SSID sections stop at [`PNO_AMOUNT`], or earlier once the buffer could
/// no longer hold one more maximum-size SSID section plus the trailing
/// sections and a terminator.
pub fn write_pno_setup(networks: &[NetworkProfile], buf: &mut [u8]) -> Result<usize, Error> {
    let mut w = BufferWriter::new(buf);
    w.append_bytes(HEADER)?;
    w.append_byte(TLV_PREFIX)?;
    w.append_byte(TLV_VERSION)?;
    w.append_byte(TLV_SUBVERSION)?;
    w.append_byte(TLV_RESERVED)?;

    let mut count = 0;
    for network in networks {
        if count >= PNO_AMOUNT {
            break;
        }
        if w.remaining() <= SSID_SECTION_RESERVE {
            break;
        }
        if network.disabled || network.ssid.len() > IW_ESSID_MAX_SIZE {
            continue;
        }
        debug!("pno scan network: {}", String::from_utf8_lossy(&network.ssid));
        w.append_byte(SSID_SECTION)?;
        w.append_byte(network.ssid.len() as u8)?;
        w.append_bytes(&network.ssid)?;
        count += 1;
    }

    w.append_byte(SCAN_INTERVAL_SECTION)?;
    w.append_bytes(hex_field(SCAN_INTERVAL, SCAN_INTERVAL_LENGTH).as_bytes())?;
    w.append_byte(REPEAT_SECTION)?;
    w.append_bytes(hex_field(REPEAT, REPEAT_LENGTH).as_bytes())?;
    w.append_byte(MAX_REPEAT_SECTION)?;
    w.append_bytes(hex_field(MAX_REPEAT, MAX_REPEAT_LENGTH).as_bytes())?;
    // The terminator counts toward the payload length.
    w.append_byte(0)?;

    Ok(w.bytes_written())
}

fn hex_field(value: u32, width: usize) -> String {
    format!("{:0width$x}", value, width = width)
}
