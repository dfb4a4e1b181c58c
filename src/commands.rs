// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Grammar of the driver command strings handed down by the supplicant's
//! control interface. Commands are ASCII and case-insensitive; numeric
//! arguments parse permissively, with unreadable text reading as 0.

use crate::cscan::CscanArgs;

/// Maximum length of a driver command string, including its terminator.
pub const MAX_DRV_CMD_SIZE: usize = 248;

/// Vendor query string an `RSSI-APPROX` command is rewritten to.
pub const RSSI_CMD: &str = "RSSI";
pub const LINKSPEED_CMD: &str = "LINKSPEED";

const NUMBER_SCAN_CHANNELS_ETSI: u32 = 13;
const NUMBER_SCAN_CHANNELS_MKK1: u32 = 14;

/// A driver command, parsed from its wire string.
///
/// Commands the dispatcher treats uniformly keep their original text in
/// [`DriverCmd::Passthrough`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCmd<'a> {
    Start,
    Stop,
    Reload,
    RssiApprox,
    ScanChannels(u32),
    BgscanStart,
    BgscanStop,
    Cscan(CscanArgs),
    Passthrough(&'a str),
}

impl<'a> DriverCmd<'a> {
    pub fn parse(cmd: &'a str) -> Self {
        if cmd.eq_ignore_ascii_case("START") {
            DriverCmd::Start
        } else if cmd.eq_ignore_ascii_case("STOP") {
            DriverCmd::Stop
        } else if cmd.eq_ignore_ascii_case("RELOAD") {
            DriverCmd::Reload
        } else if cmd.eq_ignore_ascii_case("RSSI-APPROX") {
            DriverCmd::RssiApprox
        } else if cmd.eq_ignore_ascii_case("BGSCAN-START") {
            DriverCmd::BgscanStart
        } else if cmd.eq_ignore_ascii_case("BGSCAN-STOP") {
            DriverCmd::BgscanStop
        } else if has_prefix(cmd, "SCAN-CHANNELS") {
            DriverCmd::ScanChannels(ascii_int(&cmd["SCAN-CHANNELS".len()..]))
        } else if has_prefix(cmd, "CSCAN") {
            DriverCmd::Cscan(CscanArgs::from_command(cmd))
        } else {
            DriverCmd::Passthrough(cmd)
        }
    }
}

fn has_prefix(cmd: &str, prefix: &str) -> bool {
    cmd.get(..prefix.len()).map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// atoi-style integer parse: leading whitespace is skipped, digits are
/// consumed until the first non-digit, and anything unreadable is 0.
pub(crate) fn ascii_int(text: &str) -> u32 {
    let text = text.trim_start();
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Country code matching a regulatory domain's scan-channel count.
/// Unrecognized counts map to the FCC domain.
pub(crate) fn country_code(channels: u32) -> &'static str {
    match channels {
        NUMBER_SCAN_CHANNELS_ETSI => "EU",
        NUMBER_SCAN_CHANNELS_MKK1 => "JP",
        _ => "US",
    }
}
