// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! This crate implements the supplicant-side driver command extension for
//! vendor WiFi drivers reached over the legacy Linux Wireless Extensions
//! (WEXT) ioctl interface. It translates control-interface command strings
//! such as `START`, `CSCAN` and `BGSCAN-START` into vendor-private ioctl
//! payloads, builds the binary combo-scan and preferred-network-offload
//! buffers those commands carry, and tracks the little driver-side state
//! the protocol needs: a started flag, a background-scan flag and a
//! sequential-error counter that reports a hung driver. See [`driver`] for
//! the dispatcher and [`cscan`]/[`pno`] for the payload encoders.

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod append;
pub mod buffer_writer;
pub mod commands;
pub mod cscan;
pub mod device;
pub mod driver;
pub mod error;
pub mod pno;
pub mod sink;
pub mod timer;

pub use crate::{
    driver::{DriverConfig, SessionView, SupplicantState, WextDriver},
    error::Error,
};
