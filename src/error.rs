// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::append::BufferTooSmall;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A command other than START was issued before the driver was started.
    #[error("driver not started")]
    NotStarted,
    /// The destination buffer cannot hold the required sections.
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("SSID too long ({0} bytes)")]
    SsidTooLong(usize),
    /// Transport-level failure reported by the kernel driver.
    #[error("ioctl {op} failed: {source}")]
    Ioctl {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl From<BufferTooSmall> for Error {
    fn from(_: BufferTooSmall) -> Self {
        Error::BufferTooSmall
    }
}
