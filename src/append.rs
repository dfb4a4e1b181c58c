// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub struct BufferTooSmall;

impl fmt::Display for BufferTooSmall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer too small")
    }
}

/// A destination for sequentially appended bytes which either grows with its
/// content or rejects writes past its capacity.
pub trait Appendable {
    fn append_byte(&mut self, byte: u8) -> Result<(), BufferTooSmall>;

    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall>;

    /// Returns true if at least `bytes` more bytes can be appended.
    fn can_append(&self, bytes: usize) -> bool;

    fn bytes_written(&self) -> usize;
}

impl Appendable for Vec<u8> {
    fn append_byte(&mut self, byte: u8) -> Result<(), BufferTooSmall> {
        self.push(byte);
        Ok(())
    }

    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn can_append(&self, _bytes: usize) -> bool {
        true
    }

    fn bytes_written(&self) -> usize {
        self.len()
    }
}
