// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::append::{Appendable, BufferTooSmall};

/// A cursor over a caller-provided buffer. Writes are sequential and fail
/// once the remaining capacity is exhausted; the buffer is never grown.
pub struct BufferWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> BufferWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.written
    }
}

impl Appendable for BufferWriter<'_> {
    fn append_byte(&mut self, byte: u8) -> Result<(), BufferTooSmall> {
        if self.remaining() < 1 {
            return Err(BufferTooSmall);
        }
        self.buf[self.written] = byte;
        self.written += 1;
        Ok(())
    }

    fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferTooSmall> {
        if self.remaining() < bytes.len() {
            return Err(BufferTooSmall);
        }
        self.buf[self.written..self.written + bytes.len()].copy_from_slice(bytes);
        self.written += bytes.len();
        Ok(())
    }

    fn can_append(&self, bytes: usize) -> bool {
        self.remaining() >= bytes
    }

    fn bytes_written(&self) -> usize {
        self.written
    }
}
