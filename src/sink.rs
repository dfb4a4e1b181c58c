// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use futures::channel::mpsc;

/// Out-of-band notifications pushed up to the supplicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The driver stopped responding: too many sequential command failures,
    /// or an explicit reload request.
    Hanged,
    /// A requested scan was accepted by the driver.
    ScanningStarted,
}

#[derive(Debug)]
pub struct UnboundedSink<T> {
    sink: mpsc::UnboundedSender<T>,
}

impl<T> UnboundedSink<T> {
    pub fn new(sink: mpsc::UnboundedSender<T>) -> Self {
        UnboundedSink { sink }
    }

    pub fn send(&self, msg: T) {
        match self.sink.unbounded_send(msg) {
            Ok(()) => {}
            Err(e) => {
                if e.is_full() {
                    panic!("Did not expect an unbounded channel to be full: {:?}", e);
                }
                // If the other side has disconnected, we can still technically function,
                // so ignore the error.
            }
        }
    }
}

pub type DriverEventSink = UnboundedSink<DriverEvent>;
