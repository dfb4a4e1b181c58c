// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Dispatch of supplicant driver commands to the vendor-private ioctl.
//!
//! [`WextDriver`] owns the driver-side state: the started flag, the
//! background-scan flag and the sequential-error counter. The supplicant
//! session it serves is read-only and passed per call as a [`SessionView`].

use {
    crate::{
        commands::{country_code, DriverCmd, LINKSPEED_CMD, RSSI_CMD},
        cscan,
        device::{DeviceOps, IW_ESSID_MAX_SIZE},
        error::Error,
        pno::{self, NetworkProfile, PNO_MAX_COMMAND_SIZE},
        sink::{DriverEvent, DriverEventSink},
        timer::{EventId, Timer},
    },
    log::{debug, error},
    std::borrow::Cow,
    std::time::Duration,
};

/// Sequential command failures tolerated before the driver is reported hung.
const NUMBER_SEQUENTIAL_ERRORS: u32 = 4;

/// Scan timeout for drivers that never deliver a scan-complete event.
const SCAN_TIMEOUT: Duration = Duration::from_secs(10);
/// Longer timeout when the driver delivers scan-complete events itself, to
/// avoid racing a native event with the association that follows.
const SCAN_TIMEOUT_COMPLETE_EVENTS: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Deadline for reading scan results whether or not the driver reported
    /// scan completion.
    ScanTimeout,
}

/// Vendor workarounds kept out of the regular dispatch path.
#[derive(Debug, Clone, Default)]
pub struct Quirks {
    /// Report every private command as successful no matter what the ioctl
    /// returned. Some USB dongles fail each command yet execute it; with
    /// this set, failures are logged and otherwise ignored, and the
    /// sequential-error accounting never trips.
    pub assume_priv_cmd_ok: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Whether the driver delivers native scan-complete wireless events.
    pub scan_complete_events: bool,
    pub quirks: Quirks,
}

/// Connection state ladder of the owning supplicant, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SupplicantState {
    Disconnected,
    InterfaceDisabled,
    Inactive,
    Scanning,
    Authenticating,
    Associating,
    Associated,
    FourWayHandshake,
    GroupHandshake,
    Completed,
}

/// Read-only view of the supplicant session owning this driver.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub scanning: bool,
    pub state: SupplicantState,
    /// Configured network profiles, in preference order.
    pub networks: &'a [NetworkProfile],
}

/// A directed scan request. An empty SSID asks for a broadcast scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub ssid: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalInfo {
    pub rssi_dbm: i32,
    pub tx_rate_kbps: u32,
}

pub struct WextDriver<D> {
    device: D,
    timer: Timer<TimedEvent>,
    sink: DriverEventSink,
    config: DriverConfig,
    started: bool,
    bgscan_enabled: bool,
    errors: u32,
    scan_timeout: Option<EventId>,
}

impl<D: DeviceOps> WextDriver<D> {
    pub fn new(
        config: DriverConfig,
        device: D,
        timer: Timer<TimedEvent>,
        sink: DriverEventSink,
    ) -> Self {
        Self {
            device,
            timer,
            sink,
            config,
            started: false,
            bgscan_enabled: false,
            errors: 0,
            scan_timeout: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn bgscan_enabled(&self) -> bool {
        self.bgscan_enabled
    }

    pub fn access_device(&mut self) -> &mut D {
        &mut self.device
    }

    /// Dispatches one driver command. The driver's NUL-terminated reply is
    /// left in `buf`; for status queries the reply length is returned.
    pub fn driver_cmd(
        &mut self,
        cmd: &str,
        buf: &mut [u8],
        session: &SessionView<'_>,
    ) -> Result<usize, Error> {
        debug!("driver_cmd {} len = {}", cmd, buf.len());

        let parsed = DriverCmd::parse(cmd);
        if !self.started && parsed != DriverCmd::Start {
            error!("driver not initialized yet");
            return Err(Error::NotStarted);
        }

        let mut wire: Cow<'_, str> = Cow::Borrowed(cmd);
        match &parsed {
            DriverCmd::RssiApprox => wire = Cow::Borrowed(RSSI_CMD),
            DriverCmd::ScanChannels(channels) => {
                wire = Cow::Owned(format!("COUNTRY {}", country_code(*channels)));
            }
            DriverCmd::Stop => {
                if let Err(e) = self.device.set_iface_up(false) {
                    error!("failed to bring interface down: {}", e);
                }
            }
            DriverCmd::Reload => {
                debug!("reload command");
                self.sink.send(DriverEvent::Hanged);
                return Ok(0);
            }
            DriverCmd::BgscanStart => {
                self.set_background_scan(session.networks)?;
                wire = Cow::Borrowed("PNOFORCE 1");
                self.bgscan_enabled = true;
            }
            DriverCmd::BgscanStop => {
                wire = Cow::Borrowed("PNOFORCE 0");
                self.bgscan_enabled = false;
            }
            _ => {}
        }

        let payload_len = if let DriverCmd::Cscan(args) = &parsed {
            let busy = session.scanning
                || (session.state > SupplicantState::Scanning
                    && session.state < SupplicantState::Completed);
            if busy {
                error!("ongoing scan action, ignoring {}", cmd);
                return Ok(0);
            }
            cscan::write_cscan_request(args, buf)?
        } else {
            let bytes = wire.as_bytes();
            if bytes.len() + 1 > buf.len() {
                return Err(Error::BufferTooSmall);
            }
            buf[..bytes.len()].copy_from_slice(bytes);
            buf[bytes.len()] = 0;
            buf.len()
        };

        let mut result = self.device.priv_cmd(buf, payload_len);
        if let Err(e) = &result {
            debug!("driver_cmd {} failed: {}", wire, e);
            if self.config.quirks.assume_priv_cmd_ok {
                result = Ok(());
            }
        }
        match result {
            Err(e) => {
                self.note_sequential_error();
                Err(Error::Ioctl { op: "SIOCSIWPRIV", source: e })
            }
            Ok(()) => {
                self.errors = 0;
                let mut reply_len = 0;
                if is_status_query(&wire) {
                    reply_len = reply_strlen(buf);
                } else {
                    match &parsed {
                        DriverCmd::Start => {
                            self.started = true;
                            if let Err(e) = self.device.set_iface_up(true) {
                                error!("failed to bring interface up: {}", e);
                            }
                        }
                        DriverCmd::Stop => self.started = false,
                        DriverCmd::Cscan(_) => {
                            self.set_scan_timeout();
                            self.sink.send(DriverEvent::ScanningStarted);
                        }
                        _ => {}
                    }
                }
                debug!("driver_cmd {} done, reply len = {}", wire, reply_len);
                Ok(reply_len)
            }
        }
    }

    /// Requests a scan directed at the SSID in `params`, or a broadcast
    /// scan when it is empty.
    pub fn combo_scan(&mut self, params: &ScanRequest) -> Result<(), Error> {
        if params.ssid.len() > IW_ESSID_MAX_SIZE {
            debug!("combo scan: SSID too long ({} bytes)", params.ssid.len());
            return Err(Error::SsidTooLong(params.ssid.len()));
        }
        let ssid = if params.ssid.is_empty() { None } else { Some(&params.ssid[..]) };
        let result = match self.device.start_scan(ssid) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("scan ioctl failed: {}", e);
                Err(Error::Ioctl { op: "SIOCSIWSCAN", source: e })
            }
        };
        // Whether or not the request went through, poll for results once the
        // timeout hits.
        self.set_scan_timeout();
        result
    }

    /// Retrieves an event scheduled by this driver once its deadline fired.
    pub fn handle_timeout(&mut self, event_id: EventId) -> Option<TimedEvent> {
        if self.scan_timeout == Some(event_id) {
            self.scan_timeout = None;
        }
        self.timer.triggered(&event_id)
    }

    /// Current link quality. The vendor driver offers no acquisition path,
    /// so this reports fixed placeholder values.
    pub fn signal_poll(&self) -> SignalInfo {
        SignalInfo { rssi_dbm: -60, tx_rate_kbps: 150_000 }
    }

    fn set_background_scan(&mut self, networks: &[NetworkProfile]) -> Result<(), Error> {
        let mut buf = [0u8; PNO_MAX_COMMAND_SIZE];
        let len = pno::write_pno_setup(networks, &mut buf[..])?;
        match self.device.priv_cmd(&mut buf[..], len) {
            Err(e) => {
                error!("pnosetup ioctl failed: {}", e);
                self.note_sequential_error();
                Err(Error::Ioctl { op: "SIOCSIWPRIV", source: e })
            }
            Ok(()) => {
                self.errors = 0;
                Ok(())
            }
        }
    }

    /// Not all drivers generate a scan-complete event; arrange to read
    /// results after a timeout either way, replacing any pending deadline.
    fn set_scan_timeout(&mut self) {
        let timeout = if self.config.scan_complete_events {
            SCAN_TIMEOUT_COMPLETE_EVENTS
        } else {
            SCAN_TIMEOUT
        };
        debug!("scan requested - scan timeout {:?}", timeout);
        if let Some(id) = self.scan_timeout.take() {
            self.timer.cancel_event(id);
        }
        self.scan_timeout = Some(self.timer.schedule_after(timeout, TimedEvent::ScanTimeout));
    }

    fn note_sequential_error(&mut self) {
        self.errors += 1;
        if self.errors > NUMBER_SEQUENTIAL_ERRORS {
            self.errors = 0;
            self.sink.send(DriverEvent::Hanged);
        }
    }
}

fn is_status_query(cmd: &str) -> bool {
    cmd.eq_ignore_ascii_case(RSSI_CMD)
        || cmd.eq_ignore_ascii_case(LINKSPEED_CMD)
        || cmd.eq_ignore_ascii_case("MACADDR")
        || cmd.eq_ignore_ascii_case("GETPOWER")
        || cmd.eq_ignore_ascii_case("GETBAND")
}

/// Length of the NUL-terminated reply the driver left in `buf`.
fn reply_strlen(buf: &[u8]) -> usize {
    buf.iter().position(|&b| b == 0).unwrap_or(buf.len())
}
