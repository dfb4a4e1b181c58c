// Copyright 2021 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Wireless-Extensions ioctl boundary.
//!
//! [`DeviceOps`] is the seam between the command shim and the kernel.
//! [`WextDevice`] is the real implementation over a datagram control socket;
//! tests run against the recording `FakeDevice`.

use {
    std::ffi::c_void,
    std::io,
    std::mem,
    zerocopy::{Immutable, IntoBytes},
};

#[cfg(test)]
pub use test_utils::*;

pub const IW_ESSID_MAX_SIZE: usize = 32;
const IW_SCAN_THIS_ESSID: u16 = 0x0002;
const IW_MAX_FREQUENCIES: usize = 32;

const SIOCSIWSCAN: libc::c_ulong = 0x8B18;
const SIOCSIWPRIV: libc::c_ulong = 0x8B0C;

const ETH_ALEN: usize = 6;

/// Requests the shim issues against the interface.
pub trait DeviceOps {
    /// Asks the driver to start a scan, directed at `ssid` if one is given.
    /// `ssid` must be at most [`IW_ESSID_MAX_SIZE`] bytes.
    fn start_scan(&mut self, ssid: Option<&[u8]>) -> io::Result<()>;
    /// Issues a vendor-private command. The first `payload_len` bytes of
    /// `buf` hold the command; the driver writes its NUL-terminated reply
    /// back into `buf`.
    fn priv_cmd(&mut self, buf: &mut [u8], payload_len: usize) -> io::Result<()>;
    /// Raises or lowers the interface's administrative state.
    fn set_iface_up(&mut self, up: bool) -> io::Result<()>;
}

#[repr(C)]
#[derive(IntoBytes, Immutable, Clone, Copy)]
struct SockAddr {
    sa_family: u16,
    sa_data: [u8; 14],
}

#[repr(C)]
#[derive(IntoBytes, Immutable, Clone, Copy)]
struct IwFreq {
    m: i32,
    e: i16,
    i: u8,
    flags: u8,
}

/// Payload of a directed scan request, laid out as `struct iw_scan_req`.
#[repr(C)]
#[derive(IntoBytes, Immutable)]
struct IwScanReq {
    scan_type: u8,
    essid_len: u8,
    num_channels: u8,
    flags: u8,
    bssid: SockAddr,
    essid: [u8; IW_ESSID_MAX_SIZE],
    min_channel_time: u32,
    max_channel_time: u32,
    channel_list: [IwFreq; IW_MAX_FREQUENCIES],
}

#[repr(C)]
#[derive(Clone, Copy)]
struct IwPoint {
    pointer: *mut c_void,
    length: u16,
    flags: u16,
}

#[repr(C)]
union IwReqData {
    point: IwPoint,
    _pad: [u8; 16],
}

#[repr(C)]
struct IwReq {
    ifr_name: [libc::c_char; libc::IFNAMSIZ],
    u: IwReqData,
}

/// Control socket for one wireless interface.
pub struct WextDevice {
    sock: libc::c_int,
    ifname: String,
}

impl WextDevice {
    pub fn open(ifname: &str) -> io::Result<Self> {
        if ifname.len() >= libc::IFNAMSIZ {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("interface name too long: {}", ifname),
            ));
        }
        // safe: no invariants to uphold, the result is checked
        let sock = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        if sock < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { sock, ifname: ifname.to_string() })
    }

    fn iwreq(&self) -> IwReq {
        // safe: IwReq is all-zeroes-valid, the pointer member included
        let mut iwr: IwReq = unsafe { mem::zeroed() };
        copy_ifname(&mut iwr.ifr_name, &self.ifname);
        iwr
    }
}

fn copy_ifname(dst: &mut [libc::c_char], name: &str) {
    for (dst, src) in dst.iter_mut().zip(name.as_bytes()) {
        *dst = *src as libc::c_char;
    }
}

impl DeviceOps for WextDevice {
    fn start_scan(&mut self, ssid: Option<&[u8]>) -> io::Result<()> {
        let mut iwr = self.iwreq();
        let scan_req;
        if let Some(ssid) = ssid {
            debug_assert!(ssid.len() <= IW_ESSID_MAX_SIZE);
            let mut essid = [0u8; IW_ESSID_MAX_SIZE];
            essid[..ssid.len()].copy_from_slice(ssid);
            let mut sa_data = [0u8; 14];
            sa_data[..ETH_ALEN].copy_from_slice(&[0xff; ETH_ALEN]);
            scan_req = IwScanReq {
                scan_type: 0,
                essid_len: ssid.len() as u8,
                num_channels: 0,
                flags: 0,
                bssid: SockAddr { sa_family: libc::ARPHRD_ETHER, sa_data },
                essid,
                min_channel_time: 0,
                max_channel_time: 0,
                channel_list: [IwFreq { m: 0, e: 0, i: 0, flags: 0 }; IW_MAX_FREQUENCIES],
            };
            let bytes = scan_req.as_bytes();
            iwr.u.point = IwPoint {
                pointer: bytes.as_ptr() as *mut c_void,
                length: bytes.len() as u16,
                flags: IW_SCAN_THIS_ESSID,
            };
        }
        // safe: iwr points into scan_req which outlives the call
        let ret = unsafe { libc::ioctl(self.sock, SIOCSIWSCAN, &mut iwr) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn priv_cmd(&mut self, buf: &mut [u8], payload_len: usize) -> io::Result<()> {
        debug_assert!(payload_len <= buf.len());
        let mut iwr = self.iwreq();
        iwr.u.point = IwPoint {
            pointer: buf.as_mut_ptr() as *mut c_void,
            length: payload_len as u16,
            flags: 0,
        };
        // safe: iwr points into buf which outlives the call
        let ret = unsafe { libc::ioctl(self.sock, SIOCSIWPRIV, &mut iwr) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn set_iface_up(&mut self, up: bool) -> io::Result<()> {
        // safe: ifreq is all-zeroes-valid
        let mut ifr: libc::ifreq = unsafe { mem::zeroed() };
        copy_ifname(&mut ifr.ifr_name, &self.ifname);
        // safe: ifr is a valid ifreq for the duration of the call
        if unsafe { libc::ioctl(self.sock, libc::SIOCGIFFLAGS, &mut ifr) } < 0 {
            return Err(io::Error::last_os_error());
        }
        // safe: SIOCGIFFLAGS initialized the flags member
        let flags = unsafe { ifr.ifr_ifru.ifru_flags };
        ifr.ifr_ifru.ifru_flags = if up {
            flags | libc::IFF_UP as libc::c_short
        } else {
            flags & !(libc::IFF_UP as libc::c_short)
        };
        if unsafe { libc::ioctl(self.sock, libc::SIOCSIFFLAGS, &mut ifr) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for WextDevice {
    fn drop(&mut self) {
        // safe: the fd is owned by self and not closed anywhere else
        unsafe {
            libc::close(self.sock);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_req_layout() {
        assert_eq!(mem::size_of::<IwScanReq>(), 316);
        assert_eq!(mem::size_of::<IwReqData>(), 16);
    }

    #[test]
    fn rejects_overlong_ifname() {
        let err = WextDevice::open("wlan0-with-a-very-long-name")
            .err()
            .expect("expected overlong name to be rejected");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn fake_device_records_commands() {
        let mut dev = FakeDevice::new();
        let mut buf = [0u8; 16];
        buf[..4].copy_from_slice(b"FOO\0");
        dev.priv_cmd(&mut buf, 4).expect("priv_cmd failed");
        dev.start_scan(Some(b"ssid")).expect("start_scan failed");
        dev.set_iface_up(true).expect("set_iface_up failed");
        assert_eq!(dev.priv_cmds, vec![b"FOO\0".to_vec()]);
        assert_eq!(dev.scan_requests, vec![Some(b"ssid".to_vec())]);
        assert_eq!(dev.iface_up, vec![true]);
    }

    #[test]
    fn fake_device_failure_injection() {
        let mut dev = FakeDevice::new();
        dev.fail_priv_cmd = true;
        let mut buf = [0u8; 16];
        dev.priv_cmd(&mut buf, 1).expect_err("expected priv_cmd to fail");
        assert!(dev.priv_cmds.is_empty());
    }
}
