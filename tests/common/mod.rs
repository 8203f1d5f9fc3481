//! Byte-level ZIP builder for tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub struct Member {
    pub name: Vec<u8>,
    pub method: u16,
    pub flags: u16,
    pub data: Vec<u8>,
    pub uncompressed_len: u32,
}

impl Member {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            method: 0,
            flags: 0,
            data: data.to_vec(),
            uncompressed_len: data.len() as u32,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        Self {
            name: name.as_bytes().to_vec(),
            method: 8,
            flags: 0,
            data: encoder.finish().unwrap(),
            uncompressed_len: data.len() as u32,
        }
    }

    /// Member with an arbitrary method code and opaque data.
    pub fn raw(name: &str, method: u16, flags: u16) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            method,
            flags,
            data: b"opaque".to_vec(),
            uncompressed_len: 6,
        }
    }
}

/// Assemble local headers, data, Central Directory and EOCD.
pub fn build_zip(members: &[Member]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut central = Vec::new();

    for m in members {
        let lfh_offset = buf.len() as u32;
        let mut fixed = Vec::new();
        fixed.extend_from_slice(&20u16.to_le_bytes()); // version needed
        fixed.extend_from_slice(&m.flags.to_le_bytes());
        fixed.extend_from_slice(&m.method.to_le_bytes());
        fixed.extend_from_slice(&[0u8; 4]); // time, date
        fixed.extend_from_slice(&0u32.to_le_bytes()); // crc
        fixed.extend_from_slice(&(m.data.len() as u32).to_le_bytes());
        fixed.extend_from_slice(&m.uncompressed_len.to_le_bytes());
        fixed.extend_from_slice(&(m.name.len() as u16).to_le_bytes());
        fixed.extend_from_slice(&0u16.to_le_bytes()); // extra

        buf.extend_from_slice(b"PK\x03\x04");
        buf.extend_from_slice(&fixed);
        buf.extend_from_slice(&m.name);
        buf.extend_from_slice(&m.data);

        central.extend_from_slice(b"PK\x01\x02");
        central.extend_from_slice(&20u16.to_le_bytes()); // version made by
        central.extend_from_slice(&fixed);
        central.extend_from_slice(&0u16.to_le_bytes()); // comment
        central.extend_from_slice(&0u16.to_le_bytes()); // disk
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        central.extend_from_slice(&0u32.to_le_bytes()); // external attrs
        central.extend_from_slice(&lfh_offset.to_le_bytes());
        central.extend_from_slice(&m.name);
    }

    let cd_offset = buf.len() as u32;
    buf.extend_from_slice(&central);

    buf.extend_from_slice(b"PK\x05\x06");
    buf.extend_from_slice(&[0u8; 4]);
    buf.extend_from_slice(&(members.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(members.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(central.len() as u32).to_le_bytes());
    buf.extend_from_slice(&cd_offset.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf
}
