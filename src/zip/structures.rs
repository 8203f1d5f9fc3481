use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Cursor;

use anyhow::{Result, bail};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Deflate64,
    Bzip2,
    Lzma,
    Ppmd,
    Aes,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            9 => CompressionMethod::Deflate64,
            12 => CompressionMethod::Bzip2,
            14 => CompressionMethod::Lzma,
            98 => CompressionMethod::Ppmd,
            99 => CompressionMethod::Aes,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Deflate64 => 9,
            CompressionMethod::Bzip2 => 12,
            CompressionMethod::Lzma => 14,
            CompressionMethod::Ppmd => 98,
            CompressionMethod::Aes => 99,
            CompressionMethod::Unknown(v) => *v,
        }
    }

    /// Whether the member reader can produce data for this method.
    pub fn is_supported(&self) -> bool {
        matches!(self, CompressionMethod::Stored | CompressionMethod::Deflate)
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Stored => f.write_str("Store"),
            CompressionMethod::Deflate => f.write_str("Deflate"),
            CompressionMethod::Deflate64 => f.write_str("Deflate64"),
            CompressionMethod::Bzip2 => f.write_str("BZIP2"),
            CompressionMethod::Lzma => f.write_str("LZMA"),
            CompressionMethod::Ppmd => f.write_str("PPMd"),
            CompressionMethod::Aes => f.write_str("AES"),
            CompressionMethod::Unknown(v) => write!(f, "method {v}"),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    /// Entry count recorded by the archive; the walk does not rely on it
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            bail!("Invalid End of Central Directory");
        }

        // Verify signature
        if &data[0..4] != Self::SIGNATURE {
            bail!("Invalid End of Central Directory");
        }

        let mut cursor = Cursor::new(data);
        cursor.set_position(10); // Skip disk numbers and per-disk count

        Ok(Self {
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Member metadata as listed by the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntryMetadata {
    /// Raw name bytes mapped one-to-one onto code points U+0000..=U+00FF
    pub name: String,
    pub compression_method: CompressionMethod,
    pub encrypted: bool,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub lfh_offset: u32,
}

impl ZipEntryMetadata {
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}
