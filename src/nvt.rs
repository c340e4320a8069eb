//! Neuralynx NVT file layout.
//!
//! An `.nvt` file is a 16 KiB opaque text header followed by packed
//! little-endian video tracker records of exactly 1828 bytes. Records are
//! kept as raw bytes here so every field the fixer does not touch (bitfield
//! points, CRC, targets) round-trips verbatim.

use std::io::{self, Read, Write};

/// Size of the opaque text header at the start of every Neuralynx file.
pub const HEADER_SIZE: usize = 0x4000;

/// Size of one packed video tracker record.
pub const RECORD_SIZE: usize = 1828;

// Byte offsets of the fields the fixer reads or patches. Full packed
// layout: stx u16, id u16, data_size u16, timestamp u64, points [u32; 400],
// crc i16, x i32, y i32, angle i32, targets [i32; 50].
const TIMESTAMP_OFFSET: usize = 6;
const X_OFFSET: usize = 1616;
const Y_OFFSET: usize = 1620;
const ANGLE_OFFSET: usize = 1624;

/// One video tracker record.
#[derive(Clone)]
pub struct NvtRecord {
    bytes: [u8; RECORD_SIZE],
}

impl NvtRecord {
    pub fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        Self { bytes }
    }

    /// Read the next record. Returns `Ok(None)` at end of input; a trailing
    /// partial record is dropped, matching the original converter's read
    /// loop.
    pub fn read_from(reader: &mut impl Read) -> io::Result<Option<Self>> {
        let mut bytes = [0u8; RECORD_SIZE];
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        if filled == 0 {
            return Ok(None);
        }
        if filled < RECORD_SIZE {
            log::debug!("dropping {} trailing bytes (partial record)", filled);
            return Ok(None);
        }
        Ok(Some(Self { bytes }))
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn timestamp(&self) -> u64 {
        let raw: [u8; 8] = self.bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8]
            .try_into()
            .unwrap();
        u64::from_le_bytes(raw)
    }

    pub fn x(&self) -> i32 {
        self.read_i32(X_OFFSET)
    }

    pub fn y(&self) -> i32 {
        self.read_i32(Y_OFFSET)
    }

    pub fn angle(&self) -> i32 {
        self.read_i32(ANGLE_OFFSET)
    }

    /// The tracker writes x = y = 0 when it loses the target. The angle is
    /// not part of the check.
    pub fn is_lost(&self) -> bool {
        self.x() == 0 && self.y() == 0
    }

    /// Overwrite the extracted position fields, leaving everything else in
    /// the record untouched.
    pub fn set_position(&mut self, x: i32, y: i32, angle: i32) {
        self.bytes[X_OFFSET..X_OFFSET + 4].copy_from_slice(&x.to_le_bytes());
        self.bytes[Y_OFFSET..Y_OFFSET + 4].copy_from_slice(&y.to_le_bytes());
        self.bytes[ANGLE_OFFSET..ANGLE_OFFSET + 4].copy_from_slice(&angle.to_le_bytes());
    }

    fn read_i32(&self, offset: usize) -> i32 {
        let raw: [u8; 4] = self.bytes[offset..offset + 4].try_into().unwrap();
        i32::from_le_bytes(raw)
    }
}

impl std::fmt::Debug for NvtRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NvtRecord")
            .field("timestamp", &self.timestamp())
            .field("x", &self.x())
            .field("y", &self.y())
            .field("angle", &self.angle())
            .finish_non_exhaustive()
    }
}

/// Read the opaque file header. An input shorter than `HEADER_SIZE` bytes
/// is not an NVT file and errors out.
pub fn read_header(reader: &mut impl Read) -> io::Result<Vec<u8>> {
    let mut header = vec![0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    Ok(header)
}
