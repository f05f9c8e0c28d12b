//! Binary checkpoint format for census progress.
//!
//! Format:
//! - Header (32 bytes):
//!   - Magic: "PBLC" (4 bytes)
//!   - Version: u32 LE (4 bytes)
//!   - Entry count: u64 LE (8 bytes)
//!   - Checksum: u64 LE xxhash of data section (8 bytes)
//!   - Reserved: 8 bytes (zeros)
//! - Data section, one record per grid size in ascending size order:
//!   - Size: u8
//!   - Next board: u64 LE
//!   - Solvable: u64 LE
//!   - Unsolvable: u64 LE
//!   - Histogram length: u16 LE
//!   - Histogram: length × u64 LE

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use xxhash_rust::xxh64::xxh64;

use crate::census::SizeCensus;

const MAGIC: &[u8; 4] = b"PBLC";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 32;
const RECORD_FIXED_SIZE: usize = 1 + 8 + 8 + 8 + 2;

pub struct Checkpoint {
    pub entries: Vec<SizeCensus>,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Little-endian reader over the data section.
struct Cursor<'a> {
    data: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        if self.data.len() < N {
            return Err(invalid("Truncated checkpoint record"));
        }
        let (head, rest) = self.data.split_at(N);
        self.data = rest;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        Ok(out)
    }

    fn u8(&mut self) -> io::Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> io::Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn u64(&mut self) -> io::Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }
}

impl Checkpoint {
    /// Save census progress to a binary checkpoint file.
    pub fn save(path: &Path, entries: &[SizeCensus]) -> io::Result<usize> {
        let mut sorted: Vec<&SizeCensus> = entries.iter().collect();
        sorted.sort_by_key(|c| c.size);

        let mut data = Vec::new();
        for census in &sorted {
            data.push(census.size);
            data.extend_from_slice(&census.next.to_le_bytes());
            data.extend_from_slice(&census.solvable.to_le_bytes());
            data.extend_from_slice(&census.unsolvable.to_le_bytes());
            data.extend_from_slice(&(census.histogram.len() as u16).to_le_bytes());
            for count in &census.histogram {
                data.extend_from_slice(&count.to_le_bytes());
            }
        }

        let checksum = xxh64(&data, 0);

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&(sorted.len() as u64).to_le_bytes())?;
        writer.write_all(&checksum.to_le_bytes())?;
        writer.write_all(&[0u8; 8])?; // Reserved

        writer.write_all(&data)?;
        writer.flush()?;

        Ok(sorted.len())
    }

    /// Load checkpoint from binary file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let mut cursor = Cursor { data: &header };
        if &cursor.take::<4>()? != MAGIC {
            return Err(invalid("Invalid checkpoint magic"));
        }
        let version = u32::from_le_bytes(cursor.take()?);
        if version != VERSION {
            return Err(invalid(format!("Unsupported checkpoint version: {}", version)));
        }
        let count = cursor.u64()? as usize;
        let stored_checksum = cursor.u64()?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        if xxh64(&data, 0) != stored_checksum {
            return Err(invalid("Checkpoint checksum mismatch"));
        }

        let mut cursor = Cursor { data: &data };
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let size = cursor.u8()?;
            let next = cursor.u64()?;
            let solvable = cursor.u64()?;
            let unsolvable = cursor.u64()?;
            let len = cursor.u16()? as usize;
            let histogram = (0..len).map(|_| cursor.u64()).collect::<io::Result<Vec<_>>>()?;
            if histogram.len() != size as usize * size as usize + 1 {
                return Err(invalid(format!("Bad histogram length for size {}", size)));
            }
            entries.push(SizeCensus {
                size,
                next,
                solvable,
                unsolvable,
                histogram,
            });
        }
        if !cursor.data.is_empty() {
            return Err(invalid("Trailing bytes after checkpoint records"));
        }

        Ok(Checkpoint { entries })
    }

    /// Get file size estimate for the given census entries.
    pub fn estimate_size(entries: &[SizeCensus]) -> usize {
        HEADER_SIZE
            + entries
                .iter()
                .map(|c| RECORD_FIXED_SIZE + 8 * c.histogram.len())
                .sum::<usize>()
    }
}
