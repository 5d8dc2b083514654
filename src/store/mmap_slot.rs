//! Memory-Mapped Slot Storage
//!
//! Satu file per key: `<dir>/<key>.slot`. Layout file:
//! ┌─────────────────────────────────────────────────────┐
//! │ SlotHeader (24 bytes, little-endian)                │
//! │   magic "VOLTSLOT" | version | reserved | len       │
//! ├─────────────────────────────────────────────────────┤
//! │ Payload (blob dari codec, apa adanya)               │
//! └─────────────────────────────────────────────────────┘
//!
//! Write selalu ke `<key>.slot.tmp` lalu di-rename, jadi reader tidak
//! pernah melihat blob setengah jadi.

use memmap2::{Mmap, MmapOptions};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::{validate_key, SlotStore};

const MAGIC: u64 = 0x544F_4C53_544C_4F56; // "VOLTSLOT" as little-endian bytes
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 24;

const SLOT_EXT: &str = "slot";
const TMP_EXT: &str = "slot.tmp";

/// Header di awal setiap slot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotHeader {
    magic: u64,
    version: u32,
    payload_len: u64,
}

impl SlotHeader {
    fn new(payload_len: usize) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            payload_len: payload_len as u64,
        }
    }

    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..8].copy_from_slice(&self.magic.to_le_bytes());
        out[8..12].copy_from_slice(&self.version.to_le_bytes());
        // 12..16 reserved
        out[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        out
    }

    /// Parse dan validasi header.
    fn parse(buf: &[u8]) -> io::Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(invalid_data("slot file shorter than header"));
        }
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&buf[0..8]);
        let mut version = [0u8; 4];
        version.copy_from_slice(&buf[8..12]);
        let mut len = [0u8; 8];
        len.copy_from_slice(&buf[16..24]);

        let header = Self {
            magic: u64::from_le_bytes(magic),
            version: u32::from_le_bytes(version),
            payload_len: u64::from_le_bytes(len),
        };
        if header.magic != MAGIC {
            return Err(invalid_data("bad slot magic"));
        }
        if header.version != VERSION {
            return Err(invalid_data("unsupported slot version"));
        }
        Ok(header)
    }
}

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

/// Header + payload ke `path` lewat mmap, lalu flush dan fsync.
fn write_slot_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let total_size = HEADER_SIZE + bytes.len();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(total_size as u64)?;

    // SAFETY: file tmp baru dibuat dengan read/write permission dan
    // hanya dipegang oleh call ini.
    let mut mmap = unsafe { MmapOptions::new().len(total_size).map_mut(&file)? };
    mmap[..HEADER_SIZE].copy_from_slice(&SlotHeader::new(bytes.len()).to_bytes());
    mmap[HEADER_SIZE..].copy_from_slice(bytes);
    mmap.flush()?;
    drop(mmap);
    file.sync_all()
}

/// Directory of mmap-backed slot files
#[derive(Debug, Clone)]
pub struct MmapSlotStore {
    dir: PathBuf,
}

impl MmapSlotStore {
    /// Membuka (atau membuat) directory storage
    pub fn open<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "slot store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> io::Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{SLOT_EXT}")))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TMP_EXT}"))
    }

    /// Semua key yang punya slot file, urut alfabet.
    pub fn keys(&self) -> io::Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl SlotStore for MmapSlotStore {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(key, "slot missing");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let file_len = usize::try_from(file.metadata()?.len())
            .map_err(|_| invalid_data("slot file too large for this platform"))?;
        if file_len < HEADER_SIZE {
            return Err(invalid_data("slot file shorter than header"));
        }

        // SAFETY: slot file hanya diganti lewat rename, tidak pernah ditulis
        // in-place, jadi mapping ini tidak berubah selama dibaca.
        let mmap = unsafe { Mmap::map(&file)? };

        let header = SlotHeader::parse(&mmap[..HEADER_SIZE])?;
        let payload_len = usize::try_from(header.payload_len)
            .map_err(|_| invalid_data("slot payload length overflows usize"))?;
        let end = HEADER_SIZE
            .checked_add(payload_len)
            .ok_or_else(|| invalid_data("slot payload length overflows usize"))?;
        if end != mmap.len() {
            return Err(invalid_data("slot payload length does not match file size"));
        }

        trace!(key, bytes = payload_len, "slot loaded");
        Ok(Some(mmap[HEADER_SIZE..end].to_vec()))
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.slot_path(key)?;
        let tmp = self.tmp_path(key);

        // tmp file tidak boleh tertinggal kalau write atau rename gagal
        if let Err(e) = write_slot_file(&tmp, bytes).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        debug!(key, bytes = bytes.len(), "slot stored");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "slot removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
