use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::space::Space;

const MAGIC: [u8; 4] = *b"SPBK";
const VERSION: u32 = 1;

/// Every registry slot in order; `None` marks an empty slot so ids line up
/// again on load.
pub type Slots = Vec<Option<Space>>;

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Encode slots to `[magic][u32: version][u32: len][bincode][u32: crc32]`.
fn encode_slots(writer: &mut impl Write, slots: &[Option<Space>]) -> io::Result<u64> {
    let payload =
        bincode::serialize(slots).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = u32::try_from(payload.len()).map_err(|_| invalid("snapshot larger than 4 GiB"))?;
    let crc = crc32fast::hash(&payload);
    writer.write_all(&MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(payload.len() as u64 + 16)
}

fn decode_slots(reader: &mut impl Read) -> io::Result<Slots> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(invalid("not a snapshot file"));
    }

    let mut word = [0u8; 4];
    reader.read_exact(&mut word)?;
    let version = u32::from_le_bytes(word);
    if version != VERSION {
        return Err(invalid(format!("unsupported snapshot version {version}")));
    }

    reader.read_exact(&mut word)?;
    let len = u32::from_le_bytes(word) as usize;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    reader.read_exact(&mut word)?;
    let stored_crc = u32::from_le_bytes(word);
    if stored_crc != crc32fast::hash(&payload) {
        return Err(invalid("snapshot checksum mismatch"));
    }

    bincode::deserialize(&payload).map_err(|e| invalid(e.to_string()))
}

/// Whole-registry snapshot file.
///
/// A save writes a sibling `.snap.tmp` file, fsyncs it and renames it over
/// `path`, so a crash leaves either the old or the new snapshot. Unlike a
/// log, a truncated or corrupt snapshot is an error rather than a prefix.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("snap.tmp")
    }

    /// Atomically replace the snapshot. Returns the bytes written.
    pub fn save(&self, slots: &[Option<Space>]) -> io::Result<u64> {
        let tmp_path = self.tmp_path();
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let written = encode_slots(&mut writer, slots)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;
        Ok(written)
    }

    /// `Ok(None)` when no snapshot has been written yet.
    pub fn load(&self) -> io::Result<Option<Slots>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let mut reader = BufReader::new(file);
        decode_slots(&mut reader).map(Some).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                invalid("snapshot truncated")
            } else {
                e
            }
        })
    }
}

/// Write slots as a pretty JSON array with `null` for empty slots.
pub fn export_json(path: &Path, slots: &[Option<Space>]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, slots)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub fn import_json(path: &Path) -> io::Result<Slots> {
    let file = File::open(path)?;
    let slots = serde_json::from_reader(BufReader::new(file))?;
    Ok(slots)
}
