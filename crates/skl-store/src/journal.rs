use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::batch::WriteBatch;
use crate::error::{StoreError, StoreResult};

/// Flush/sync strategy for the journal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// `fdatasync` after every batch.
    EveryWrite,
    /// Hand the frame to the OS and rely on its page cache.
    #[default]
    OsDefault,
}

/// Configuration for the [`Journal`].
#[derive(Clone, Debug, Default)]
pub struct JournalConfig {
    pub sync_mode: SyncMode,
}

/// Frame header: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Largest payload a header may declare. Anything bigger is a damaged
/// header, not a batch.
const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Append-only journal of [`WriteBatch`]es.
///
/// On-disk format, one frame per batch:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized WriteBatch)]
/// ```
///
/// Batches carry absolute record values, so replay is only meaningful as an
/// unbroken prefix of the file. An incomplete final frame is the trace of a
/// crash mid-append and is cut off when the journal is opened. A damaged
/// frame anywhere else makes the journal unusable.
pub struct Journal {
    path: PathBuf,
    file: File,
    /// Length of the valid prefix; the next frame starts here.
    len: u64,
    /// Set when a failed append could not be rolled back.
    wedged: bool,
    config: JournalConfig,
}

impl Journal {
    /// Open (or create) the journal at `path` and return it with every batch
    /// it holds, oldest first.
    ///
    /// A torn tail is truncated before returning, so the next append lands
    /// directly after the last intact frame.
    pub fn open(path: &Path, config: JournalConfig) -> StoreResult<(Self, Vec<WriteBatch>)> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let (batches, len) = replay(&bytes)?;
        let file_len = bytes.len() as u64;
        if len < file_len {
            warn!(
                path = %path.display(),
                kept = len,
                dropped = file_len - len,
                "truncating torn journal tail"
            );
            file.set_len(len)?;
            file.sync_all()?;
        }

        let journal = Self {
            path: path.to_path_buf(),
            file,
            len,
            wedged: false,
            config,
        };
        Ok((journal, batches))
    }

    /// Append one batch as a single frame. Returns the frame's byte offset.
    ///
    /// On failure the file is cut back to where the frame started, so a
    /// rejected batch leaves nothing behind for replay.
    pub fn append(&mut self, batch: &WriteBatch) -> StoreResult<u64> {
        if self.wedged {
            return Err(StoreError::Io(io::Error::other(
                "journal holds a partial frame from a failed append; reopen it",
            )));
        }

        let frame = encode_frame(batch)?;
        let start = self.len;
        if let Err(err) = self.write_frame(&frame) {
            if let Err(cut) = self.file.set_len(start) {
                warn!(offset = start, error = %cut, "could not roll back failed journal append");
                self.wedged = true;
            }
            return Err(err.into());
        }
        self.len += frame.len() as u64;

        debug!(offset = start, len = frame.len(), sequence = %batch.sequence, "journal append");
        Ok(start)
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.file.write_all(frame)?;
        if self.config.sync_mode == SyncMode::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Bytes of valid frames in the file.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_frame(batch: &WriteBatch) -> StoreResult<Vec<u8>> {
    let payload =
        bincode::serialize(batch).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|&len| len as usize <= MAX_FRAME_LEN)
        .ok_or_else(|| StoreError::Serialization(format!("batch of {} bytes", payload.len())))?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decode the longest intact prefix of `bytes`.
///
/// Returns the batches and the prefix length. Stops without error at a
/// frame that reaches end of file incomplete or with a bad checksum; fails
/// on any damaged frame that has more data after it.
fn replay(bytes: &[u8]) -> StoreResult<(Vec<WriteBatch>, u64)> {
    let mut batches = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let offset = pos as u64;
        let corrupt = |reason: String| StoreError::Corrupt { offset, reason };

        let rest = &bytes[pos..];
        if rest.len() < HEADER_SIZE {
            break;
        }
        let len = le_u32(&rest[..4]) as usize;
        let crc = le_u32(&rest[4..HEADER_SIZE]);
        if len == 0 || len > MAX_FRAME_LEN {
            return Err(corrupt(format!("frame declares {len} payload bytes")));
        }

        let body = &rest[HEADER_SIZE..];
        if body.len() < len {
            break;
        }
        let payload = &body[..len];
        let at_tail = body.len() == len;

        if crc32fast::hash(payload) != crc {
            if at_tail {
                break;
            }
            return Err(corrupt("checksum mismatch".into()));
        }
        let batch = bincode::deserialize::<WriteBatch>(payload)
            .map_err(|e| corrupt(format!("undecodable batch: {e}")))?;
        batches.push(batch);
        pos += HEADER_SIZE + len;
    }

    Ok((batches, pos as u64))
}
