//! Multi-phase decrypt-and-repack of a server reply.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, warn};

use crate::cipher::ecelgamal_decrypt;
use crate::constants::{CIPHER_SIZE, MAX_PACKING};
use crate::error::PirError;
use crate::keys::PrivKey;
use crate::mg_table::MgTable;

fn validate(reply: &[u8], dimension: u8, packing: u8) -> Result<(), PirError> {
    if dimension == 0 {
        return Err(PirError::InvalidParameter("dimension must be >= 1".into()));
    }
    if packing == 0 || packing > MAX_PACKING {
        return Err(PirError::InvalidParameter(format!(
            "packing must be in [1, {}], got {}",
            MAX_PACKING, packing
        )));
    }
    if reply.len() % CIPHER_SIZE != 0 {
        return Err(PirError::InvalidParameter(format!(
            "reply length {} is not a multiple of CIPHER_SIZE ({})",
            reply.len(),
            CIPHER_SIZE
        )));
    }

    // Every phase but the last divides mid_count by CIPHER_SIZE/packing; make
    // sure that division stays exact instead of silently truncating.
    let mut mid_count = (reply.len() / CIPHER_SIZE) as u64;
    for phase in 0..dimension {
        if phase + 1 < dimension {
            let scaled = mid_count * packing as u64;
            if scaled % CIPHER_SIZE as u64 != 0 {
                return Err(PirError::InvalidParameter(format!(
                    "reply does not divide evenly across {} phases at packing {}",
                    dimension, packing
                )));
            }
            mid_count = scaled / CIPHER_SIZE as u64;
        }
    }
    Ok(())
}

/// Decrypt `reply` in place across `dimension` phases, each collapsing one
/// dimension by reading `packing` bytes at a time from each cipher slot.
/// Returns the number of meaningful bytes left at the start of `reply`.
pub fn reply_decrypt(
    reply: &mut [u8],
    privkey: &PrivKey,
    dimension: u8,
    packing: u8,
    mg: &MgTable,
) -> Result<usize, PirError> {
    validate(reply, dimension, packing)?;

    let mut mid_count = reply.len() / CIPHER_SIZE;
    for phase in 0..dimension {
        debug!("reply_decrypt: phase {}/{}, mid_count={}", phase + 1, dimension, mid_count);
        let success = AtomicBool::new(true);

        let active = &mut reply[..mid_count * CIPHER_SIZE];
        let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1).min(mid_count.max(1));
        let chunk_size = mid_count.div_ceil(threads.max(1)).max(1);

        thread::scope(|scope| {
            for chunk in active.chunks_mut(chunk_size * CIPHER_SIZE) {
                let success = &success;
                scope.spawn(move || {
                    for slot in chunk.chunks_mut(CIPHER_SIZE) {
                        match ecelgamal_decrypt(privkey, slot, mg) {
                            Ok(m) => {
                                let bytes = m.to_le_bytes();
                                slot[..packing as usize].copy_from_slice(&bytes[..packing as usize]);
                            }
                            Err(_) => {
                                success.store(false, Ordering::Relaxed);
                            }
                        }
                    }
                });
            }
        });

        if !success.load(Ordering::Relaxed) {
            warn!("reply_decrypt: phase {} failed to decrypt a slot", phase + 1);
            return Err(PirError::ReplyUndecryptable(format!(
                "phase {} of {} produced an out-of-table point",
                phase + 1,
                dimension
            )));
        }

        // Compact: copy the leading `packing` bytes of each slot down to a
        // dense prefix of the buffer.
        for i in 0..mid_count {
            reply.copy_within(i * CIPHER_SIZE..i * CIPHER_SIZE + packing as usize, i * packing as usize);
        }

        if phase + 1 == dimension {
            mid_count *= packing as usize;
        } else {
            mid_count = mid_count * packing as usize / CIPHER_SIZE;
        }
    }

    Ok(mid_count)
}
