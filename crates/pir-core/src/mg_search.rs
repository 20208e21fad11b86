//! Interpolation search over a sorted `mG` table.
//!
//! Compressed Edwards points are near-uniformly distributed bytes, so treating
//! the leading 4 bytes as a big-endian `u32` key and interpolating linearly
//! between the known endpoints converges in `O(log log n)` expected probes on
//! a uniform table, versus `O(log n)` for binary search.

use crate::mg_table::MgTable;

fn key32(point: &[u8; 32]) -> u32 {
    u32::from_be_bytes([point[0], point[1], point[2], point[3]])
}

/// Find the scalar `m` such that `entries[i].point == target` for some `i`,
/// or `None` if `target` is not present in the table.
pub fn interpolation_search(target: &[u8; 32], mg: &MgTable) -> Option<u32> {
    let entries = mg.entries();
    if entries.is_empty() {
        return None;
    }
    if entries.len() == 1 {
        return if &entries[0].point == target { Some(entries[0].scalar) } else { None };
    }

    let mut imin = 0usize;
    let mut imax = entries.len() - 1;
    let mut left = key32(&entries[imin].point);
    let mut right = key32(&entries[imax].point);
    let target32 = key32(target);

    while imin <= imax {
        let imid = if left == right {
            imin
        } else {
            let span = (imax - imin) as u64;
            let num = (target32.wrapping_sub(left)) as u64;
            let den = (right - left) as u64;
            // A query point outside [left, right] (e.g. target not in the
            // table at all) can make the raw interpolation land past either
            // end; clamp so we always probe inside the current range.
            let offset = (span * num / den).min(span);
            imin + offset as usize
        };

        match entries[imid].point.cmp(target) {
            std::cmp::Ordering::Less => {
                imin = imid + 1;
                if imin > imax {
                    break;
                }
                left = key32(&entries[imin].point);
            }
            std::cmp::Ordering::Greater => {
                if imid == 0 {
                    break;
                }
                imax = imid - 1;
                right = key32(&entries[imax].point);
            }
            std::cmp::Ordering::Equal => return Some(entries[imid].scalar),
        }

        if left == right {
            return if entries[imin].point == *target { Some(entries[imin].scalar) } else { None };
        }
    }
    None
}
