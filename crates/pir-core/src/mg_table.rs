//! Builds and holds the discrete-log lookup table `mG = {(m·G, m) : 0 ≤ m < mmax}`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::traits::Identity;
use log::debug;

use crate::curve;

/// One row of the table: a compressed point and the scalar it was generated from.
///
/// Fixed 36-byte on-disk layout: see [`crate::table_io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MgEntry {
    pub point: [u8; 32],
    pub scalar: u32,
}

impl Default for MgEntry {
    fn default() -> Self {
        MgEntry { point: [0u8; 32], scalar: 0 }
    }
}

/// A sorted `mG` table: read-only after construction, shareable by reference
/// across every decrypt call for the lifetime of the program.
#[derive(Debug, Clone, Default)]
pub struct MgTable {
    entries: Vec<MgEntry>,
}

impl MgTable {
    /// Wrap an already-sorted vector of entries (used by the table loader).
    pub(crate) fn from_sorted_entries(entries: Vec<MgEntry>) -> Self {
        MgTable { entries }
    }

    pub fn entries(&self) -> &[MgEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build `mG` for `m ∈ [0, mmax)`, parallelised over the host's available
/// parallelism, with a progress callback invoked once per point produced.
pub fn mg_generate(mmax: u64, progress_cb: impl Fn(u64) + Send + Sync) -> MgTable {
    let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    mg_generate_with_threads(mmax, threads, progress_cb)
}

/// Same as [`mg_generate`] but with an explicit lane count, for testing and
/// for callers tuning contention on small tables.
pub fn mg_generate_with_threads(
    mmax: u64,
    threads: usize,
    progress_cb: impl Fn(u64) + Send + Sync,
) -> MgTable {
    let mmax = mmax as usize;
    if mmax == 0 {
        return MgTable::default();
    }
    let lanes = threads.max(1).min(mmax);
    debug!("mg_generate: mmax={} lanes={}", mmax, lanes);

    let counter = AtomicU64::new(0);
    let cb = |n: u64| progress_cb(n);
    let bump = |k: u64| {
        let n = counter.fetch_add(k, Ordering::Relaxed) + k;
        cb(n);
    };

    let mut entries = vec![MgEntry::default(); mmax];
    let g = curve::point_base_mul(&curve::scalar_from_u64(1));

    // Prepare stage (single-threaded): mG[0..lanes) = 0, G, 2G, ..., (lanes-1)G.
    let mut lane_start: Vec<EdwardsPoint> = Vec::with_capacity(lanes);
    let mut p = EdwardsPoint::identity();
    for t in 0..lanes {
        entries[t] = MgEntry { point: curve::point_compress(&p), scalar: t as u32 };
        lane_start.push(p);
        bump(1);
        if t + 1 < lanes {
            p = curve::point_add(&p, &g);
        }
    }
    let t_g = curve::point_add(&lane_start[lanes - 1], &g);

    // Compute stage (parallel, `lanes` lanes): lane `t` walks indices
    // t, t+lanes, t+2*lanes, ... adding `t_g` each step. Each lane writes into
    // its own scratch vector to stay free of cross-thread aliasing; results
    // are scattered back into `entries` after the join.
    let mut lane_results: Vec<Vec<MgEntry>> = (0..lanes).map(|_| Vec::new()).collect();
    thread::scope(|scope| {
        for (t, slot) in lane_results.iter_mut().enumerate() {
            let start = lane_start[t];
            let bump = &bump;
            scope.spawn(move || {
                let mut p = start;
                let mut k = 1u64;
                loop {
                    let idx = t + (k as usize) * lanes;
                    if idx >= mmax {
                        break;
                    }
                    p = curve::point_add(&p, &t_g);
                    slot.push(MgEntry { point: curve::point_compress(&p), scalar: idx as u32 });
                    bump(1);
                    k += 1;
                }
            });
        }
    });

    for (t, slot) in lane_results.into_iter().enumerate() {
        for (k, entry) in slot.into_iter().enumerate() {
            let idx = t + (k + 1) * lanes;
            entries[idx] = entry;
        }
    }

    // Sort stage: ascending by compressed point, lexicographic byte order.
    entries.sort_unstable_by(|a, b| a.point.cmp(&b.point));
    debug!("mg_generate: done, {} entries", entries.len());

    MgTable::from_sorted_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve;
    use std::collections::HashSet;

    #[test]
    fn sorted_ascending_by_point() {
        let mg = mg_generate_with_threads(500, 4, |_| {});
        let entries = mg.entries();
        for w in entries.windows(2) {
            assert!(w[0].point < w[1].point);
        }
    }

    #[test]
    fn complete_and_correct() {
        let mmax = 500u64;
        let mg = mg_generate_with_threads(mmax, 4, |_| {});
        let entries = mg.entries();
        assert_eq!(entries.len(), mmax as usize);

        let scalars: HashSet<u32> = entries.iter().map(|e| e.scalar).collect();
        assert_eq!(scalars.len(), mmax as usize);
        for m in 0..mmax as u32 {
            assert!(scalars.contains(&m));
        }

        for entry in entries {
            let expected = curve::point_compress(&curve::point_base_mul(&curve::scalar_from_u64(
                entry.scalar as u64,
            )));
            assert_eq!(entry.point, expected);
        }
    }

    #[test]
    fn single_lane_matches_multi_lane() {
        let a = mg_generate_with_threads(200, 1, |_| {});
        let b = mg_generate_with_threads(200, 8, |_| {});
        let mut a_entries = a.entries().to_vec();
        let mut b_entries = b.entries().to_vec();
        a_entries.sort_unstable_by(|x, y| x.scalar.cmp(&y.scalar));
        b_entries.sort_unstable_by(|x, y| x.scalar.cmp(&y.scalar));
        assert_eq!(a_entries, b_entries);
    }

    #[test]
    fn progress_callback_reaches_mmax() {
        let counter = AtomicU64::new(0);
        let mmax = 300u64;
        let mg = mg_generate_with_threads(mmax, 4, |n| {
            counter.fetch_max(n, Ordering::Relaxed);
        });
        assert_eq!(mg.len(), mmax as usize);
        assert_eq!(counter.load(Ordering::Relaxed), mmax);
    }

    #[test]
    fn mmax_one_is_just_identity() {
        let mg = mg_generate_with_threads(1, 4, |_| {});
        assert_eq!(mg.len(), 1);
        assert_eq!(mg.entries()[0].scalar, 0);
        assert_eq!(mg.entries()[0].point, curve::point_compress(&EdwardsPoint::identity()));
    }
}
