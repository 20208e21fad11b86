//! On-disk / on-wire layout for the `mG` table: a contiguous sequence of
//! 36-byte entries (`point(32) ‖ scalar(u32, little-endian)`), no header, no
//! magic, no checksum.

use std::io::{self, Read, Write};

use log::debug;

use crate::constants::{LOAD_BATCH_SIZE, MG_ENTRY_SIZE};
use crate::mg_table::{MgEntry, MgTable};

/// Serialize every entry of `mg` to `writer` in table order.
pub fn mg_table_write<W: Write>(mg: &MgTable, writer: &mut W) -> io::Result<()> {
    let mut buf = Vec::with_capacity(mg.len() * MG_ENTRY_SIZE);
    for entry in mg.entries() {
        buf.extend_from_slice(&entry.point);
        buf.extend_from_slice(&entry.scalar.to_le_bytes());
    }
    writer.write_all(&buf)
}

/// Read at most `mmax` entries from `reader`, in batches of
/// [`LOAD_BATCH_SIZE`]. Stops at the first short read and returns however
/// many entries were actually loaded — it is the caller's responsibility to
/// compare the returned count against the `mmax` it requested and treat an
/// incomplete table as fatal if that matters to them.
pub fn mg_table_load<R: Read>(reader: &mut R, mmax: u64) -> io::Result<MgTable> {
    let mmax = mmax as usize;
    let mut entries = Vec::with_capacity(mmax.min(1 << 20));
    let mut batch = vec![0u8; LOAD_BATCH_SIZE * MG_ENTRY_SIZE];

    while entries.len() < mmax {
        let want = (mmax - entries.len()).min(LOAD_BATCH_SIZE);
        let want_bytes = want * MG_ENTRY_SIZE;
        let read = read_up_to(reader, &mut batch[..want_bytes])?;
        let whole_entries = read / MG_ENTRY_SIZE;
        for chunk in batch[..whole_entries * MG_ENTRY_SIZE].chunks_exact(MG_ENTRY_SIZE) {
            let mut point = [0u8; 32];
            point.copy_from_slice(&chunk[..32]);
            let scalar = u32::from_le_bytes(chunk[32..36].try_into().unwrap());
            entries.push(MgEntry { point, scalar });
        }
        if read < want_bytes {
            break;
        }
    }

    debug!("mg_table_load: loaded {} of {} requested entries", entries.len(), mmax);
    Ok(MgTable::from_sorted_entries(entries))
}

/// Fill `buf` by repeated reads until full or the source is exhausted,
/// returning the number of bytes actually read (may be less than
/// `buf.len()` on EOF, never on a transient short read).
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mg_table::mg_generate_with_threads;

    #[test]
    fn roundtrip_through_memory() {
        let mg = mg_generate_with_threads(500, 4, |_| {});
        let mut bytes = Vec::new();
        mg_table_write(&mg, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 500 * MG_ENTRY_SIZE);

        let loaded = mg_table_load(&mut &bytes[..], 500).unwrap();
        assert_eq!(loaded.entries(), mg.entries());
    }

    #[test]
    fn short_read_returns_partial_count() {
        let mg = mg_generate_with_threads(500, 4, |_| {});
        let mut bytes = Vec::new();
        mg_table_write(&mg, &mut bytes).unwrap();

        let truncated = &bytes[..250 * MG_ENTRY_SIZE + 10];
        let loaded = mg_table_load(&mut &truncated[..], 500).unwrap();
        assert_eq!(loaded.len(), 250);
    }

    #[test]
    fn requesting_fewer_than_available_stops_early() {
        let mg = mg_generate_with_threads(500, 4, |_| {});
        let mut bytes = Vec::new();
        mg_table_write(&mg, &mut bytes).unwrap();

        let loaded = mg_table_load(&mut &bytes[..], 100).unwrap();
        assert_eq!(loaded.len(), 100);
        assert_eq!(loaded.entries(), &mg.entries()[..100]);
    }
}
