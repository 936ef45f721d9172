use atomic_float::AtomicF32;
use std::sync::{atomic::Ordering, Arc};

/// One per-tick sequence of normalized analysis values.
///
/// Cells are individually atomic: the tap side stores a single index per
/// tick while consumers read the whole table concurrently. That keeps the
/// single-writer, single-index mutation policy of the analysis path free of
/// torn reads without any locking. Handles are cheap clones over shared
/// storage.
#[derive(Clone)]
pub struct ResultTable {
    cells: Arc<[AtomicF32]>,
}

impl ResultTable {
    pub(crate) fn new(len: usize, initial: f32) -> Self {
        Self {
            cells: (0..len).map(|_| AtomicF32::new(initial)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Store a value at a tick index. An out-of-range index is dropped
    /// silently: a timeline shorter than the playback position is a normal
    /// consequence of asynchronous length changes, not an error.
    pub(crate) fn set(&self, index: usize, value: f32) {
        if let Some(cell) = self.cells.get(index) {
            cell.store(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.cells.get(index).map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Copy of the whole table, for rendering a full graph pass.
    pub fn snapshot(&self) -> Vec<f32> {
        self.cells.iter().map(|cell| cell.load(Ordering::Relaxed)).collect()
    }
}

/// The six per-tick result tables produced by the analyzer.
///
/// Energy and volume tables start at 0; balance starts centered and
/// correlation starts at "in phase", matching an idle meter.
#[derive(Clone)]
pub struct ResultTables {
    pub low: ResultTable,
    pub mid: ResultTable,
    pub high: ResultTable,
    pub volume: ResultTable,
    pub balance: ResultTable,
    pub correlation: ResultTable,
}

impl ResultTables {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            low: ResultTable::new(len, 0.0),
            mid: ResultTable::new(len, 0.0),
            high: ResultTable::new(len, 0.0),
            volume: ResultTable::new(len, 0.0),
            balance: ResultTable::new(len, 0.5),
            correlation: ResultTable::new(len, 1.0),
        }
    }

    /// Timeline length in ticks (all six tables share it).
    pub fn len(&self) -> usize {
        self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_roundtrips() {
        let table = ResultTable::new(8, 0.0);
        table.set(3, 0.75);
        assert_eq!(table.get(3), Some(0.75));
        assert_eq!(table.get(2), Some(0.0));
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let table = ResultTable::new(4, 0.0);
        table.set(4, 1.0);
        table.set(1000, 1.0);
        assert!(table.snapshot().iter().all(|&v| v == 0.0));
        assert_eq!(table.get(1000), None);
    }

    #[test]
    fn clones_share_storage() {
        let table = ResultTable::new(4, 0.0);
        let reader = table.clone();
        table.set(0, 0.25);
        assert_eq!(reader.get(0), Some(0.25));
    }

    #[test]
    fn idle_defaults_match_idle_meters() {
        let tables = ResultTables::new(3);
        assert_eq!(tables.volume.get(0), Some(0.0));
        assert_eq!(tables.balance.get(0), Some(0.5));
        assert_eq!(tables.correlation.get(0), Some(1.0));
    }

    #[test]
    fn zero_length_timeline_is_valid() {
        let tables = ResultTables::new(0);
        assert!(tables.is_empty());
        tables.volume.set(0, 1.0);
        assert_eq!(tables.volume.get(0), None);
    }
}
