//! Linear undo/redo over full paint layer snapshots.

use crate::raster::RasterBuffer;

#[derive(Debug, Default)]
pub struct History {
    /// Snapshots in the order they were taken
    entries: Vec<RasterBuffer>,
    /// Index of the entry matching the live paint layer, `None` before the
    /// first snapshot
    cursor: Option<usize>,
    /// Maximum number of entries kept, oldest dropped first
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        }
    }

    /// Record the state after a completed edit. Entries after the cursor
    /// are discarded first.
    pub fn snapshot(&mut self, paint: &RasterBuffer) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            log::debug!("Discarding {} redo entries", self.entries.len() - keep);
            self.entries.truncate(keep);
        }

        self.entries.push(paint.clone());

        if let Some(limit) = self.limit
            && self.entries.len() > limit
        {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
        }

        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry and return the state to restore
    pub fn undo(&mut self) -> Option<&RasterBuffer> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1)
            }
            _ => None,
        }
    }

    /// Step forward one entry and return the state to restore
    pub fn redo(&mut self) -> Option<&RasterBuffer> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.entries.get(c + 1)
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Drop every entry (e.g. when a new image is loaded)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of undo steps available (for UI display)
    pub fn undo_count(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    /// Number of redo steps available (for UI display)
    pub fn redo_count(&self) -> usize {
        match self.cursor {
            Some(c) => self.entries.len() - c - 1,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn marked(value: u8) -> RasterBuffer {
        let mut buf = RasterBuffer::new(2, 2);
        buf.set_pixel(0, 0, Rgba([value, 0, 0, 255]));
        buf
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn test_snapshot_after_undo_truncates() {
        let mut history = History::new();
        history.snapshot(&marked(0));
        history.snapshot(&marked(1));
        history.snapshot(&marked(2));

        assert_eq!(history.undo(), Some(&marked(1)));
        history.snapshot(&marked(9));

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.undo(), Some(&marked(1)));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(Some(2));
        history.snapshot(&marked(0));
        history.snapshot(&marked(1));
        history.snapshot(&marked(2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.undo(), Some(&marked(1)));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_counts() {
        let mut history = History::new();
        history.snapshot(&marked(0));
        history.snapshot(&marked(1));
        history.snapshot(&marked(2));
        history.undo();

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 1);
    }
}
