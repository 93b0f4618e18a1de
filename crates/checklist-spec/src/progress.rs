use serde::Serialize;

use crate::levels::RatingScale;
use crate::selection::SelectionEntry;

/// Counters over a resolved selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub rated: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(entries: &[SelectionEntry], scale: &RatingScale) -> Self {
        Self {
            rated: entries
                .iter()
                .filter(|entry| !scale.is_default(&entry.rating))
                .count(),
            total: entries.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rated == self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Neighbor of `from` in flat selection order; `None` past either end.
pub fn step(len: usize, from: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Next => from.checked_add(1).filter(|next| *next < len),
        Direction::Previous => from.checked_sub(1).filter(|prev| *prev < len),
    }
}

/// First entry still at the default rating, searching after `after` (or from the start).
pub fn next_unrated(
    entries: &[SelectionEntry],
    scale: &RatingScale,
    after: Option<usize>,
) -> Option<usize> {
    let start = after.map_or(0, |idx| idx + 1);
    entries
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, entry)| scale.is_default(&entry.rating))
        .map(|(idx, _)| idx)
}
