//! Display view over the live notes of one board.
//!
//! Notes are filtered to the board, then to those whose content contains the
//! search text (case-insensitive), then sorted. Sorting is stable, so notes
//! that compare equal keep their storage order.

use super::SortOrder;
use crate::entity::Note;

/// Filter and sort `notes` for display on `board_id`.
pub fn visible_notes<'a>(
    notes: &'a [Note],
    board_id: &str,
    search: &str,
    order: SortOrder,
) -> Vec<&'a Note> {
    let needle = search.to_lowercase();
    let mut visible: Vec<&Note> = notes
        .iter()
        .filter(|n| n.board_id == board_id)
        .filter(|n| needle.is_empty() || n.content.to_lowercase().contains(&needle))
        .collect();

    sort_notes(&mut visible, order);
    visible
}

pub fn sort_notes(notes: &mut [&Note], order: SortOrder) {
    match order {
        SortOrder::Newest => notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => notes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Content => notes.sort_by(|a, b| a.content.cmp(&b.content)),
    }
}
