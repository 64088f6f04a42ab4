//! Draft Logic (§4.8): validates a completed draft against budget and slot
//! caps. Selection operations mutate a running draft incrementally; only
//! final submission runs the authoritative validation in [`validate`].

use crate::catalog::{Catalog, PieceTypeId, Tier};
use crate::error::DraftRejection;
use crate::game::BoardSize;

const HERALD_CAP: u32 = 2;

#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct DraftSelection {
    pub type_id: PieceTypeId,
    pub count: u32,
}

#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PlayerDraft {
    pub selections: Vec<DraftSelection>,
}

impl PlayerDraft {
    pub fn add(&mut self, type_id: PieceTypeId, count: u32) {
        if let Some(existing) = self.selections.iter_mut().find(|s| s.type_id == type_id) {
            existing.count += count;
        } else {
            self.selections.push(DraftSelection { type_id, count });
        }
    }

    /// Removes `count` copies of `type_id`, dropping the selection entirely
    /// once it reaches zero. A no-op if `type_id` isn't selected.
    pub fn remove(&mut self, type_id: PieceTypeId, count: u32) {
        if let Some(existing) = self.selections.iter_mut().find(|s| s.type_id == type_id) {
            existing.count = existing.count.saturating_sub(count);
        }
        self.selections.retain(|s| s.count > 0);
    }

    pub fn budget_spent(&self, catalog: &Catalog) -> i32 {
        self.selections.iter().map(|s| catalog.get(s.type_id).cost * s.count as i32).sum()
    }

    /// (pawn, piece, royalty) slot counts, with royalty pre-incremented by
    /// 1 for the mandatory King unless a king-replacer was selected (the
    /// replacer occupies that same slot instead, §3).
    pub fn slots_used(&self, catalog: &Catalog) -> (u32, u32, u32) {
        let mut pawn = 0u32;
        let mut piece = 0u32;
        let mut royalty = 0u32;
        let mut has_replacer = false;
        for sel in &self.selections {
            let def = catalog.get(sel.type_id);
            match def.tier {
                Tier::Pawn => pawn += sel.count,
                Tier::Piece => piece += sel.count,
                Tier::Royalty => {
                    royalty += sel.count;
                    if def.replaces_king {
                        has_replacer = true;
                    }
                }
                Tier::Other => {}
            }
        }
        if !has_replacer {
            royalty += 1; // the mandatory King, never itself selected
        }
        (pawn, piece, royalty)
    }

    fn king_replacer_count(&self, catalog: &Catalog) -> u32 {
        self.selections.iter().filter(|s| catalog.get(s.type_id).replaces_king).map(|s| s.count).sum()
    }

    fn count_of(&self, type_id: PieceTypeId) -> u32 {
        self.selections.iter().find(|s| s.type_id == type_id).map(|s| s.count).unwrap_or(0)
    }
}

/// Authoritative validation: every violation is collected, not just the
/// first (§7 "a validation record with failure kinds enumerated").
pub fn validate(catalog: &Catalog, board_size: BoardSize, budget: i32, draft: &PlayerDraft) -> Vec<DraftRejection> {
    let mut rejections = Vec::new();

    for sel in &draft.selections {
        if sel.type_id.0 as usize >= catalog_len(catalog) {
            rejections.push(DraftRejection::UnknownPieceType { type_id: sel.type_id });
        }
    }
    if !rejections.is_empty() {
        // Unknown type ids make every other derived computation meaningless.
        return rejections;
    }

    let spent = draft.budget_spent(catalog);
    if spent > budget {
        rejections.push(DraftRejection::BudgetExceeded { spent, budget });
    }

    let (pawn_cap, piece_cap, royalty_cap) = board_size.slot_caps();
    let (pawn_used, piece_used, royalty_used) = draft.slots_used(catalog);
    if pawn_used > pawn_cap {
        rejections.push(DraftRejection::SlotCapExceeded { tier: Tier::Pawn, used: pawn_used, cap: pawn_cap });
    }
    if piece_used > piece_cap {
        rejections.push(DraftRejection::SlotCapExceeded { tier: Tier::Piece, used: piece_used, cap: piece_cap });
    }
    if royalty_used > royalty_cap {
        rejections.push(DraftRejection::SlotCapExceeded { tier: Tier::Royalty, used: royalty_used, cap: royalty_cap });
    }

    if draft.king_replacer_count(catalog) > 1 {
        rejections.push(DraftRejection::MultipleKingReplacers);
    }

    if let Some(herald) = catalog.by_name("Herald") {
        let used = draft.count_of(herald.id);
        if used > HERALD_CAP {
            rejections.push(DraftRejection::PerTypeCapExceeded { type_id: herald.id, used, cap: HERALD_CAP });
        }
    }

    rejections
}

fn catalog_len(catalog: &Catalog) -> usize {
    catalog.iter().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_army_is_within_budget_on_8x8() {
        let catalog = Catalog::standard();
        let mut draft = PlayerDraft::default();
        draft.add(catalog.by_name("Queen").unwrap().id, 1);
        draft.add(catalog.by_name("Rook").unwrap().id, 2);
        draft.add(catalog.by_name("Bishop").unwrap().id, 2);
        draft.add(catalog.by_name("Knight").unwrap().id, 2);
        draft.add(catalog.by_name("Pawn").unwrap().id, 8);
        assert!(validate(&catalog, BoardSize::Eight, 360, &draft).is_empty());
    }

    #[test]
    fn exceeding_budget_is_rejected() {
        let catalog = Catalog::standard();
        let mut draft = PlayerDraft::default();
        draft.add(catalog.by_name("Chameleon").unwrap().id, 5);
        let rejections = validate(&catalog, BoardSize::Eight, 260, &draft);
        assert!(rejections.iter().any(|r| matches!(r, DraftRejection::BudgetExceeded { .. })));
    }

    #[test]
    fn two_king_replacers_is_rejected() {
        let catalog = Catalog::standard();
        let mut draft = PlayerDraft::default();
        draft.add(catalog.by_name("Regent").unwrap().id, 1);
        draft.add(catalog.by_name("Phantom King").unwrap().id, 1);
        let rejections = validate(&catalog, BoardSize::Eight, 900, &draft);
        assert!(rejections.contains(&DraftRejection::MultipleKingReplacers));
    }
}
