//! The Board Model (§3/§4 "Board Model"): a flat piece array plus a derived
//! square→piece index, recomputed from the array after every mutation
//! rather than maintained as a second source of truth (§9 "Cloning cost").

use crate::catalog::PieceTypeId;
use crate::color::Side;
use crate::game::BoardSize;
use crate::position::Position;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[must_use]
pub struct PieceInstanceId(pub u32);

/// Mutable-over-game piece record (§3). `position = None` means captured or
/// not yet placed; once captured a piece never returns to the board.
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct PieceInstance {
    pub id: PieceInstanceId,
    pub type_id: PieceTypeId,
    pub owner: Side,
    pub position: Option<Position>,
    pub has_moved: bool,
    pub is_frozen: bool,
}

#[derive(Debug, Clone)]
#[must_use]
pub struct Board {
    pub size: BoardSize,
    pieces: Vec<PieceInstance>,
    index: HashMap<Position, PieceInstanceId>,
    /// Frozen at placement completion (§3); used by Regent movement.
    pub had_multiple_royals: [bool; 2],
}

impl Board {
    pub fn empty(size: BoardSize) -> Self {
        Self { size, pieces: Vec::new(), index: HashMap::new(), had_multiple_royals: [false, false] }
    }

    pub fn pieces(&self) -> &[PieceInstance] {
        &self.pieces
    }

    pub fn add_piece(&mut self, piece: PieceInstance) {
        if let Some(pos) = piece.position {
            self.index.insert(pos, piece.id);
        }
        self.pieces.push(piece);
    }

    pub fn piece(&self, id: PieceInstanceId) -> &PieceInstance {
        self.pieces.iter().find(|p| p.id == id).expect("piece id always refers to a piece in this board")
    }

    pub fn piece_mut(&mut self, id: PieceInstanceId) -> &mut PieceInstance {
        self.pieces.iter_mut().find(|p| p.id == id).expect("piece id always refers to a piece in this board")
    }

    pub fn at(&self, pos: Position) -> Option<&PieceInstance> {
        self.index.get(&pos).map(|id| self.piece(*id))
    }

    pub fn occupant_id(&self, pos: Position) -> Option<PieceInstanceId> {
        self.index.get(&pos).copied()
    }

    pub fn on_board(&self) -> impl Iterator<Item = &PieceInstance> {
        self.pieces.iter().filter(|p| p.position.is_some())
    }

    pub fn on_board_for(&self, side: Side) -> impl Iterator<Item = &PieceInstance> {
        self.on_board().filter(move |p| p.owner == side)
    }

    pub fn royal_of(&self, side: Side, catalog: &crate::catalog::Catalog) -> Option<&PieceInstance> {
        self.on_board_for(side).find(|p| catalog.get(p.type_id).is_royal)
    }

    /// Removes the piece at `id` from the board (sets its position to
    /// `None`), per Move Executor step 2. Never deletes the instance — it
    /// stays in `pieces` as a captured record.
    pub fn remove(&mut self, id: PieceInstanceId) {
        let pos = self.piece(id).position;
        if let Some(pos) = pos {
            self.index.remove(&pos);
        }
        self.piece_mut(id).position = None;
    }

    /// Moves `id` to `dest`, marking it moved. Caller is responsible for
    /// having cleared any occupant of `dest` first.
    pub fn relocate(&mut self, id: PieceInstanceId, dest: Position) {
        if let Some(old) = self.piece(id).position {
            self.index.remove(&old);
        }
        self.index.insert(dest, id);
        let piece = self.piece_mut(id);
        piece.position = Some(dest);
        piece.has_moved = true;
    }

    /// Recomputes the index from the piece array from scratch. Used after
    /// batched mutations (executor step 7) to keep a single source of
    /// truth, per §9.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for p in &self.pieces {
            if let Some(pos) = p.position {
                self.index.insert(pos, p.id);
            }
        }
    }

    /// §8 universal invariant: the index is exactly the map from
    /// non-null-positioned pieces to their square, and no other key maps to
    /// any piece.
    #[cfg(any(test, feature = "invariant-checks"))]
    pub fn index_is_consistent(&self) -> bool {
        let expected: HashMap<Position, PieceInstanceId> =
            self.pieces.iter().filter_map(|p| p.position.map(|pos| (pos, p.id))).collect();
        expected == self.index
    }
}
