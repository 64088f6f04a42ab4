//! The Piece Catalog (§4.1): an immutable, read-only registry of piece
//! types, indexed by [`PieceTypeId`]. Mirrors the host project's convention
//! of a single `Vec<Piece>` built once by composing small builder
//! functions, rather than one struct-literal per piece.

use crate::movement::{Leap, Movement, SlideSet, SpecialTag};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[must_use]
pub struct PieceTypeId(pub u16);

impl Display for PieceTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum Tier {
    Pawn,
    Piece,
    Royalty,
    Other,
}

/// Standard denotes displacement capture; every other variant is a
/// non-displacement capture kind (§3).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum CaptureKind {
    Standard,
    Withdrawal,
    Coordinator,
    Boxer,
    Thief,
    LongLeap,
    Chameleon,
    Cannon,
    None,
}

impl CaptureKind {
    /// "Displacement-capable ⇔ captureType = standard" (§4.2).
    pub fn is_displacement(self) -> bool {
        matches!(self, CaptureKind::Standard)
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct PieceTypeDef {
    pub id: PieceTypeId,
    pub name: &'static str,
    pub ascii: char,
    pub tier: Tier,
    pub cost: i32,
    pub victory_points: i32,
    pub is_royal: bool,
    pub is_mandatory: bool,
    pub replaces_king: bool,
    pub can_castle: bool,
    pub can_be_captured: bool,
    pub can_freeze: bool,
    pub can_be_jumped_over: bool,
    pub movement: Movement,
    pub capture_type: CaptureKind,
}

impl PieceTypeDef {
    fn base(id: u16, name: &'static str, ascii: char, tier: Tier, cost: i32, vp: i32) -> Self {
        Self {
            id: PieceTypeId(id),
            name,
            ascii,
            tier,
            cost,
            victory_points: vp,
            is_royal: false,
            is_mandatory: false,
            replaces_king: false,
            can_castle: false,
            can_be_captured: true,
            can_freeze: false,
            can_be_jumped_over: true,
            movement: Movement::new(),
            capture_type: CaptureKind::Standard,
        }
    }
}

/// The read-only piece registry for one game. Shared freely (§5 "The Piece
/// Catalog is immutable and freely shared").
#[derive(Debug, Clone)]
#[must_use]
pub struct Catalog {
    pieces: Vec<PieceTypeDef>,
}

impl Catalog {
    pub fn get(&self, id: PieceTypeId) -> &PieceTypeDef {
        &self.pieces[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceTypeDef> {
        self.pieces.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&PieceTypeDef> {
        self.pieces.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn king_id(&self) -> PieceTypeId {
        self.pieces.iter().find(|p| p.is_mandatory).expect("catalog always has a mandatory King").id
    }

    pub fn king_replacers(&self) -> impl Iterator<Item = &PieceTypeDef> {
        self.pieces.iter().filter(|p| p.replaces_king)
    }

    /// The standard draftable army, grounded on classic chess + the set of
    /// Ultima-style non-displacement capturers and the variant's own
    /// bespoke royalty/edge pieces named throughout §4.
    pub fn standard() -> Self {
        let mut pieces = Vec::new();
        let mut next_id = 0u16;
        let mut push = |def: PieceTypeDef| {
            pieces.push(def);
        };

        macro_rules! next {
            () => {{
                let id = next_id;
                next_id += 1;
                id
            }};
        }

        // King — the mandatory royal.
        push({
            let mut p = PieceTypeDef::base(next!(), "King", 'K', Tier::Royalty, 0, 0);
            p.is_royal = true;
            p.is_mandatory = true;
            p.can_castle = true;
            p.movement = Movement::new().with_special(SpecialTag::KingOneSquare);
            p
        });

        // Queen, Rook, Bishop, Knight, Pawn — the classical pieces.
        push({
            let mut p = PieceTypeDef::base(next!(), "Queen", 'Q', Tier::Piece, 90, 9);
            p.movement = Movement::new().with_slide(SlideSet::All);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Rook", 'R', Tier::Piece, 50, 5);
            p.movement = Movement::new().with_slide(SlideSet::Orthogonal);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Bishop", 'B', Tier::Piece, 30, 3);
            p.movement = Movement::new().with_slide(SlideSet::Diagonal);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Knight", 'N', Tier::Piece, 30, 3);
            p.movement = Movement::new().with_leap(Leap::symmetric(1, 2));
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Pawn", 'P', Tier::Pawn, 10, 1);
            p.movement =
                Movement::new().with_special(SpecialTag::PawnForward).with_special(SpecialTag::PawnCaptureDiagonal);
            p
        });

        // Herald — edge-file, pawn-rank royalty partner; cannot capture.
        push({
            let mut p = PieceTypeDef::base(next!(), "Herald", 'H', Tier::Royalty, 40, 2);
            p.can_castle = true;
            p.capture_type = CaptureKind::None;
            p.movement = Movement::new().with_special(SpecialTag::HeraldOrthogonal);
            p
        });

        // Regent — conditional king-replacer.
        push({
            let mut p = PieceTypeDef::base(next!(), "Regent", 'E', Tier::Royalty, 70, 6);
            p.is_royal = true;
            p.replaces_king = true;
            p.movement = Movement::new().with_special(SpecialTag::RegentConditional);
            p
        });

        // Phantom King — king-replacer that swaps with adjacent friendlies.
        push({
            let mut p = PieceTypeDef::base(next!(), "Phantom King", 'F', Tier::Royalty, 60, 5);
            p.is_royal = true;
            p.replaces_king = true;
            p.movement = Movement::new().with_special(SpecialTag::SwapAdjacent);
            p
        });

        // Chamberlain — non-royal analogue of Phantom King's swap move.
        push({
            let mut p = PieceTypeDef::base(next!(), "Chamberlain", 'C', Tier::Piece, 20, 2);
            p.movement = Movement::new().with_special(SpecialTag::SwapAdjacent);
            p
        });

        // Non-displacement capturers.
        push({
            let mut p = PieceTypeDef::base(next!(), "Coordinator", 'O', Tier::Piece, 50, 5);
            p.capture_type = CaptureKind::Coordinator;
            p.movement = Movement::new().with_special(SpecialTag::Coordinator);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Boxer", 'X', Tier::Piece, 40, 4);
            p.capture_type = CaptureKind::Boxer;
            p.movement = Movement::new().with_special(SpecialTag::Boxer);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Withdrawer", 'W', Tier::Piece, 40, 4);
            p.capture_type = CaptureKind::Withdrawal;
            p.movement = Movement::new().with_special(SpecialTag::Withdrawer);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Thief", 'T', Tier::Piece, 30, 3);
            p.capture_type = CaptureKind::Thief;
            p.movement = Movement::new().with_special(SpecialTag::Thief);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Long-Leaper", 'L', Tier::Piece, 60, 6);
            p.capture_type = CaptureKind::LongLeap;
            p.movement = Movement::new().with_special(SpecialTag::LongLeap);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Cannon", 'A', Tier::Piece, 40, 4);
            p.capture_type = CaptureKind::Cannon;
            p.movement = Movement::new().with_special(SpecialTag::CannonMove);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Chameleon", 'M', Tier::Piece, 80, 7);
            p.capture_type = CaptureKind::Chameleon;
            p.movement = Movement::new().with_special(SpecialTag::Chameleon);
            p
        });

        // Worthless / freezer pieces.
        push({
            let mut p = PieceTypeDef::base(next!(), "Fool", 'U', Tier::Other, 5, 0);
            p.can_be_captured = false;
            p.can_be_jumped_over = false;
            p.movement = Movement::new().with_leap(Leap::symmetric(1, 0)).with_leap(Leap::symmetric(1, 1));
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Jester", 'J', Tier::Other, 5, -15);
            p.can_be_captured = false;
            p.movement = Movement::new().with_leap(Leap::symmetric(1, 0)).with_leap(Leap::symmetric(1, 1));
            p
        });

        // Freeze-aura piece.
        push({
            let mut p = PieceTypeDef::base(next!(), "Warden", 'D', Tier::Piece, 35, 3);
            p.can_freeze = true;
            p.movement = Movement::new().with_leap(Leap::symmetric(1, 0)).with_leap(Leap::symmetric(1, 1));
            p
        });

        // Pontiff — bouncing diagonal slider.
        push({
            let mut p = PieceTypeDef::base(next!(), "Pontiff", 'I', Tier::Piece, 45, 4);
            p.movement = Movement::new().with_special(SpecialTag::Bounce);
            p
        });

        // Demonstrate the remaining primitives named in §4.1/§4.2 with
        // concrete draftable pieces.
        push({
            let mut p = PieceTypeDef::base(next!(), "Nightrider", 'Y', Tier::Piece, 50, 5);
            p.movement = Movement::new().with_special(SpecialTag::Nightrider { offset: (1, 2) });
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Grasshopper", 'G', Tier::Piece, 30, 3);
            p.movement = Movement::new().with_special(SpecialTag::Grasshopper);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Berolina Pawn", 'Z', Tier::Pawn, 10, 1);
            p.movement = Movement::new()
                .with_special(SpecialTag::PeasantDiagonal)
                .with_special(SpecialTag::PeasantCaptureForward);
            p
        });
        push({
            let mut p = PieceTypeDef::base(next!(), "Foot Soldier", 'S', Tier::Pawn, 10, 1);
            p.movement = Movement::new().with_special(SpecialTag::ShogiPawn);
            p
        });

        let _ = next_id;
        Catalog { pieces }
    }

    /// Promotion targets reachable from pieces currently on the board,
    /// filtered per §4.5, falling back to {Queen, Rook, Bishop, Knight} if
    /// empty. `on_board` yields the set of piece type ids present on the
    /// board right now.
    pub fn promotion_options(&self, on_board: impl Iterator<Item = PieceTypeId>, is_fool: bool) -> Vec<PieceTypeId> {
        if is_fool {
            return self.by_name("Jester").map(|p| vec![p.id]).unwrap_or_default();
        }
        let mut seen = std::collections::BTreeSet::new();
        for id in on_board {
            let def = self.get(id);
            if def.tier != Tier::Pawn
                && !def.is_mandatory
                && !def.replaces_king
                && !matches!(def.capture_type, CaptureKind::None)
            {
                seen.insert(id);
            }
        }
        if seen.is_empty() {
            return ["Queen", "Rook", "Bishop", "Knight"]
                .iter()
                .filter_map(|n| self.by_name(n).map(|p| p.id))
                .collect();
        }
        seen.into_iter().collect()
    }
}
