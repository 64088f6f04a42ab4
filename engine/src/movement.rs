//! Movement is decomposed into three orthogonal channels, matching §4.1:
//! slides, leaps, and tagged specials. Modeling movement as a tagged sum
//! with one variant per special avoids a piece class hierarchy; piece types
//! stay plain data (§9 "Dynamic dispatch over movement tags").

use strum_macros::EnumIter;

/// One of the three fixed slide families. A slide continues through empty
/// squares until it hits the first non-empty square (§4.1).
#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumIter)]
#[must_use]
pub enum SlideSet {
    Orthogonal,
    Diagonal,
    All,
}

pub const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ALL_DIRS: [(i8, i8); 8] =
    [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];

impl SlideSet {
    pub fn directions(self) -> &'static [(i8, i8)] {
        match self {
            SlideSet::Orthogonal => &ORTHOGONAL_DIRS,
            SlideSet::Diagonal => &DIAGONAL_DIRS,
            SlideSet::All => &ALL_DIRS,
        }
    }
}

/// A leap offset set. Symmetric expands `(df, dr)` to all 8
/// reflections/rotations — for `(2, 1)` that's the knight's 8 destinations.
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct Leap {
    pub offsets: Vec<(i8, i8)>,
    pub symmetric: bool,
}

impl Leap {
    pub fn symmetric(df: i8, dr: i8) -> Self {
        Self { offsets: vec![(df, dr)], symmetric: true }
    }

    pub fn fixed(offsets: Vec<(i8, i8)>) -> Self {
        Self { offsets, symmetric: false }
    }

    /// All concrete offsets this leap set produces, after applying symmetry.
    pub fn expand(&self) -> Vec<(i8, i8)> {
        if !self.symmetric {
            return self.offsets.clone();
        }
        let mut out = Vec::new();
        for &(df, dr) in &self.offsets {
            for &(sf, sr) in &[(1i8, 1i8), (1, -1), (-1, 1), (-1, -1)] {
                out.push((df * sf, dr * sr));
                out.push((dr * sf, df * sr));
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// A tagged special movement behavior. Each tag is a fixed algorithm
/// implemented in `crate::move::generate` (§4.2).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum SpecialTag {
    PawnForward,
    PawnCaptureDiagonal,
    ShogiPawn,
    PeasantDiagonal,
    PeasantCaptureForward,
    KingOneSquare,
    SwapAdjacent,
    RegentConditional,
    HeraldOrthogonal,
    Bounce,
    LongLeap,
    Chameleon,
    Grasshopper,
    CannonMove,
    /// Non-displacement capturers: each generates a non-capturing queen
    /// slide as its base movement, plus its own geometry-specific bonus
    /// capture (§4.2, §4.3).
    Coordinator,
    Boxer,
    Withdrawer,
    Thief,
    /// A leap vector repeated along its own direction until blocked, e.g. a
    /// nightrider repeating the knight vector `(1, 2)`.
    Nightrider { offset: (i8, i8) },
}

/// The full movement description of a piece type: any number of slide
/// families, leap sets, and specials, unioned together by the move
/// generator (§4.2: "unions the results of the channels").
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Movement {
    pub slides: Vec<SlideSet>,
    pub leaps: Vec<Leap>,
    pub specials: Vec<SpecialTag>,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slide(mut self, slide: SlideSet) -> Self {
        self.slides.push(slide);
        self
    }

    pub fn with_leap(mut self, leap: Leap) -> Self {
        self.leaps.push(leap);
        self
    }

    pub fn with_special(mut self, tag: SpecialTag) -> Self {
        self.specials.push(tag);
        self
    }

    pub fn has_special(&self, tag: SpecialTag) -> bool {
        self.specials.contains(&tag)
    }

    /// §4.5 promotion eligibility: "pawn-forward, shogi-pawn, peasant-diagonal,
    /// or berolina" — berolina is simply the peasant-diagonal/peasant-capture-forward
    /// pairing's common name, not a fourth distinct tag.
    pub fn is_pawn_like(&self) -> bool {
        self.has_special(SpecialTag::PawnForward)
            || self.has_special(SpecialTag::ShogiPawn)
            || self.has_special(SpecialTag::PeasantDiagonal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_leap_expands_to_eight_destinations() {
        let leap = Leap::symmetric(1, 2);
        let mut expanded = leap.expand();
        expanded.sort_unstable();
        assert_eq!(expanded.len(), 8);
        assert!(expanded.contains(&(1, 2)));
        assert!(expanded.contains(&(-2, 1)));
    }

    #[test]
    fn ferz_leap_expands_to_four_destinations() {
        let leap = Leap::symmetric(1, 1);
        let expanded = leap.expand();
        assert_eq!(expanded.len(), 4);
    }
}
