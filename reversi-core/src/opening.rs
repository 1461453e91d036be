//! Opening move selection without search
//!
//! While the board is still sparse the branching factor is high and the
//! positional table says little, so moves are picked by square class alone:
//! corners first, then safe edges, then anything else. Ties within the best
//! class are broken with the caller's random source.

use crate::board::{Move, SquareClass};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick a random move from the highest-priority class present in `moves`.
/// Returns None only for an empty slice.
pub fn opening_move<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
    let (corners, edges, others) = classify_moves(moves);

    let tier = [corners, edges, others]
        .into_iter()
        .find(|tier| !tier.is_empty())?;

    tier.choose(rng).copied()
}

/// Split moves into (corner, edge, other) tiers, preserving input order
pub fn classify_moves(moves: &[Move]) -> (Vec<Move>, Vec<Move>, Vec<Move>) {
    let mut corners = Vec::new();
    let mut edges = Vec::new();
    let mut others = Vec::new();

    for &mv in moves {
        match mv.class() {
            SquareClass::Corner => corners.push(mv),
            SquareClass::Edge => edges.push(mv),
            SquareClass::Other => others.push(mv),
        }
    }

    (corners, edges, others)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(opening_move(&[], &mut rng), None);
    }

    #[test]
    fn test_corner_always_wins() {
        let moves = [
            Move::new(0, 3),
            Move::new(2, 2),
            Move::new(7, 7),
            Move::new(0, 1),
            Move::new(0, 0),
        ];

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mv = opening_move(&moves, &mut rng).unwrap();
            assert_eq!(mv.class(), SquareClass::Corner, "seed {} picked {}", seed, mv);
        }
    }

    #[test]
    fn test_edge_beats_other() {
        // (0,1) sits beside a corner, so only (0,3) counts as an edge
        let moves = [Move::new(0, 1), Move::new(2, 3), Move::new(0, 3), Move::new(1, 1)];

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(opening_move(&moves, &mut rng), Some(Move::new(0, 3)));
        }
    }

    #[test]
    fn test_falls_back_to_other() {
        let moves = [Move::new(2, 3), Move::new(3, 2), Move::new(4, 5), Move::new(5, 4)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mv = opening_move(&moves, &mut rng).unwrap();
        assert!(moves.contains(&mv));
    }

    #[test]
    fn test_same_seed_same_choice() {
        let moves = [Move::new(2, 3), Move::new(3, 2), Move::new(4, 5), Move::new(5, 4)];
        let a = opening_move(&moves, &mut ChaCha8Rng::seed_from_u64(99));
        let b = opening_move(&moves, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_stream_picks_exact_move() {
        use rand::rngs::mock::StepRng;

        // Four "other" squares; a u32 draw of k * 2^30 maps to index k
        let moves = [Move::new(2, 3), Move::new(3, 2), Move::new(4, 5), Move::new(5, 4)];

        assert_eq!(opening_move(&moves, &mut StepRng::new(0, 0)), Some(Move::new(2, 3)));
        assert_eq!(opening_move(&moves, &mut StepRng::new(1 << 30, 0)), Some(Move::new(3, 2)));
        assert_eq!(opening_move(&moves, &mut StepRng::new(2 << 30, 0)), Some(Move::new(4, 5)));
        assert_eq!(opening_move(&moves, &mut StepRng::new(3 << 30, 0)), Some(Move::new(5, 4)));

        // Only the two corners are drawn from; 2^31 selects the second
        let with_corners = [Move::new(0, 2), Move::new(0, 7), Move::new(3, 3), Move::new(7, 0)];
        assert_eq!(
            opening_move(&with_corners, &mut StepRng::new(1 << 31, 0)),
            Some(Move::new(7, 0))
        );
    }

    #[test]
    fn test_every_move_in_tier_reachable() {
        let moves = [Move::new(2, 3), Move::new(3, 2), Move::new(4, 5), Move::new(5, 4)];
        let mut seen = std::collections::HashSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..200 {
            seen.insert(opening_move(&moves, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), moves.len());
    }

    #[test]
    fn test_classify_moves_keeps_order() {
        let moves = [
            Move::new(0, 7),
            Move::new(0, 2),
            Move::new(3, 3),
            Move::new(0, 0),
            Move::new(7, 4),
        ];
        let (corners, edges, others) = classify_moves(&moves);
        assert_eq!(corners, vec![Move::new(0, 7), Move::new(0, 0)]);
        assert_eq!(edges, vec![Move::new(0, 2), Move::new(7, 4)]);
        assert_eq!(others, vec![Move::new(3, 3)]);
    }
}
