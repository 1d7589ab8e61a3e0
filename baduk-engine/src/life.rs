//! Unconditional life: which chains can never be captured, no matter how
//! the opponent plays. Benson's fixpoint over the chain partition.

use std::collections::HashSet;

use crate::board::Board;
use crate::chains::ChainId;
use crate::stone::Stone;
use crate::Point;

/// The unconditionally alive chains of `stone`, as normalized member lists.
///
/// Fixpoint over X (candidate chains, initially all of the color's chains)
/// and R (candidate regions, initially all empty regions):
///
/// 1. drop from X every chain with fewer than two vital regions in R,
/// 2. drop from R every region containing a cell that borders a stone whose
///    chain is not in X,
///
/// repeated until neither set shrinks or X is empty. A region is vital to a
/// chain when every one of its cells is a liberty of that chain.
pub fn unconditionally_alive(board: &Board, stone: Stone) -> Vec<Vec<Point>> {
    let chains = board.chains();
    let mut x: HashSet<ChainId> = chains.ids_of(stone).into_iter().collect();
    let mut r: HashSet<ChainId> = chains.empty_ids().into_iter().collect();

    loop {
        let before = (x.len(), r.len());
        x.retain(|&chain| {
            let vital = r.iter().filter(|&&region| is_vital(board, region, chain)).count();
            vital >= 2
        });
        r.retain(|&region| region_enclosed(board, region, &x));
        if x.is_empty() || (x.len(), r.len()) == before {
            break;
        }
    }

    let mut alive: Vec<Vec<Point>> = x
        .into_iter()
        .map(|id| {
            let mut points = chains.chain(id).points.clone();
            points.sort_unstable();
            points
        })
        .collect();
    alive.sort();
    alive
}

/// Every cell of the region is a liberty of `chain`.
fn is_vital(board: &Board, region: ChainId, chain: ChainId) -> bool {
    let chains = board.chains();
    chains
        .chain(region)
        .points
        .iter()
        .all(|&p| chains.neighbors(p).iter().any(|&n| chains.id_at(n) == chain))
}

/// No cell of the region borders a stone outside the candidate set.
fn region_enclosed(board: &Board, region: ChainId, x: &HashSet<ChainId>) -> bool {
    let chains = board.chains();
    chains.chain(region).points.iter().all(|&p| {
        chains.neighbors(p).iter().all(|&n| {
            let id = chains.id_at(n);
            chains.chain(id).stone.is_none() || x.contains(&id)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    /// Build a board from an ASCII layout, top row first.
    /// 'X' = Black, 'O' = White, anything else empty.
    fn board_from_layout(layout: &[&str]) -> Board {
        let size = layout.len() as u8;
        let mut board = Board::new(size);
        for (r, row) in layout.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let point = (c as u8 + 1, size - r as u8);
                match ch {
                    'X' => board.set_stone(point, Stone::Black).unwrap(),
                    'O' => board.set_stone(point, Stone::White).unwrap(),
                    _ => {}
                }
            }
        }
        board
    }

    #[test]
    fn empty_board_has_no_life() {
        let board = Board::new(5);
        assert!(unconditionally_alive(&board, Stone::Black).is_empty());
        assert!(unconditionally_alive(&board, Stone::White).is_empty());
    }

    #[test]
    fn one_eye_is_not_enough() {
        // Black surrounds a single eye at (1,1); the outside is open, but
        // the group still has only one vital region fully its own
        let board = board_from_layout(&[
            ".....", //
            ".....",
            "XX...",
            ".X...",
            "X.X..",
        ]);
        // wide-open regions are dropped once bordered by nothing in X;
        // a single enclosed eye leaves the chain short of two
        assert!(unconditionally_alive(&board, Stone::Black).is_empty());
    }

    #[test]
    fn two_eyes_live() {
        // Black column with two one-point eyes at (1,1) and (1,3)
        let board = board_from_layout(&[
            "XXX..", //
            ".X...",
            "XX...",
            ".X...",
            "XX...",
        ]);
        let alive = unconditionally_alive(&board, Stone::Black);
        assert_eq!(alive.len(), 1);
        assert!(alive[0].contains(&(2, 3)));
        assert!(unconditionally_alive(&board, Stone::White).is_empty());
    }

    #[test]
    fn false_eye_region_is_pruned() {
        // same shape, but a White stone inside one eye: the region now
        // borders a chain outside X and stops counting as vital
        let board = board_from_layout(&[
            "XXX..", //
            "OX...",
            "XX...",
            ".X...",
            "XX...",
        ]);
        assert!(unconditionally_alive(&board, Stone::Black).is_empty());
    }

    #[test]
    fn opposing_walls_both_live() {
        // the original's life-and-death layout: a Black wall along the top,
        // a White wall along the bottom, each with two enclosed eye points
        let board = board_from_layout(&[
            "X.X..", //
            "XXXXX",
            "....O",
            "OOOOO",
            ".O...",
        ]);
        let black = unconditionally_alive(&board, Stone::Black);
        assert_eq!(black.len(), 1);
        assert_eq!(black[0].len(), 7);

        let white = unconditionally_alive(&board, Stone::White);
        assert_eq!(white.len(), 1);
        assert_eq!(white[0].len(), 7);
    }
}
