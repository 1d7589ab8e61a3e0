//! Territory scoring: per-group enclosed points plus capture credit.

use std::collections::HashSet;

use serde::Serialize;

use crate::board::Board;
use crate::stone::Stone;
use crate::Point;

/// Row/column extent of a set of stones.
struct Extent {
    left: u8,
    right: u8,
    bottom: u8,
    top: u8,
}

fn extent(points: &[Point]) -> Extent {
    let left = points.iter().map(|p| p.0).min().expect("extent of no points");
    let right = points.iter().map(|p| p.0).max().expect("extent of no points");
    let bottom = points.iter().map(|p| p.1).min().expect("extent of no points");
    let top = points.iter().map(|p| p.1).max().expect("extent of no points");
    Extent {
        left,
        right,
        bottom,
        top,
    }
}

/// Empty points enclosed by `group`.
///
/// A point inside the group's row/column extent counts when a group stone
/// bounds it in all four axial directions (the board edge substitutes for a
/// stone on sides where the extent reaches the edge), and the opposing
/// stones found in the point's row/column crosshair do not enclose it the
/// same way. Assumes dead stones were already removed from the board.
pub fn group_territory(board: &Board, group: &[Point]) -> Vec<Point> {
    let Some(&first) = group.first() else {
        return Vec::new();
    };
    let Some(color) = board.stone_at(first) else {
        return Vec::new();
    };
    let opponent = color.opp();

    let span = extent(group);
    let mut result = Vec::new();

    for x in span.left..span.right {
        let column: Vec<Point> = (span.bottom..span.top)
            .map(|y| (x, y))
            .filter(|&p| board.stone_at(p) == Some(opponent))
            .collect();
        for y in span.bottom..span.top {
            let pos = (x, y);
            if board.stone_at(pos).is_some() {
                continue;
            }
            let mut enemies: Vec<Point> = (span.left..span.right)
                .map(|ex| (ex, y))
                .filter(|&p| board.stone_at(p) == Some(opponent))
                .collect();
            enemies.extend(&column);

            let inside_enemy = !enemies.is_empty()
                && bounded_on_all_sides(board, pos, &enemies, &extent(&enemies));

            if bounded_on_all_sides(board, pos, group, &span) && !inside_enemy {
                result.push(pos);
            }
        }
    }
    result
}

/// The four-direction bounding test. A direction is covered by a stone of
/// the set past the point in that axis, or by the board edge when the set's
/// extent reaches it.
fn bounded_on_all_sides(board: &Board, pos: Point, stones: &[Point], span: &Extent) -> bool {
    let size = board.size();
    let (mut up, mut down, mut left, mut right) = (false, false, false, false);
    for &stone in stones {
        if stone.0 == pos.0 {
            if stone.1 > pos.1 || span.top == size {
                up = true;
            }
            if stone.1 < pos.1 || span.bottom == 1 {
                down = true;
            }
        }
        if stone.1 == pos.1 {
            if stone.0 < pos.0 || span.left == 1 {
                left = true;
            }
            if stone.0 > pos.0 || span.right == size {
                right = true;
            }
        }
    }
    up && down && left && right
}

/// Per-color score breakdown: enclosed territory plus prisoners taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPoints {
    pub territory: u32,
    pub captures: u32,
}

impl PlayerPoints {
    pub fn total(&self) -> u32 {
        self.territory + self.captures
    }
}

/// Full score for both players. White's total carries the komi.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameScore {
    pub black: PlayerPoints,
    pub white: PlayerPoints,
    pub komi: f64,
}

impl GameScore {
    pub fn black_total(&self) -> f64 {
        self.black.total() as f64
    }

    pub fn white_total(&self) -> f64 {
        self.white.total() as f64 + self.komi
    }

    pub fn result(&self) -> String {
        format_result(self.black_total(), self.white_total())
    }
}

/// Score the current position: the distinct territory of each color's
/// chains, plus capture credit (a player scores the opponent stones that
/// were removed). Dead stones are the caller's concern.
pub fn score(board: &Board, komi: f64) -> GameScore {
    let mut black_territory: HashSet<Point> = HashSet::new();
    for group in board.chains().chains_of(Stone::Black) {
        black_territory.extend(group_territory(board, &group));
    }
    let mut white_territory: HashSet<Point> = HashSet::new();
    for group in board.chains().chains_of(Stone::White) {
        white_territory.extend(group_territory(board, &group));
    }

    GameScore {
        black: PlayerPoints {
            territory: black_territory.len() as u32,
            captures: board.captures().get(Stone::White),
        },
        white: PlayerPoints {
            territory: white_territory.len() as u32,
            captures: board.captures().get(Stone::Black),
        },
        komi,
    }
}

/// "B+n", "W+n" or "Draw".
pub fn format_result(black: f64, white: f64) -> String {
    let diff = black - white;
    if diff > 0.0 {
        format!("B+{diff}")
    } else if diff < 0.0 {
        format!("W+{}", -diff)
    } else {
        "Draw".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn black_group(board: &Board) -> Vec<Point> {
        board.chains().chains_of(Stone::Black).remove(0)
    }

    #[test]
    fn corner_enclosure() {
        // an L of stones walls off the lower-left 4x4 corner
        let board = board_from_layout(&[
            ".............", //
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            "XXXXX........",
            "....X........",
            "....X........",
            "....X........",
            "....X........",
        ]);
        let territory = group_territory(&board, &black_group(&board));
        assert_eq!(territory.len(), 16);
    }

    #[test]
    fn own_stones_shrink_enclosure() {
        // filling part of the corner with friendly stones leaves fewer
        // empty points to count
        let board = board_from_layout(&[
            ".............", //
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            "XXXXX........",
            "..X.X........",
            "..X.X........",
            "..X.X........",
            "..X.X........",
        ]);
        let territory = group_territory(&board, &black_group(&board));
        assert_eq!(territory.len(), 12);
    }

    #[test]
    fn bent_group_and_enemy_pocket() {
        // the original's bent-shape scenario: Black folds around the lower
        // left, White holds a small pocket at the bottom edge
        let board = board_from_layout(&[
            ".............", //
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            ".............",
            "XXXXXX.......",
            ".....X.......",
            "..XXXX.......",
            "..XOOOO......",
            "..XO..O......",
        ]);
        let black = black_group(&board);
        let white = board.chains().chains_of(Stone::White).remove(0);
        assert_eq!(group_territory(&board, &black).len(), 11);
        assert_eq!(group_territory(&board, &white).len(), 2);
    }

    #[test]
    fn score_counts_captures_for_the_other_color() {
        let mut board = board_from_layout(&[
            "X....", //
            "X....",
            "X....",
            "XXX..",
            ".OX..",
        ]);
        board.set_side(Stone::Black);
        // White's last liberty is (1,1); Black fills it and takes the stone
        board.make_move(crate::turn::Move::Play((1, 1))).unwrap();
        assert_eq!(board.captures().white, 1);

        let score = score(&board, 6.5);
        assert_eq!(score.black.captures, 1);
        assert_eq!(score.white.captures, 0);
        assert_eq!(score.white.territory, 0);
        assert!(score.black.territory > 0);
    }

    #[test]
    fn result_formatting() {
        assert_eq!(format_result(10.0, 6.5), "B+3.5");
        assert_eq!(format_result(3.0, 9.5), "W+6.5");
        assert_eq!(format_result(7.0, 7.0), "Draw");
    }
}
