use std::collections::HashMap;

use crate::board::Board;
use crate::error::GoError;
use crate::life;
use crate::stone::Stone;
use crate::territory::{self, GameScore};
use crate::turn::{Move, Record};
use crate::Point;

/// Default compensation added to White's score for moving second.
pub const DEFAULT_KOMI: f64 = 6.5;

/// A playing session: one live board, the move history for undo, and the
/// positional-superko ledger of canonical position keys.
///
/// Every key produced by a non-pass move is counted in `seen`; a move whose
/// resulting position is already there is rejected, and an undo decrements
/// the undone position's count, dropping the key once nothing in the history
/// produces it. The starting position is seeded so no move may recreate it.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    history: Vec<Record>,
    seen: HashMap<String, u32>,
    setup_black: Vec<Point>,
    setup_white: Vec<Point>,
    komi: f64,
}

impl Session {
    pub fn new(size: u8) -> Self {
        Self::with_komi(size, DEFAULT_KOMI)
    }

    pub fn with_komi(size: u8, komi: f64) -> Self {
        let board = Board::new(size);
        let mut seen = HashMap::new();
        seen.insert(board.key(), 1);
        Session {
            board,
            history: Vec::new(),
            seen,
            setup_black: Vec::new(),
            setup_white: Vec::new(),
            komi,
        }
    }

    // -- Accessors --

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> u8 {
        self.board.size()
    }

    pub fn side(&self) -> Stone {
        self.board.side()
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn history(&self) -> &[Record] {
        &self.history
    }

    /// Setup stones of the given color placed before play started.
    pub fn setup_stones(&self, stone: Stone) -> &[Point] {
        match stone {
            Stone::Black => &self.setup_black,
            Stone::White => &self.setup_white,
        }
    }

    // -- Setup --

    /// Place setup stones before play begins (game-record loaders call this
    /// for AB/AW). Builds on a copy so a bad point leaves nothing behind,
    /// then re-bases the superko ledger on the post-setup position.
    pub fn add_stones(&mut self, stone: Stone, points: &[Point]) -> Result<(), GoError> {
        debug_assert!(self.history.is_empty(), "setup stones after play began");
        let mut next = self.board.clone();
        for &p in points {
            next.set_stone(p, stone)?;
        }
        self.board = next;
        match stone {
            Stone::Black => self.setup_black.extend(points),
            Stone::White => self.setup_white.extend(points),
        }
        self.seen.clear();
        self.seen.insert(self.board.key(), 1);
        Ok(())
    }

    // -- Legality and play --

    /// Full legality: the board rules plus positional superko.
    pub fn check_move(&self, mv: Move) -> Result<(), GoError> {
        let (next, _) = self.board.with_move(mv)?;
        if mv.is_play() && self.seen.contains_key(&next.key()) {
            return Err(GoError::SuperkoViolation);
        }
        Ok(())
    }

    pub fn legal_move(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Apply a move, returning the captured points. The move runs on a
    /// disposable copy that is swapped in only once every check has passed,
    /// so a rejected move changes nothing.
    pub fn make_move(&mut self, mv: Move) -> Result<Vec<Point>, GoError> {
        let (next, captured) = self.board.with_move(mv)?;
        if mv.is_play() {
            let key = next.key();
            if self.seen.contains_key(&key) {
                return Err(GoError::SuperkoViolation);
            }
            *self.seen.entry(key).or_insert(0) += 1;
        }
        self.board = next;
        self.history.push(Record {
            mv,
            captured: captured.clone(),
        });
        Ok(captured)
    }

    /// Undo the latest move. The undone position's key count drops by one
    /// and the key disappears once no remaining history entry produces it.
    pub fn undo_move(&mut self) -> Result<Record, GoError> {
        let record = self.history.pop().ok_or(GoError::EmptyHistory)?;
        match record.mv {
            Move::Play(point) => {
                let key = self.board.key();
                if let Some(count) = self.seen.get_mut(&key) {
                    *count -= 1;
                    if *count == 0 {
                        self.seen.remove(&key);
                    }
                }
                self.board.undo_move(point, &record.captured);
            }
            Move::Pass => self.board.undo_pass(),
        }
        Ok(record)
    }

    // -- Scoring and analysis --

    /// Score the current position. Removing dead stones first is the
    /// caller's responsibility.
    pub fn score(&self) -> GameScore {
        territory::score(&self.board, self.komi)
    }

    /// Unconditionally alive chains of the given color.
    pub fn alive(&self, stone: Stone) -> Vec<Vec<Point>> {
        life::unconditionally_alive(&self.board, stone)
    }

    // -- Move generation --

    /// Every legal move: pass first, then board points in scan order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = vec![Move::Pass];
        for x in 1..=self.board.size() {
            for y in 1..=self.board.size() {
                let mv = Move::Play((x, y));
                if self.legal_move(mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Uniformly random choice among all legal moves (pass included).
    pub fn random_move(&self) -> Move {
        let moves = self.legal_moves();
        moves[fastrand::usize(..moves.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_and_alternates() {
        let mut session = Session::new(5);
        assert_eq!(session.side(), Stone::Black);
        session.make_move(Move::Play((3, 3))).unwrap();
        assert_eq!(session.side(), Stone::White);
        session.make_move(Move::Pass).unwrap();
        assert_eq!(session.side(), Stone::Black);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn rejects_board_illegal_moves() {
        let mut session = Session::new(4);
        session.make_move(Move::Play((1, 1))).unwrap();
        assert_eq!(
            session.make_move(Move::Play((1, 1))),
            Err(GoError::Occupied)
        );
        assert_eq!(
            session.make_move(Move::Play((9, 1))),
            Err(GoError::OutOfBounds)
        );
        // failed moves leave no history
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn undo_with_no_history_fails() {
        let mut session = Session::new(4);
        assert_eq!(session.undo_move().unwrap_err(), GoError::EmptyHistory);
    }

    #[test]
    fn undo_restores_position_and_history() {
        let mut session = Session::new(5);
        session.make_move(Move::Play((2, 2))).unwrap();
        let key_after_first = session.board().key();
        session.make_move(Move::Play((3, 3))).unwrap();

        let record = session.undo_move().unwrap();
        assert_eq!(record.mv, Move::Play((3, 3)));
        assert_eq!(session.board().key(), key_after_first);
        assert_eq!(session.history().len(), 1);
    }

    fn ko_session() -> Session {
        // a classic ko shape:
        //   .XO.
        //   XO.O
        //   .XO.
        //   ....
        let mut session = Session::new(4);
        session
            .add_stones(Stone::Black, &[(2, 4), (1, 3), (2, 2)])
            .unwrap();
        session
            .add_stones(Stone::White, &[(3, 4), (2, 3), (4, 3), (3, 2)])
            .unwrap();
        session
    }

    #[test]
    fn superko_forbids_retaking_the_ko() {
        let mut session = ko_session();
        // Black takes the ko
        let captured = session.make_move(Move::Play((3, 3))).unwrap();
        assert_eq!(captured, vec![(2, 3)]);

        // the immediate recapture would recreate the starting position
        assert_eq!(
            session.check_move(Move::Play((2, 3))),
            Err(GoError::SuperkoViolation)
        );
        assert!(!session.legal_move(Move::Play((2, 3))));

        // after a pass elsewhere the position would still repeat: forbidden
        session.make_move(Move::Pass).unwrap();
        session.make_move(Move::Pass).unwrap();
        assert_eq!(
            session.make_move(Move::Play((2, 3))),
            Err(GoError::SuperkoViolation)
        );
    }

    #[test]
    fn undo_reopens_an_undone_position() {
        let mut session = ko_session();
        session.make_move(Move::Play((3, 3))).unwrap();
        session.undo_move().unwrap();
        // the undone position's key is released: Black may take again
        let captured = session.make_move(Move::Play((3, 3))).unwrap();
        assert_eq!(captured, vec![(2, 3)]);
    }

    #[test]
    fn undo_keeps_keys_still_in_history() {
        let mut session = Session::new(5);
        session.make_move(Move::Play((2, 2))).unwrap();
        let key = session.board().key();
        session.undo_move().unwrap();
        // the key left with its only producer
        assert!(!session.seen.contains_key(&key));
        session.make_move(Move::Play((2, 2))).unwrap();
        assert!(session.seen.contains_key(&key));
    }

    #[test]
    fn pass_does_not_enter_the_ledger() {
        let mut session = Session::new(5);
        let keys_before = session.seen.len();
        session.make_move(Move::Pass).unwrap();
        session.make_move(Move::Pass).unwrap();
        assert_eq!(session.seen.len(), keys_before);
        session.undo_move().unwrap();
        assert_eq!(session.seen.len(), keys_before);
    }

    #[test]
    fn legal_moves_include_pass() {
        let session = Session::new(3);
        let moves = session.legal_moves();
        assert_eq!(moves.len(), 10);
        assert_eq!(moves[0], Move::Pass);
    }

    #[test]
    fn random_move_is_always_legal() {
        fastrand::seed(7);
        let mut session = Session::new(5);
        for _ in 0..30 {
            let mv = session.random_move();
            assert!(session.legal_move(mv));
            session.make_move(mv).unwrap();
        }
    }

    #[test]
    fn setup_stones_recorded_and_based() {
        let mut session = Session::new(5);
        session.add_stones(Stone::Black, &[(1, 1), (2, 1)]).unwrap();
        session.add_stones(Stone::White, &[(5, 5)]).unwrap();
        assert_eq!(session.setup_stones(Stone::Black), &[(1, 1), (2, 1)]);
        assert_eq!(session.setup_stones(Stone::White), &[(5, 5)]);
        assert_eq!(session.board().stone_at((1, 1)), Some(Stone::Black));
        // setup is atomic: one bad point places nothing
        let before = session.board().clone();
        assert_eq!(
            session.add_stones(Stone::White, &[(4, 4), (1, 1)]),
            Err(GoError::Occupied)
        );
        assert_eq!(*session.board(), before);
    }

    #[test]
    fn score_applies_komi() {
        let session = Session::with_komi(5, 0.5);
        let score = session.score();
        assert_eq!(score.black_total(), 0.0);
        assert_eq!(score.white_total(), 0.5);
        assert_eq!(score.result(), "W+0.5");
    }
}
