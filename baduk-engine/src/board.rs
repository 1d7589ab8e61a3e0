use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::chains::{ChainId, Chains};
use crate::error::GoError;
use crate::stone::Stone;
use crate::turn::{Move, COLUMN_LETTERS};
use crate::Point;

/// Capture counters indexed by the color of the stones that were removed:
/// `get(Black)` is the number of Black stones taken off the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }

    fn sub(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black -= count,
            Stone::White => self.white -= count,
        }
    }
}

/// The board: a flat grid of cell codes plus the incremental chain
/// partition, the side to move and the capture counters.
///
/// `make_move` and `undo_move` validate completely before touching any
/// state, so a rejected call leaves the board exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: u8,
    side: Stone,
    grid: Vec<i8>,
    captures: Captures,
    chains: Chains,
}

impl Board {
    pub fn new(size: u8) -> Self {
        assert!(
            (1..=24).contains(&size),
            "board size must be between 1 and 24"
        );
        Board {
            size,
            side: Stone::Black,
            grid: vec![0; size as usize * size as usize],
            captures: Captures::new(),
            chains: Chains::new(size),
        }
    }

    #[inline]
    fn idx(&self, (x, y): Point) -> usize {
        (y as usize - 1) * self.size as usize + (x as usize - 1)
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn side(&self) -> Stone {
        self.side
    }

    pub fn grid(&self) -> &[i8] {
        &self.grid
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn chains(&self) -> &Chains {
        &self.chains
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        (1..=self.size).contains(&x) && (1..=self.size).contains(&y)
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            Stone::from_int(self.grid[self.idx(point)])
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grid.iter().all(|&c| c == 0)
    }

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, point: Point) -> ArrayVec<Point, 4> {
        self.chains.neighbors(point)
    }

    /// Distinct empty cells adjacent to the chain occupying `point`.
    /// Zero for an empty cell.
    pub fn liberty_count(&self, point: Point) -> usize {
        if self.stone_at(point).is_none() {
            return 0;
        }
        self.chains.liberty_count(self.chains.id_at(point))
    }

    /// Canonical position key: per-cell codes in a fixed scan order. Used
    /// for superko comparison and for structural equality in tests.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.grid.len());
        for x in 1..=self.size {
            for y in 1..=self.size {
                key.push(match self.stone_at((x, y)) {
                    None => '.',
                    Some(s) => s.glyph(),
                });
            }
        }
        key
    }

    // -- Legality --

    /// Check a move against the board rules: bounds, occupancy and the
    /// suicide rule. Superko is the session's concern.
    ///
    /// A play on an empty in-bounds point is legal when at least one holds:
    /// a neighbor is empty, a friendly neighbor chain keeps a liberty after
    /// the placement, or an opposing neighbor chain is down to its last
    /// liberty and gets captured.
    pub fn check_move(&self, mv: Move) -> Result<(), GoError> {
        let Move::Play(point) = mv else {
            return Ok(());
        };
        if !self.on_board(point) {
            return Err(GoError::OutOfBounds);
        }
        if self.stone_at(point).is_some() {
            return Err(GoError::Occupied);
        }
        let opponent = self.side.opp();
        for n in self.neighbors(point) {
            match self.stone_at(n) {
                None => return Ok(()),
                Some(s) if s == self.side && self.liberty_count(n) > 1 => return Ok(()),
                Some(s) if s == opponent && self.liberty_count(n) == 1 => return Ok(()),
                _ => {}
            }
        }
        Err(GoError::Suicide)
    }

    pub fn legal_move(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    // -- Move application --

    /// Apply a move. Returns the captured points, empty for a pass or a
    /// capture-free play.
    pub fn make_move(&mut self, mv: Move) -> Result<Vec<Point>, GoError> {
        self.check_move(mv)?;
        let Move::Play(point) = mv else {
            self.side = self.side.opp();
            return Ok(Vec::new());
        };

        let i = self.idx(point);
        self.grid[i] = self.side.to_int();
        self.chains.place(point, self.side);

        let opponent = self.side.opp();
        let mut dead: ArrayVec<ChainId, 4> = ArrayVec::new();
        for n in self.neighbors(point) {
            if self.stone_at(n) != Some(opponent) {
                continue;
            }
            let id = self.chains.id_at(n);
            if !dead.contains(&id) && self.chains.liberty_count(id) == 0 {
                dead.push(id);
            }
        }

        let mut captured = Vec::new();
        for id in dead {
            let points = self.chains.capture(id);
            for &p in &points {
                let j = self.idx(p);
                self.grid[j] = 0;
            }
            self.captures.add(opponent, points.len() as u32);
            captured.extend(points);
        }

        self.side = opponent;
        Ok(captured)
    }

    /// Apply a move to a copy, leaving `self` untouched. The session uses
    /// this to probe the post-move position before committing to it.
    pub fn with_move(&self, mv: Move) -> Result<(Board, Vec<Point>), GoError> {
        let mut next = self.clone();
        let captured = next.make_move(mv)?;
        Ok((next, captured))
    }

    /// Reverse the most recent play. `captured` is the set returned by the
    /// matching `make_move`; the caller supplies it from its history. After
    /// the post-move flip, the side to move is the color whose stones were
    /// captured, so they are restored as `self.side`.
    pub fn undo_move(&mut self, point: Point, captured: &[Point]) {
        debug_assert_eq!(self.stone_at(point), Some(self.side.opp()));
        if !captured.is_empty() {
            for &p in captured {
                let i = self.idx(p);
                self.grid[i] = self.side.to_int();
            }
            self.chains.restore(captured, self.side);
            self.captures.sub(self.side, captured.len() as u32);
        }
        let i = self.idx(point);
        self.grid[i] = 0;
        self.chains.remove_stone(point);
        self.side = self.side.opp();
    }

    /// Reverse a pass.
    pub fn undo_pass(&mut self) {
        self.side = self.side.opp();
    }

    // -- Position setup --

    /// Place a setup stone: bounds and occupancy are checked, but there is
    /// no capture resolution and the side to move does not change. For
    /// building positions before play (game-record loaders, tests).
    pub fn set_stone(&mut self, point: Point, stone: Stone) -> Result<(), GoError> {
        if !self.on_board(point) {
            return Err(GoError::OutOfBounds);
        }
        if self.stone_at(point).is_some() {
            return Err(GoError::Occupied);
        }
        let i = self.idx(point);
        self.grid[i] = stone.to_int();
        self.chains.place(point, stone);
        Ok(())
    }

    /// Override the side to move. Setup-time companion to `set_stone`.
    pub fn set_side(&mut self, side: Stone) {
        self.side = side;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} to move", self.side)?;
        writeln!(
            f,
            "captured  black: {}  white: {}",
            self.captures.black, self.captures.white
        )?;
        let letters = &COLUMN_LETTERS[..self.size as usize];
        let rule = "-".repeat(self.size as usize);
        writeln!(f, "   {letters}")?;
        writeln!(f, "  +{rule}+")?;
        for y in (1..=self.size).rev() {
            write!(f, "{y:2}|")?;
            for x in 1..=self.size {
                match self.stone_at((x, y)) {
                    None => write!(f, ".")?,
                    Some(s) => write!(f, "{}", s.glyph())?,
                }
            }
            writeln!(f, "|{y}")?;
        }
        writeln!(f, "  +{rule}+")?;
        write!(f, "   {letters}")
    }
}
