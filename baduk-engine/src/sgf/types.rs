use crate::Point;

/// An SGF file: one or more game trees.
pub type Collection = Vec<GameTree>;

/// A game tree: a sequence of nodes followed by zero or more variations.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTree {
    pub nodes: Vec<Node>,
    pub variations: Vec<GameTree>,
}

/// A single node, holding one or more properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub properties: Vec<Property>,
}

/// The property subset the engine understands. Everything else is kept
/// verbatim under `Unknown` so that serialization round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// B[..]; `None` is a pass.
    Black(Option<Point>),
    /// W[..]; `None` is a pass.
    White(Option<Point>),
    AddBlack(Vec<Point>),
    AddWhite(Vec<Point>),
    BoardSize(u8),
    FileFormat(u8),
    GameType(u8),
    Komi(f64),
    Application(String),
    Comment(String),
    Result(String),
    Unknown(String, Vec<String>),
}
