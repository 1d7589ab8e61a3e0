use crate::session::{Session, DEFAULT_KOMI};
use crate::stone::Stone;
use crate::turn::Move;
use crate::Point;

use super::error::SgfError;
use super::parser::parse;
use super::serialize::serialize;
use super::types::{GameTree, Node, Property};

/// Build a session from SGF text: first game, main line only.
///
/// All AB/AW setup stones are applied before the move sequence, the way the
/// record-loading interface expects. Recorded move colors are not checked
/// against the alternation; the engine plays whoever is to move.
pub fn game_from_sgf(input: &str) -> Result<Session, SgfError> {
    let collection = parse(input)?;
    let mut nodes = Vec::new();
    main_line(&collection[0], &mut nodes);

    let mut size = 19u8;
    let mut komi = DEFAULT_KOMI;
    if let Some(root) = nodes.first() {
        for property in &root.properties {
            match property {
                Property::BoardSize(n) => size = *n,
                Property::Komi(k) => komi = *k,
                _ => {}
            }
        }
    }
    if !(1..=24).contains(&size) {
        return Err(SgfError::InvalidPropertyValue {
            property: "SZ".to_string(),
            value: size.to_string(),
        });
    }

    let mut add_black: Vec<Point> = Vec::new();
    let mut add_white: Vec<Point> = Vec::new();
    let mut moves: Vec<Move> = Vec::new();
    for node in &nodes {
        for property in &node.properties {
            match property {
                Property::AddBlack(points) => add_black.extend(points),
                Property::AddWhite(points) => add_white.extend(points),
                Property::Black(point) | Property::White(point) => moves.push(match point {
                    Some(p) => Move::Play(*p),
                    None => Move::Pass,
                }),
                _ => {}
            }
        }
    }

    let mut session = Session::with_komi(size, komi);
    if !add_black.is_empty() {
        session
            .add_stones(Stone::Black, &add_black)
            .map_err(|reason| SgfError::IllegalMove {
                mv: "AB".to_string(),
                reason,
            })?;
    }
    if !add_white.is_empty() {
        session
            .add_stones(Stone::White, &add_white)
            .map_err(|reason| SgfError::IllegalMove {
                mv: "AW".to_string(),
                reason,
            })?;
    }
    for mv in moves {
        session
            .make_move(mv)
            .map_err(|reason| SgfError::IllegalMove {
                mv: mv.to_string(),
                reason,
            })?;
    }
    Ok(session)
}

/// Serialize a session's game: one tree, metadata in the root node, one
/// node per move, colors alternating from Black.
pub fn game_to_sgf(session: &Session) -> String {
    let mut root = Node {
        properties: vec![
            Property::FileFormat(4),
            Property::GameType(1),
            Property::BoardSize(session.size()),
            Property::Application(format!("baduk-engine:{}", env!("CARGO_PKG_VERSION"))),
            Property::Komi(session.komi()),
        ],
    };
    let setup_black = session.setup_stones(Stone::Black);
    if !setup_black.is_empty() {
        root.properties.push(Property::AddBlack(setup_black.to_vec()));
    }
    let setup_white = session.setup_stones(Stone::White);
    if !setup_white.is_empty() {
        root.properties.push(Property::AddWhite(setup_white.to_vec()));
    }

    let mut nodes = vec![root];
    for (i, record) in session.history().iter().enumerate() {
        let point = record.mv.point();
        let property = if i % 2 == 0 {
            Property::Black(point)
        } else {
            Property::White(point)
        };
        nodes.push(Node {
            properties: vec![property],
        });
    }

    serialize(&vec![GameTree {
        nodes,
        variations: Vec::new(),
    }])
}

/// Nodes along the first-variation line, in playing order.
fn main_line<'a>(tree: &'a GameTree, out: &mut Vec<&'a Node>) {
    out.extend(tree.nodes.iter());
    if let Some(first) = tree.variations.first() {
        main_line(first, out);
    }
}
