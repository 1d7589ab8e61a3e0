use super::types::{Collection, GameTree, Node, Property};
use crate::Point;

/// Serialize a collection back to SGF text.
pub fn serialize(collection: &Collection) -> String {
    let mut out = String::new();
    for tree in collection {
        write_tree(tree, &mut out);
    }
    out
}

fn write_tree(tree: &GameTree, out: &mut String) {
    out.push('(');
    for node in &tree.nodes {
        write_node(node, out);
    }
    for variation in &tree.variations {
        write_tree(variation, out);
    }
    out.push(')');
}

fn write_node(node: &Node, out: &mut String) {
    out.push(';');
    for property in &node.properties {
        write_property(property, out);
    }
}

fn write_property(property: &Property, out: &mut String) {
    match property {
        Property::Black(point) => write_move("B", point, out),
        Property::White(point) => write_move("W", point, out),
        Property::AddBlack(points) => write_points("AB", points, out),
        Property::AddWhite(points) => write_points("AW", points, out),
        Property::BoardSize(n) => write_value("SZ", &n.to_string(), out),
        Property::FileFormat(n) => write_value("FF", &n.to_string(), out),
        Property::GameType(n) => write_value("GM", &n.to_string(), out),
        Property::Komi(k) => write_value("KM", &k.to_string(), out),
        Property::Application(s) => write_value("AP", s, out),
        Property::Comment(s) => write_value("C", s, out),
        Property::Result(s) => write_value("RE", s, out),
        Property::Unknown(ident, values) => {
            out.push_str(ident);
            for value in values {
                out.push('[');
                out.push_str(&escape(value));
                out.push(']');
            }
        }
    }
}

fn write_move(ident: &str, point: &Option<Point>, out: &mut String) {
    out.push_str(ident);
    out.push('[');
    if let Some(p) = point {
        out.push_str(&point_text(*p));
    }
    out.push(']');
}

fn write_points(ident: &str, points: &[Point], out: &mut String) {
    out.push_str(ident);
    for &p in points {
        out.push('[');
        out.push_str(&point_text(p));
        out.push(']');
    }
}

fn write_value(ident: &str, value: &str, out: &mut String) {
    out.push_str(ident);
    out.push('[');
    out.push_str(&escape(value));
    out.push(']');
}

/// `(1, 1)` is `aa`.
fn point_text((x, y): Point) -> String {
    let mut text = String::with_capacity(2);
    text.push((b'a' + x - 1) as char);
    text.push((b'a' + y - 1) as char);
    text
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ']' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_linear_game() {
        let collection = vec![GameTree {
            nodes: vec![
                Node {
                    properties: vec![
                        Property::FileFormat(4),
                        Property::BoardSize(9),
                        Property::Komi(6.5),
                    ],
                },
                Node {
                    properties: vec![Property::Black(Some((3, 3)))],
                },
                Node {
                    properties: vec![Property::White(None)],
                },
            ],
            variations: Vec::new(),
        }];
        assert_eq!(serialize(&collection), "(;FF[4]SZ[9]KM[6.5];B[cc];W[])");
    }

    #[test]
    fn escapes_text_values() {
        let collection = vec![GameTree {
            nodes: vec![Node {
                properties: vec![Property::Comment("a ] b \\ c".to_string())],
            }],
            variations: Vec::new(),
        }];
        assert_eq!(serialize(&collection), r"(;C[a \] b \\ c])");
    }
}
