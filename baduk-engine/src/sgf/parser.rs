use super::error::SgfError;
use super::types::{Collection, GameTree, Node, Property};
use crate::Point;

/// Parse SGF text into a collection of game trees.
pub fn parse(input: &str) -> Result<Collection, SgfError> {
    let mut parser = Parser::new(input);
    let collection = parser.collection()?;
    if collection.is_empty() {
        return Err(SgfError::EmptyCollection);
    }
    Ok(collection)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, ch: u8) -> Result<(), SgfError> {
        self.skip_whitespace();
        match self.advance() {
            Some(b) if b == ch => Ok(()),
            Some(b) => Err(SgfError::UnexpectedChar {
                expected: expected_str(ch),
                found: b as char,
                pos: self.pos - 1,
            }),
            None => Err(SgfError::UnexpectedEof),
        }
    }

    // Collection = GameTree+
    fn collection(&mut self) -> Result<Collection, SgfError> {
        let mut trees = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'(') {
                trees.push(self.game_tree()?);
            } else {
                break;
            }
        }
        Ok(trees)
    }

    // GameTree = '(' Sequence GameTree* ')'
    fn game_tree(&mut self) -> Result<GameTree, SgfError> {
        self.expect(b'(')?;
        let nodes = self.sequence()?;
        let mut variations = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'(') {
                variations.push(self.game_tree()?);
            } else {
                break;
            }
        }
        self.expect(b')')?;
        Ok(GameTree { nodes, variations })
    }

    // Sequence = Node+
    fn sequence(&mut self) -> Result<Vec<Node>, SgfError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b';') {
                nodes.push(self.node()?);
            } else {
                break;
            }
        }
        Ok(nodes)
    }

    // Node = ';' Property*
    fn node(&mut self) -> Result<Node, SgfError> {
        self.expect(b';')?;
        let mut properties = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b) if b.is_ascii_uppercase() => {
                    let (ident, values) = self.raw_property()?;
                    properties.push(convert_property(ident, values)?);
                }
                _ => break,
            }
        }
        Ok(Node { properties })
    }

    // Property = Ident Value+
    fn raw_property(&mut self) -> Result<(String, Vec<String>), SgfError> {
        let ident = self.prop_ident();
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'[') {
                values.push(self.prop_value()?);
            } else {
                break;
            }
        }
        Ok((ident, values))
    }

    fn prop_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_uppercase() {
                ident.push(b as char);
                self.pos += 1;
            } else {
                break;
            }
        }
        ident
    }

    // Value = '[' text ']', backslash escapes the next character
    fn prop_value(&mut self) -> Result<String, SgfError> {
        self.expect(b'[')?;
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(SgfError::UnexpectedEof),
                Some(b'\\') => match self.advance() {
                    None => return Err(SgfError::UnexpectedEof),
                    // escaped line break: removed entirely (soft break)
                    Some(b'\n') => {
                        if self.peek() == Some(b'\r') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b) => value.push(b as char),
                },
                Some(b']') => return Ok(value),
                Some(b) => value.push(b as char),
            }
        }
    }
}

fn expected_str(ch: u8) -> &'static str {
    match ch {
        b'(' => "'('",
        b')' => "')'",
        b';' => "';'",
        b'[' => "'['",
        b']' => "']'",
        _ => "another character",
    }
}

fn convert_property(ident: String, values: Vec<String>) -> Result<Property, SgfError> {
    match ident.as_str() {
        "B" => Ok(Property::Black(move_value(&ident, values)?)),
        "W" => Ok(Property::White(move_value(&ident, values)?)),
        "AB" => Ok(Property::AddBlack(point_list(&ident, values)?)),
        "AW" => Ok(Property::AddWhite(point_list(&ident, values)?)),
        "SZ" => Ok(Property::BoardSize(number(&ident, values)?)),
        "FF" => Ok(Property::FileFormat(number(&ident, values)?)),
        "GM" => Ok(Property::GameType(number(&ident, values)?)),
        "KM" => Ok(Property::Komi(number(&ident, values)?)),
        "AP" => Ok(Property::Application(single(&ident, values)?)),
        "C" => Ok(Property::Comment(single(&ident, values)?)),
        "RE" => Ok(Property::Result(single(&ident, values)?)),
        _ => Ok(Property::Unknown(ident, values)),
    }
}

fn single(property: &str, mut values: Vec<String>) -> Result<String, SgfError> {
    if values.len() != 1 {
        return Err(SgfError::InvalidPropertyValue {
            property: property.to_string(),
            value: values.join(","),
        });
    }
    Ok(values.pop().expect("checked length"))
}

fn number<T: std::str::FromStr>(property: &str, values: Vec<String>) -> Result<T, SgfError> {
    let value = single(property, values)?;
    value.parse().map_err(|_| SgfError::InvalidPropertyValue {
        property: property.to_string(),
        value,
    })
}

/// A move value: empty (or the historical `tt`) is a pass.
fn move_value(property: &str, values: Vec<String>) -> Result<Option<Point>, SgfError> {
    let value = single(property, values)?;
    if value.is_empty() || value == "tt" {
        return Ok(None);
    }
    parse_point(&value).map(Some)
}

fn point_list(property: &str, values: Vec<String>) -> Result<Vec<Point>, SgfError> {
    if values.is_empty() {
        return Err(SgfError::InvalidPropertyValue {
            property: property.to_string(),
            value: String::new(),
        });
    }
    values.iter().map(|v| parse_point(v)).collect()
}

/// Two lowercase letters; `aa` is `(1, 1)`.
fn parse_point(value: &str) -> Result<Point, SgfError> {
    let bytes = value.as_bytes();
    if bytes.len() != 2 || !bytes[0].is_ascii_lowercase() || !bytes[1].is_ascii_lowercase() {
        return Err(SgfError::InvalidCoordinate(value.to_string()));
    }
    Ok((bytes[0] - b'a' + 1, bytes[1] - b'a' + 1))
}
