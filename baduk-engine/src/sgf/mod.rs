mod convert;
mod error;
mod parser;
mod serialize;
pub mod types;

pub use convert::{game_from_sgf, game_to_sgf};
pub use error::SgfError;
pub use parser::parse;
pub use serialize::serialize;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_simple_game() {
        let input = "(;FF[4]GM[1]SZ[9]KM[6.5];B[cc];W[gg];B[cg];W[gc])";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }

    #[test]
    fn round_trip_with_setup() {
        let input = "(;FF[4]GM[1]SZ[9]AB[dd][df][fd]AW[ee][eg])";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }

    #[test]
    fn round_trip_pass_moves() {
        let input = "(;SZ[9];B[dd];W[];B[])";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }

    #[test]
    fn round_trip_with_variations() {
        let input = "(;FF[4]GM[1]SZ[9];B[ee](;W[ge];B[dg])(;W[de];B[fg]))";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }

    #[test]
    fn round_trip_comments_and_escapes() {
        let input = r"(;SZ[9]C[bracket \] and backslash \\ here];B[aa])";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }

    #[test]
    fn round_trip_unknown_properties() {
        let input = "(;FF[4]XX[foo][bar]PB[someone])";
        let collection = parse(input).unwrap();
        let output = serialize(&collection);
        let reparsed = parse(&output).unwrap();
        assert_eq!(collection, reparsed);
    }
}
