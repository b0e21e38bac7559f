//! Student identifiers.
//!
//! An id is 12 characters: 7 ASCII letters, 4 digits and one symbol from
//! [`SYMBOLS`], shuffled, with the first character upper-cased. Ids are short
//! enough to read out loud and type by hand.
//!
//! Generation alone does not guarantee uniqueness. The record store checks
//! every candidate against the collection and asks for another on a clash.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

pub const ID_LEN: usize = 12;
pub const SYMBOLS: &[u8] = b"!@#$%&";

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Source of candidate student ids.
pub trait IdGenerator: Send {
    fn generate(&mut self) -> String;
}

/// Default generator backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&mut self) -> String {
        generate_with(&mut rand::rng())
    }
}

/// Generates one id from the given RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut chars: Vec<u8> = Vec::with_capacity(ID_LEN);
    chars.extend((0..7).filter_map(|_| LETTERS.choose(rng)));
    chars.extend((0..4).filter_map(|_| DIGITS.choose(rng)));
    chars.extend(SYMBOLS.choose(rng));
    chars.shuffle(rng);
    chars[0] = chars[0].to_ascii_uppercase();

    chars.into_iter().map(char::from).collect()
}
