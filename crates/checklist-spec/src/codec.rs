//! Positional codec for rating vectors.
//!
//! Values are packed `values_per_chunk` at a time into one integer in base
//! `radix`, and each integer is written as exactly `chars_per_chunk` symbols of
//! [`ALPHABET`]. Both widths are the largest that keep every chunk at or below
//! [`MAX_SAFE_INTEGER`].
//!
//! The last chunk is always a terminator holding the remaining
//! `len % values_per_chunk` values behind a leading `1` digit, so the value
//! count survives the round trip. An empty vector encodes to one chunk.

use thiserror::Error;

/// URL-fragment-safe symbols; position is digit value.
pub const ALPHABET: &[u8; 70] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.=+*!@-_";

/// Largest integer a double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("radix {radix} is not supported")]
    UnsupportedRadix { radix: usize },
    #[error("value {value} at index {index} does not fit radix {radix}")]
    ValueOutOfRange {
        index: usize,
        value: usize,
        radix: usize,
    },
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },
    #[error("encoded length {length} is not a positive multiple of {width}")]
    TruncatedChunk { length: usize, width: usize },
    #[error("chunk {chunk} holds a value outside its range")]
    ChunkOverflow { chunk: usize },
}

/// Packing widths for one radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    pub radix: usize,
    pub values_per_chunk: usize,
    pub chars_per_chunk: usize,
    full_chunk_limit: u64,
}

impl ChunkLayout {
    pub fn for_radix(radix: usize) -> Result<Self, CodecError> {
        let symbols = ALPHABET.len() as u64;
        let (chars_per_chunk, chunk_capacity) = max_power(symbols, MAX_SAFE_INTEGER);
        if radix < 2 {
            return Err(CodecError::UnsupportedRadix { radix });
        }
        let (values_per_chunk, full_chunk_limit) = max_power(radix as u64, chunk_capacity);
        if values_per_chunk == 0 {
            return Err(CodecError::UnsupportedRadix { radix });
        }
        Ok(Self {
            radix,
            values_per_chunk,
            chars_per_chunk,
            full_chunk_limit,
        })
    }
}

/// Largest `k` with `base^k <= ceiling`, and `base^k` itself.
fn max_power(base: u64, ceiling: u64) -> (usize, u64) {
    let mut exponent = 0;
    let mut power = 1u64;
    while let Some(next) = power.checked_mul(base) {
        if next > ceiling {
            break;
        }
        power = next;
        exponent += 1;
    }
    (exponent, power)
}

pub fn encode(radix: usize, values: &[usize]) -> Result<String, CodecError> {
    let layout = ChunkLayout::for_radix(radix)?;
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v >= radix) {
        return Err(CodecError::ValueOutOfRange {
            index,
            value,
            radix,
        });
    }

    let chunks = values.chunks_exact(layout.values_per_chunk);
    let terminal = chunks.remainder();
    let mut out = String::with_capacity((chunks.len() + 1) * layout.chars_per_chunk);
    for chunk in chunks {
        render(pack(0, chunk, radix), layout.chars_per_chunk, &mut out);
    }
    render(pack(1, terminal, radix), layout.chars_per_chunk, &mut out);
    Ok(out)
}

pub fn decode(radix: usize, text: &str) -> Result<Vec<usize>, CodecError> {
    let layout = ChunkLayout::for_radix(radix)?;
    let symbols: Vec<char> = text.chars().collect();
    let width = layout.chars_per_chunk;
    if symbols.is_empty() || symbols.len() % width != 0 {
        return Err(CodecError::TruncatedChunk {
            length: symbols.len(),
            width,
        });
    }

    let chunk_count = symbols.len() / width;
    let mut values = Vec::with_capacity(chunk_count * layout.values_per_chunk);
    for (chunk, chunk_symbols) in symbols.chunks(width).enumerate() {
        let number = read_chunk(chunk_symbols, chunk * width)?;
        if chunk + 1 < chunk_count {
            if number >= layout.full_chunk_limit {
                return Err(CodecError::ChunkOverflow { chunk });
            }
            unpack_full(number, &layout, &mut values);
        } else {
            unpack_terminal(number, &layout, chunk, &mut values)?;
        }
    }
    Ok(values)
}

fn pack(seed: u64, values: &[usize], radix: usize) -> u64 {
    values
        .iter()
        .fold(seed, |acc, value| acc * radix as u64 + *value as u64)
}

fn render(mut number: u64, width: usize, out: &mut String) {
    let base = ALPHABET.len() as u64;
    let mut digits = vec![ALPHABET[0]; width];
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(number % base) as usize];
        number /= base;
    }
    out.extend(digits.into_iter().map(char::from));
}

fn read_chunk(symbols: &[char], offset: usize) -> Result<u64, CodecError> {
    let base = ALPHABET.len() as u64;
    symbols
        .iter()
        .enumerate()
        .try_fold(0u64, |acc, (idx, symbol)| {
            let digit = symbol_value(*symbol).ok_or(CodecError::InvalidSymbol {
                position: offset + idx,
                symbol: *symbol,
            })?;
            Ok(acc * base + digit)
        })
}

fn symbol_value(symbol: char) -> Option<u64> {
    if !symbol.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|b| *b == symbol as u8)
        .map(|pos| pos as u64)
}

fn unpack_full(mut number: u64, layout: &ChunkLayout, out: &mut Vec<usize>) {
    let radix = layout.radix as u64;
    let start = out.len();
    out.resize(start + layout.values_per_chunk, 0);
    for slot in out[start..].iter_mut().rev() {
        *slot = (number % radix) as usize;
        number /= radix;
    }
}

fn unpack_terminal(
    mut number: u64,
    layout: &ChunkLayout,
    chunk: usize,
    out: &mut Vec<usize>,
) -> Result<(), CodecError> {
    let radix = layout.radix as u64;
    let mut digits = Vec::new();
    while number >= radix {
        digits.push((number % radix) as usize);
        number /= radix;
    }
    if number != 1 || digits.len() >= layout.values_per_chunk {
        return Err(CodecError::ChunkOverflow { chunk });
    }
    out.extend(digits.into_iter().rev());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_for_builtin_scale() {
        let layout = ChunkLayout::for_radix(6).expect("layout");
        assert_eq!(layout.chars_per_chunk, 8);
        assert_eq!(layout.values_per_chunk, 18);
    }

    #[test]
    fn layout_for_binary() {
        let layout = ChunkLayout::for_radix(2).expect("layout");
        assert_eq!(layout.values_per_chunk, 49);
    }

    #[test]
    fn alphabet_symbols_are_unique() {
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ALPHABET.len());
    }

    #[test]
    fn empty_vector_is_one_terminal_chunk() {
        assert_eq!(encode(6, &[]).expect("encode"), "aaaaaaab");
    }
}
