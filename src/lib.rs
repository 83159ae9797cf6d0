//! Human-transcribable error-correcting codes over GF(16).
//!
//! Encode short binary payloads as compact strings that survive the
//! damage humans inflict when reading codes aloud, copying them by hand
//! or re-typing them: adjacent transpositions, dropped characters, case
//! changes, letter/digit confusion (O/0, L/1, I/1, U/V) and arbitrary
//! separator noise.
//!
//! Odd and even code positions draw from disjoint alphabets, so the
//! decoder can see *where* a stream lost its rhythm and repair it before
//! Reed-Solomon error correction runs over the 4-bit symbols.
//!
//! # Example
//!
//! ```
//! let code = multicode::encode(b"\xBC\x7D\xE6\xFD", 6);
//! assert_eq!(code, "Ns 9T-YF ZT-14 JP-Js");
//!
//! // a sloppy re-type still decodes
//! let bytes = multicode::decode("ns9t YFZT 14jp js", 4, 6);
//! assert_eq!(bytes, b"\xBC\x7D\xE6\xFD");
//! ```

pub mod buffer;
pub mod chirality;
pub mod decoder;
pub mod display;
pub mod encoder;
pub mod gf16;
pub mod reed_solomon;

pub use buffer::SymbolBuffer;

/// Decode failures surfaced by [`try_decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input contains the reserved `~` overflow marker, which never
    /// appears in a transcribable code.
    #[error("code contains the reserved overflow marker '~'")]
    OverflowMarker,

    /// The symbol stream could not be brought to the expected length.
    #[error("expected {expected} symbols, found {actual} after repair")]
    LengthMismatch { expected: usize, actual: usize },

    /// The damage exceeds what the correction symbols can absorb.
    #[error("transcription damage exceeds the correction budget")]
    Uncorrectable,
}

/// Encode `data` as a transcribable code string with `sym_count`
/// correction symbols appended.
///
/// More correction symbols buy more tolerance at one character of
/// output each; 8 is a practical default for short identifiers.
pub fn encode(data: &[u8], sym_count: usize) -> String {
    encoder::encode(data, sym_count)
}

/// Decode a transcribed code back into `byte_len` bytes, repairing
/// transcription damage where possible.
///
/// The caller supplies the original byte length and correction symbol
/// count; the code itself is not self-describing. Returns an empty
/// vector on any failure; there is no partial result.
pub fn decode(code: &str, byte_len: usize, sym_count: usize) -> Vec<u8> {
    decoder::decode(code, byte_len, sym_count).unwrap_or_default()
}

/// Like [`decode`], but reports why decoding failed.
pub fn try_decode(code: &str, byte_len: usize, sym_count: usize) -> Result<Vec<u8>, Error> {
    decoder::decode(code, byte_len, sym_count)
}
