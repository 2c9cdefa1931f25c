//! Padding & Framing
//!
//! Merkle–Damgård framing: a message of L bytes becomes the smallest
//! sequence of 64-byte blocks holding the message, a single `0x80`
//! marker byte, zero fill, and the 8-byte big-endian bit length. If the
//! marker and length do not fit after the data in the last block, one
//! more block is appended. The streaming and one-shot paths both frame
//! through this module, so their block sequences are byte-identical.

use crate::kernels::constants::BLOCK_SIZE;

/// Bytes of trailer that must fit after the data: marker + bit length.
const TRAILER_BYTES: usize = 9;

/// Total padded length for a message of `len` bytes: the smallest
/// multiple of the block size that fits the data plus the trailer.
pub fn padded_len(len: usize) -> usize {
    (len + TRAILER_BYTES).div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Number of bytes of `0x80`-led zero fill to emit after `len` message
/// bytes, before the 8-byte length field.
pub fn fill_len(len: u64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    let used = (len % BLOCK_SIZE as u64) as usize;
    1 + (119 - used) % BLOCK_SIZE
}

/// Frames a whole message into its padded block sequence.
pub fn pad_message(data: &[u8]) -> Vec<u8> {
    let total = padded_len(data.len());
    let mut padded = vec![0u8; total];
    padded[..data.len()].copy_from_slice(data);
    padded[data.len()] = 0x80;

    let bit_len = (data.len() as u64) << 3;
    padded[total - 8..].copy_from_slice(&bit_len.to_be_bytes());
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_len_is_minimal_multiple_of_block() {
        assert_eq!(padded_len(0), 64);
        assert_eq!(padded_len(1), 64);
        assert_eq!(padded_len(55), 64);
        // 56 bytes leave no room for the 9-byte trailer.
        assert_eq!(padded_len(56), 128);
        assert_eq!(padded_len(63), 128);
        assert_eq!(padded_len(64), 128);
        assert_eq!(padded_len(119), 128);
        assert_eq!(padded_len(120), 192);
    }

    #[test]
    fn fill_plus_length_completes_the_block() {
        for len in [0u64, 1, 55, 56, 63, 64, 65, 119, 120, 1000] {
            let total = len as usize + fill_len(len) + 8;
            assert_eq!(total % BLOCK_SIZE, 0, "len {len}");
            assert_eq!(total, padded_len(len as usize), "len {len}");
        }
    }

    #[test]
    fn marker_fill_and_length_are_placed_canonically() {
        let padded = pad_message(b"abc");
        assert_eq!(padded.len(), 64);
        assert_eq!(&padded[..3], b"abc");
        assert_eq!(padded[3], 0x80);
        assert!(padded[4..56].iter().all(|&b| b == 0));
        assert_eq!(&padded[56..], &(24u64).to_be_bytes());
    }

    #[test]
    fn trailer_overflow_appends_a_block() {
        let data = [0xffu8; 60];
        let padded = pad_message(&data);
        assert_eq!(padded.len(), 128);
        assert_eq!(padded[60], 0x80);
        assert!(padded[61..120].iter().all(|&b| b == 0));
        assert_eq!(&padded[120..], &(480u64).to_be_bytes());
    }

    #[test]
    fn empty_message_is_one_marker_block() {
        let padded = pad_message(&[]);
        assert_eq!(padded.len(), 64);
        assert_eq!(padded[0], 0x80);
        assert!(padded[1..].iter().all(|&b| b == 0));
    }
}
