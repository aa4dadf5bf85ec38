use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// URL-safe alphabet, 64 symbols
const ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of an identifier
pub const SIZE: usize = 21;

/// Identifier derived from `seed` only, the same seed always gives the same identifier
pub fn from_seed(seed: &str) -> String {
    let mut key = [0u8; 32];
    key.copy_from_slice(&Sha256::digest(seed.as_bytes()));
    let mut rng = ChaCha8Rng::from_seed(key);

    let mut bytes = [0u8; SIZE];
    rng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|byte| char::from(ALPHABET[usize::from(byte & 63)]))
        .collect()
}
