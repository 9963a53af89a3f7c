//! Random number generator utilities, used for challenges and test data.

use rand::RngCore;

/// Generate random data of a specific length.
pub fn random_vec(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);
    data
}
