#![allow(dead_code)]

use std::path::Path;

use createca::root_ca::RootCaConfig;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// Small keys keep the integration tests quick; the 4096-bit default has its own test.
pub const TEST_KEY_BITS: usize = 2048;

pub fn test_config(dir: &Path) -> RootCaConfig {
    RootCaConfig::builder()
        .key_bits(TEST_KEY_BITS)
        .output_dir(dir)
        .build()
}

/// A deterministic random source that runs dry after a fixed number of bytes.
///
/// Output is a SHA-256 counter stream, so two sources with the same budget
/// hand out the same bytes to the same sequence of draws.
pub struct LimitedRng {
    budget: Option<usize>,
    consumed: usize,
    counter: u64,
}

impl LimitedRng {
    pub fn with_budget(bytes: usize) -> Self {
        Self {
            budget: Some(bytes),
            consumed: 0,
            counter: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            budget: None,
            consumed: 0,
            counter: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RngCore for LimitedRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.try_fill_bytes(dest).expect("random source exhausted")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if let Some(budget) = self.budget {
            if self.consumed + dest.len() > budget {
                return Err(rand_core::Error::new("random source exhausted"));
            }
        }
        self.consumed += dest.len();
        for chunk in dest.chunks_mut(32) {
            let block = Sha256::digest(self.counter.to_be_bytes());
            self.counter += 1;
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        Ok(())
    }
}

impl CryptoRng for LimitedRng {}
