use async_trait::async_trait;
use chunkwise_segmenter::{EmbeddingProvider, Result};

/// Deterministic pseudo-embedding provider.
///
/// Seeds a splitmix64 stream from an FNV-1a hash of the input and emits a
/// unit-normalized vector. Identical text always maps to the identical
/// vector, across runs and platforms, which makes segmentation output fully
/// reproducible without any model assets.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a provider emitting vectors of the given dimension
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension: if dimension == 0 { 1 } else { dimension },
        }
    }

    /// Vector dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut state = fnv1a_64(text.as_bytes())
            ^ (self.dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut vec = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            let bits = splitmix64(&mut state);
            let high = (bits >> 32) as u32;
            let mantissa = high >> 9;
            let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
            vec.push(unit.mul_add(2.0, -1.0));
        }
        normalize(&mut vec);
        Ok(vec)
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
