use crate::domain::ports::IdGenerator;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const SUFFIX_LEN: usize = 7;

/// `prefix` followed by seven random upper-case base-36 characters.
///
/// Cosmetic only; there is no uniqueness guarantee.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn reference(&self, prefix: &str) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("{prefix}{suffix}")
    }
}

/// Deterministic references: `prefix` plus a zero-padded counter.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU32,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn reference(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}{n:0width$}", width = SUFFIX_LEN)
    }
}
