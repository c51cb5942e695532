use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heap-allocated element used to fill collections under test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestObject {
    pub text: String,
    pub number: u32,
    pub tags: Vec<String>,
}

impl TestObject {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            text: random_uuid(rng),
            number: rng.gen_range(0..i32::MAX as u32),
            tags: vec![random_uuid(rng), random_uuid(rng)],
        }
    }

    pub fn random_list<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| Self::random(rng)).collect()
    }
}

fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

impl fmt::Display for TestObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TestObject[text='{}', number={}, tags={:?}]",
            self.text, self.number, self.tags
        )
    }
}
