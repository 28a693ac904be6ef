//! Randomized-but-plausible fixture records for signup runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::fixture::FixtureRecord;

/// Password every generated fixture signs up with.
pub const DEFAULT_PASSWORD: &str = "1234";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Radia", "Niklaus",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Perlman", "Wirth",
];

const CITIES: &[&str] = &["Dhaka", "Lisbon", "Nairobi", "Oslo", "Quito", "Tbilisi"];

static EMAIL_SEQ: AtomicU64 = AtomicU64::new(0);

/// A record with every field populated.
pub fn full_record() -> FixtureRecord {
    let mut rng = rand::thread_rng();
    FixtureRecord {
        first_name: pick(FIRST_NAMES, &mut rng),
        last_name: Some(pick(LAST_NAMES, &mut rng)),
        email: unique_email(),
        password: DEFAULT_PASSWORD.to_string(),
        phone_number: phone_number(&mut rng),
        address: Some(pick(CITIES, &mut rng)),
    }
}

/// A record carrying only the mandatory fields.
pub fn mandatory_record() -> FixtureRecord {
    let mut rng = rand::thread_rng();
    FixtureRecord {
        first_name: pick(FIRST_NAMES, &mut rng),
        last_name: None,
        email: unique_email(),
        password: DEFAULT_PASSWORD.to_string(),
        phone_number: phone_number(&mut rng),
        address: None,
    }
}

/// An address that no earlier or concurrent run has used: wall-clock
/// nanos plus a process-wide sequence number.
fn unique_email() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = EMAIL_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("qa+{:x}-{}@example.com", nanos, seq)
}

/// Eleven digits in the local mobile format the form accepts.
fn phone_number(rng: &mut impl Rng) -> String {
    format!("0170{}", rng.gen_range(1_000_000..=9_999_999))
}

fn pick(pool: &[&str], rng: &mut impl Rng) -> String {
    pool.choose(rng).copied().unwrap_or(pool[0]).to_string()
}
