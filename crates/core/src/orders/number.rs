//! Order-number generation.
//!
//! Format: `{PREFIX}-{BASE36(unix millis)}-{4 random base36 chars}`, all
//! upper case, e.g. `CFM-MF3K2J1A-X9Q2`. Within one process the timestamp
//! component is strictly increasing, so a single generator never repeats
//! itself. Across processes the random suffix makes a clash unlikely but not
//! impossible; storage enforces uniqueness and callers retry.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Anything that can hand out candidate order numbers.
pub trait OrderNumberSource: Send + Sync {
    /// Produces the next candidate number.
    fn next_number(&self) -> String;
}

/// Time-plus-randomness order number generator.
#[derive(Debug)]
pub struct TimestampOrderNumbers {
    prefix: String,
    last_millis: AtomicU64,
}

impl TimestampOrderNumbers {
    /// Creates a generator producing numbers that start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
            last_millis: AtomicU64::new(0),
        }
    }

    /// Returns the configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Current millis, bumped past the last value handed out.
    fn next_millis(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = match self.last_millis.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |last| Some(now.max(last + 1)),
        ) {
            Ok(previous) | Err(previous) => previous,
        };
        now.max(previous + 1)
    }
}

impl OrderNumberSource for TimestampOrderNumbers {
    fn next_number(&self) -> String {
        let millis = self.next_millis();
        format!("{}-{}-{}", self.prefix, to_base36(millis), random_suffix())
    }
}

/// Encodes a number in upper-case base 36.
#[must_use]
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        // value % 36 < 36, so the index is always in range
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36_DIGITS[rng.random_range(0..BASE36_DIGITS.len())]))
        .collect()
}

/// Checks `number` against `PREFIX-[A-Z0-9]+-[A-Z0-9]{4}`.
#[must_use]
pub fn is_well_formed(number: &str, prefix: &str) -> bool {
    let upper = |s: &str| s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());

    let Some(rest) = number
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
    else {
        return false;
    };
    let Some((stamp, suffix)) = rest.split_once('-') else {
        return false;
    };
    !stamp.is_empty() && upper(stamp) && suffix.len() == SUFFIX_LEN && upper(suffix)
}
