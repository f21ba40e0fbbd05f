//! Record identifiers.
//!
//! Text documents get a millisecond timestamp, files get the timestamp plus a
//! random suffix so several files picked together do not collide. Timestamps
//! come from a clock that never repeats a value within the process: two ids
//! minted in the same millisecond are a millisecond apart. Stored ids
//! may also be JSON numbers (fractional for files), which are read back as
//! their decimal text.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

fn now_millis() -> u64 {
    let wall = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last + 1);
        match LAST_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(seen) => last = seen,
        }
    }
}

pub fn document_id() -> String {
    now_millis().to_string()
}

pub fn file_id() -> String {
    format!("{}-{:08x}", now_millis(), rand::random::<u32>())
}

pub(crate) mod id_serde {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor)
    }

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a string or numeric id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }
}
