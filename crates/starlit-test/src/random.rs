//! Seeded generators for option values.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

/// Upper bound for generated star counts.
pub const MAX_GENERATED_STARS: i64 = 50;

/// Reproducible source of valid and invalid option values.
#[derive(Debug, Clone)]
pub struct OptionGenerator {
    rng: StdRng,
}

impl OptionGenerator {
    /// Generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A positive star count.
    pub fn max_rating(&mut self) -> i64 {
        self.rng.gen_range(1..=MAX_GENERATED_STARS)
    }

    /// A value `maxRating` must reject.
    pub fn invalid_max_rating(&mut self) -> Value {
        let negative = -self.rng.gen_range(1..=MAX_GENERATED_STARS);
        let fractional = f64::from(self.rng.gen_range(1..20)) + 0.5;
        let numeric_text = self.max_rating().to_string();
        let text = self.text(6);
        let candidates = [
            json!(0),
            json!(negative),
            json!(fractional),
            json!(numeric_text),
            json!(text),
            json!(true),
            Value::Null,
            json!([3]),
        ];
        candidates
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// A rating in `0..=max`.
    pub fn rating_up_to(&mut self, max: i64) -> i64 {
        self.rng.gen_range(0..=max.max(0))
    }

    /// A rating strictly above `max`.
    pub fn rating_above(&mut self, max: i64) -> i64 {
        max + self.rng.gen_range(1..=MAX_GENERATED_STARS)
    }

    /// A fractional average in `[0, max]`.
    pub fn average_up_to(&mut self, max: i64) -> f64 {
        let average = self.rng.gen::<f64>() * max as f64;
        // Two decimals keep failure output readable.
        (average * 100.0).floor() / 100.0
    }

    /// A value boolean options must reject.
    pub fn non_boolean(&mut self) -> Value {
        let candidates = [
            json!(0),
            json!(1),
            json!("true"),
            json!(self.text(4)),
            json!([]),
            json!({}),
        ];
        candidates.choose(&mut self.rng).cloned().unwrap_or(json!(0))
    }

    /// `len` tooltip entries, roughly a fifth of them missing.
    pub fn tooltips(&mut self, len: usize) -> Vec<Option<String>> {
        (0..len)
            .map(|_| {
                if self.rng.gen_bool(0.2) {
                    None
                } else {
                    let len = self.rng.gen_range(1..12);
                    Some(self.text(len))
                }
            })
            .collect()
    }

    /// Random alphanumeric text.
    pub fn text(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// A coin flip.
    pub fn flag(&mut self) -> bool {
        self.rng.gen()
    }
}
