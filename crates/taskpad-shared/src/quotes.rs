use rand::rngs::SmallRng;
use rand::{
  Rng,
  SeedableRng
};

pub const QUOTES: [&str; 5] = [
  "Don’t watch the clock; do what it \
   does. Keep going.",
  "Great things are done by a series \
   of small things brought together.",
  "It always seems impossible until \
   it’s done.",
  "Push yourself, because no one else \
   is going to do it for you.",
  "Success is the sum of small \
   efforts, repeated daily."
];

#[must_use]
pub fn pick(seed: u64) -> &'static str {
  let mut rng =
    SmallRng::seed_from_u64(seed);
  QUOTES[rng.random_range(0..QUOTES.len())]
}

/// Quote line shown under the date
/// header.
#[must_use]
pub fn banner(seed: u64) -> String {
  format!("💡 {}", pick(seed))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn banner_wraps_a_known_quote() {
    for seed in 0..20 {
      let line = banner(seed);
      let quote = line
        .strip_prefix("💡 ")
        .unwrap();
      assert!(QUOTES.contains(&quote));
    }
  }

  #[test]
  fn quotes_join_cleanly() {
    assert_eq!(
      QUOTES[2],
      "It always seems impossible until it’s done."
    );
  }
}
