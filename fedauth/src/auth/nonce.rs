//! Single-use nonces binding a provider response to the attempt that asked for it.
//!
//! Nonces are drawn from the operating system CSPRNG 16 bytes at a time. A byte
//! maps to a character only when it indexes straight into [`NONCE_CHARSET`];
//! larger bytes are thrown away rather than reduced, so every character is
//! equally likely.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;

/// Characters a nonce is drawn from. Note there is no `W`.
pub const NONCE_CHARSET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVXYZabcdefghijklmnopqrstuvwxyz-._";

/// Default nonce length.
pub const DEFAULT_NONCE_LENGTH: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(n) => n,
    None => unreachable!(),
};

const BATCH_SIZE: usize = 16;

/// Source of cryptographically secure random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot produce entropy.
    fn try_fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// The operating system's secure random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn try_fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}

/// A random, single-use value tied to one sign-in attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Wraps a nonce that was issued out of process, e.g. by an app that
    /// handed the raw value to the `fedauth` binary.
    pub fn from_issued(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw nonce text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the nonce.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for generated nonces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the nonce, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl PartialEq<str> for Nonce {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce(<{} chars>)", self.0.len())
    }
}

/// Generates nonces of a fixed length from an [`EntropySource`].
#[derive(Clone)]
pub struct NonceGenerator {
    source: Arc<dyn EntropySource>,
    length: NonZeroUsize,
}

impl NonceGenerator {
    /// Creates a generator backed by the OS random source, producing
    /// [`DEFAULT_NONCE_LENGTH`] characters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(Arc::new(OsEntropy))
    }

    /// Creates a generator drawing from a custom source.
    #[must_use]
    pub fn with_source(source: Arc<dyn EntropySource>) -> Self {
        Self {
            source,
            length: DEFAULT_NONCE_LENGTH,
        }
    }

    /// Sets the length of nonces produced by [`generate`](Self::generate).
    #[must_use]
    pub const fn with_length(mut self, length: NonZeroUsize) -> Self {
        self.length = length;
        self
    }

    /// Configured nonce length.
    #[must_use]
    pub const fn length(&self) -> NonZeroUsize {
        self.length
    }

    /// Generates a nonce of the configured length.
    #[must_use]
    pub fn generate(&self) -> Nonce {
        self.generate_with_length(self.length)
    }

    /// Generates a nonce of exactly `length` characters.
    ///
    /// # Panics
    ///
    /// Panics if the entropy source fails. A broken random source is a
    /// platform fault and no sign-in may proceed without it.
    #[must_use]
    pub fn generate_with_length(&self, length: NonZeroUsize) -> Nonce {
        let mut result = String::with_capacity(length.get());
        let mut remaining = length.get();
        let mut batch = [0u8; BATCH_SIZE];

        while remaining > 0 {
            if let Err(err) = self.source.try_fill(&mut batch) {
                panic!("Unable to generate nonce. Secure random source failed: {err}");
            }

            for &byte in &batch {
                if remaining == 0 {
                    break;
                }
                if let Some(&c) = NONCE_CHARSET.get(usize::from(byte)) {
                    result.push(char::from(c));
                    remaining -= 1;
                }
            }
        }

        tracing::trace!(length = length.get(), "generated nonce");
        Nonce(result)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Generates a nonce of `length` characters from the OS random source.
#[must_use]
pub fn generate_nonce(length: NonZeroUsize) -> Nonce {
    NonceGenerator::new().generate_with_length(length)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Replays a fixed byte sequence, cycling when exhausted.
    struct ScriptedEntropy {
        bytes: Vec<u8>,
        cursor: Mutex<usize>,
    }

    impl ScriptedEntropy {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                cursor: Mutex::new(0),
            }
        }
    }

    impl EntropySource for ScriptedEntropy {
        fn try_fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
            let mut cursor = self.cursor.lock().unwrap();
            for slot in dest.iter_mut() {
                *slot = self.bytes[*cursor % self.bytes.len()];
                *cursor += 1;
            }
            Ok(())
        }
    }

    fn len(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn charset_has_no_w_and_no_duplicates() {
        assert!(!NONCE_CHARSET.contains(&b'W'));
        let unique: HashSet<_> = NONCE_CHARSET.iter().collect();
        assert_eq!(unique.len(), NONCE_CHARSET.len());
    }

    #[test]
    fn default_length_is_32() {
        let nonce = NonceGenerator::new().generate();
        assert_eq!(nonce.len(), 32);
    }

    #[test]
    fn output_has_exact_length_and_alphabet() {
        let generator = NonceGenerator::new();
        for n in 1..=130 {
            let nonce = generator.generate_with_length(len(n));
            assert_eq!(nonce.as_str().chars().count(), n);
            assert!(nonce.as_str().bytes().all(|b| NONCE_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn outputs_are_unique_over_large_sample() {
        let generator = NonceGenerator::new();
        let sample: HashSet<String> = (0..10_000)
            .map(|_| generator.generate().into_string())
            .collect();
        assert_eq!(sample.len(), 10_000);
    }

    #[test]
    fn bytes_outside_charset_are_rejected_not_wrapped() {
        // 64 would wrap to '0' and 255 to '_' under modulo reduction.
        let source = ScriptedEntropy::new(vec![64, 0, 255, 1, 128, 63]);
        let generator = NonceGenerator::with_source(Arc::new(source));

        let nonce = generator.generate_with_length(len(3));
        assert_eq!(nonce.as_str(), "01_");
    }

    #[test]
    fn keeps_drawing_batches_until_length_reached() {
        let mut mock = MockEntropySource::new();
        let mut call = 0;
        mock.expect_try_fill().times(3).returning(move |dest| {
            call += 1;
            // Only the last byte of each batch is usable.
            dest.fill(200);
            dest[BATCH_SIZE - 1] = call;
            Ok(())
        });

        let generator = NonceGenerator::with_source(Arc::new(mock));
        let nonce = generator.generate_with_length(len(3));
        assert_eq!(nonce.as_str(), "123");
    }

    #[test]
    fn with_length_changes_generate() {
        let generator = NonceGenerator::new().with_length(len(8));
        assert_eq!(generator.length().get(), 8);
        assert_eq!(generator.generate().len(), 8);
    }

    #[test]
    #[should_panic(expected = "Unable to generate nonce")]
    fn entropy_failure_is_fatal() {
        let mut mock = MockEntropySource::new();
        mock.expect_try_fill().returning(|_| {
            Err(rand::Error::new(std::io::Error::other("no entropy")))
        });

        let generator = NonceGenerator::with_source(Arc::new(mock));
        let _ = generator.generate();
    }

    #[test]
    fn debug_does_not_reveal_value() {
        let nonce = Nonce::from_issued("secret-nonce");
        let debug = format!("{nonce:?}");
        assert!(!debug.contains("secret-nonce"));
        assert!(debug.contains("12"));
    }

    #[test]
    fn compares_against_str() {
        let nonce = Nonce::from_issued("abc");
        assert!(nonce == *"abc");
        assert!(nonce != *"abd");
    }
}
