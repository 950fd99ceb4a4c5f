use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::Rng;

use crate::errors::PasswordPolicyError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const GENERATED_PASSWORD_LENGTH: usize = 15;
pub const MAX_GENERATION_ATTEMPTS: usize = 1000;

const CHARSET: &[u8] = b"QWERTYUIOPASDFGHJKLZXCVBNM\
                         qwertyuiopasdfghjklzxcvbnm\
                         1234567890\
                         _*#^&@:<>.,?+=!-";

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 14;
    pub const DEFAULT_PARALLELISM: u32 = 1;

    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
        )
    }
}

/// Password rules, hashing and generation
///
/// Every password must be at least 8 bytes long and contain an uppercase
/// letter, a lowercase letter, a digit and a symbol (anything that is
/// neither a letter nor a digit). Hashes are Argon2id PHC strings stored as
/// bytes.
#[derive(Debug, Clone)]
pub struct PasswordPolicyProvider {
    min_length: usize,
    cost: HashCost,
}

impl PasswordPolicyProvider {
    pub fn new(cost: HashCost) -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            cost,
        }
    }

    /// Check a password against the length and character-class rules
    ///
    /// Missing classes are reported in a fixed order: uppercase, lowercase,
    /// digit, symbol.
    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort(self.min_length));
        }

        let mut has_upper = false;
        let mut has_lower = false;
        let mut has_digit = false;
        let mut has_symbol = false;
        for c in password.chars() {
            if c.is_uppercase() {
                has_upper = true;
            }
            if c.is_lowercase() {
                has_lower = true;
            }
            if c.is_numeric() {
                has_digit = true;
            }
            if !c.is_alphanumeric() {
                has_symbol = true;
            }
        }

        if !has_upper {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !has_lower {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !has_digit {
            return Err(PasswordPolicyError::MissingDigit);
        }
        if !has_symbol {
            return Err(PasswordPolicyError::MissingSymbol);
        }
        Ok(())
    }

    /// Salted Argon2id hash of `password`, as PHC string bytes
    pub fn hash(&self, password: &str) -> Result<Vec<u8>, PasswordPolicyError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordPolicyError::Hashing {
                message: e.to_string(),
            })?
            .to_string();

        Ok(password_hash.into_bytes())
    }

    /// Validate, then hash
    pub fn validate_and_hash(&self, password: &str) -> Result<Vec<u8>, PasswordPolicyError> {
        self.validate(password)?;
        self.hash(password)
    }

    /// Recompute the hash of `candidate` with the salt and parameters held in
    /// `stored` and compare.
    ///
    /// Malformed hashes and hashing failures read as a mismatch.
    pub fn verify(&self, stored: &[u8], candidate: &str) -> bool {
        let Ok(encoded) = std::str::from_utf8(stored) else {
            return false;
        };
        let Ok(parsed_hash) = PasswordHash::new(encoded) else {
            return false;
        };

        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// 15 characters drawn uniformly, with replacement, from a 78-character alphabet
    ///
    /// The result is not guaranteed to pass `validate`.
    pub fn generate_random(&self) -> String {
        let mut rng = rand::rng();

        (0..GENERATED_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Draw until a password passes `validate`, at most 1000 times
    pub fn generate_valid_random(&self) -> Result<String, PasswordPolicyError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = self.generate_random();
            if self.validate(&candidate).is_ok() {
                tracing::debug!(attempt, "Generated valid random password");
                return Ok(candidate);
            }
        }

        Err(PasswordPolicyError::NoValidCandidate {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordPolicyError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            None,
        )
        .map_err(|e| PasswordPolicyError::Hashing {
            message: format!("invalid Argon2 parameters: {}", e),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for PasswordPolicyProvider {
    fn default() -> Self {
        Self::new(HashCost::default())
    }
}
