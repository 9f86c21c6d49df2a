use sha2::Digest;
use tracing::trace;

use crate::error::HashError;
use crate::models::Algorithm;

enum Digester {
    Md5(md5::Context),
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
    Sha3_256(sha3::Sha3_256),
}

impl Digester {
    fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Md5 => Digester::Md5(md5::Context::new()),
            Algorithm::Blake3 => Digester::Blake3(Box::new(blake3::Hasher::new())),
            Algorithm::Sha256 => Digester::Sha256(sha2::Sha256::new()),
            Algorithm::Sha512 => Digester::Sha512(sha2::Sha512::new()),
            Algorithm::Sha3_256 => Digester::Sha3_256(sha3::Sha3_256::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Digester::Md5(ctx) => ctx.consume(bytes),
            Digester::Blake3(hasher) => {
                hasher.update(bytes);
            }
            Digester::Sha256(hasher) => hasher.update(bytes),
            Digester::Sha512(hasher) => hasher.update(bytes),
            Digester::Sha3_256(hasher) => hasher.update(bytes),
        }
    }

    fn finish(self) -> String {
        match self {
            Digester::Md5(ctx) => format!("{:x}", ctx.finalize()),
            Digester::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
            Digester::Sha256(hasher) => hex::encode(hasher.finalize()),
            Digester::Sha512(hasher) => hex::encode(hasher.finalize()),
            Digester::Sha3_256(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

/// Running hash state fed one buffer at a time.
///
/// The digest only depends on the concatenation of everything appended, so
/// feeding a file chunk by chunk yields the same lowercase hex string as
/// hashing it in one go. Once [`finalize`](Self::finalize) has run, further
/// calls are rejected with [`HashError::ContractViolation`].
pub struct HashAccumulator {
    algorithm: Algorithm,
    state: Option<Digester>,
    appended: u64,
}

impl HashAccumulator {
    pub fn new(algorithm: Algorithm) -> Self {
        HashAccumulator { algorithm, state: Some(Digester::new(algorithm)), appended: 0 }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn bytes_appended(&self) -> u64 {
        self.appended
    }

    pub fn is_finalized(&self) -> bool {
        self.state.is_none()
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<(), HashError> {
        let state = self
            .state
            .as_mut()
            .ok_or(HashError::ContractViolation("append after finalize"))?;
        state.update(bytes);
        self.appended += bytes.len() as u64;
        trace!(len = bytes.len(), total = self.appended, "append");
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<String, HashError> {
        let state = self
            .state
            .take()
            .ok_or(HashError::ContractViolation("finalize called twice"))?;
        Ok(state.finish())
    }
}

impl std::fmt::Debug for HashAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashAccumulator")
            .field("algorithm", &self.algorithm)
            .field("appended", &self.appended)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}
