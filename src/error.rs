//! use createca::error::CaError;

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Names the output artifact a write failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `ca.cer`
    CertificateDer,
    /// `ca-cert.pem`
    CertificatePem,
    /// `ca-key.pem`
    PrivateKeyPem,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::CertificateDer | Artifact::CertificatePem => f.write_str("certificate"),
            Artifact::PrivateKeyPem => f.write_str("private key"),
        }
    }
}

/// Represents errors that can occur while issuing the root CA.
///
/// The first three variants are the terminal failures of the issuing
/// pipeline; the rest come from encoding or reading certificates and keys.
#[derive(Debug, Error)]
pub enum CaError {
    /// The random source failed or the RSA crate rejected the key parameters.
    #[error("Error generating private key: {0}")]
    KeyGeneration(String),

    /// Signing the TBS certificate failed.
    #[error("Error signing certificate: {0}")]
    Signing(String),

    /// Writing one of the output files failed.
    #[error("Error writing {artifact} to {}: {source}", path.display())]
    FileWrite {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from RSA PKCS#1 key encoding or decoding.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),

    /// A signature did not verify against the given public key.
    #[error("Signature verification failed: {0}")]
    Verification(String),
}

impl From<der::Error> for CaError {
    /// Converts a `der::Error` into a `CaError`.
    fn from(err: der::Error) -> Self {
        CaError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CaError {
    fn from(err: rsa::Error) -> Self {
        CaError::KeyGeneration(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CaError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CaError::RsaPkcs1Error(err.to_string())
    }
}

impl From<pem::PemError> for CaError {
    fn from(err: pem::PemError) -> Self {
        CaError::DecodingError(err.to_string())
    }
}

impl From<time::error::ComponentRange> for CaError {
    fn from(err: time::error::ComponentRange) -> Self {
        CaError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaError>;
