//! # createca - A Self-Signed Root CA Generator
//!
//! createca issues a self-signed X.509 root Certificate Authority using only
//! rustcrypto libraries. One run generates a fresh RSA key, signs the root
//! certificate with it, and writes three files:
//!
//! | File | Format |
//! |---|---|
//! | `ca.cer` | DER certificate |
//! | `ca-cert.pem` | PEM `CERTIFICATE` |
//! | `ca-key.pem` | PEM `RSA PRIVATE KEY` (PKCS#1) |
//!
//! ## Certificate Profile
//!
//! - **Subject and issuer**: `O=Acme Corporation, CN=Acme Root CA`
//! - **Key**: RSA 4096, signed with sha256WithRSAEncryption
//! - **Serial number**: the UTC issuance date as `YYYYMMDD`
//! - **Validity**: ten calendar years from issuance
//! - **Extensions**: keyUsage (digitalSignature, keyCertSign), extKeyUsage
//!   (clientAuth, serverAuth), basicConstraints CA:TRUE, subjectKeyIdentifier
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use createca::{clock::SystemClock, root_ca::{RootCaConfig, provision}};
//! use rand_core::OsRng;
//!
//! # fn main() -> Result<(), createca::error::CaError> {
//! let root = provision(&RootCaConfig::default(), &SystemClock, &mut OsRng)?;
//! assert!(root.certificate.is_self_signed()?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Issuing Without Touching Disk
//!
//! The clock and the random source are parameters, so issuance can be pinned
//! to an instant:
//!
//! ```rust,no_run
//! use createca::{clock::FixedClock, root_ca::{RootCa, RootCaConfig}};
//! use rand_core::OsRng;
//! use time::OffsetDateTime;
//!
//! # fn main() -> Result<(), createca::error::CaError> {
//! let clock = FixedClock(OffsetDateTime::UNIX_EPOCH);
//! let root = RootCa::issue(&RootCaConfig::default(), &clock, &mut OsRng)?;
//! assert_eq!(root.certificate.serial_number()?, 19700101);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`root_ca`]: The issuing pipeline and its configuration
//! - [`key`]: RSA key generation, PKCS#1 encoding, signing
//! - [`cert`]: Certificate creation, encoding/decoding, and inspection
//! - [`issuer`]: Turning a certificate descriptor into a signed certificate
//! - [`tbs_certificate`]: Low-level certificate structure manipulation
//! - [`error`]: Error types and handling
//! - [`clock`], [`output`], [`pem_utils`], [`logging`]: Supporting plumbing

pub mod cert;
pub mod clock;
pub mod error;
pub mod issuer;
pub mod key;
pub mod logging;
pub mod output;
pub mod pem_utils;
pub mod root_ca;
pub mod tbs_certificate;
