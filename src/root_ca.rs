//! Issues the self-signed root CA and writes its three artifacts.
//!
//! The sequence is strictly linear: compute the validity window, generate
//! the key, derive the serial, self-sign, then write `ca.cer`,
//! `ca-cert.pem` and `ca-key.pem` in that order. The first failure ends the
//! run; files already written stay on disk.

use std::path::{Path, PathBuf};

use bon::Builder;
use rand_core::CryptoRngCore;
use time::UtcOffset;
use tracing::{debug, info};

use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use crate::cert::params::{CertificateDescriptor, DistinguishedName, Validity, serial_for_date};
use crate::cert::{CERTIFICATE_PEM_LABEL, Certificate, SignatureAlgorithm};
use crate::clock::Clock;
use crate::error::{Artifact, CaError, Result};
use crate::key::KeyPair;
use crate::output::write_owner_only;
use crate::pem_utils::der_to_pem;

pub const ORGANIZATION: &str = "Acme Corporation";
pub const COMMON_NAME: &str = "Acme Root CA";
pub const KEY_BITS: usize = 4096;
pub const VALIDITY_YEARS: i32 = 10;

pub const CERT_DER_FILE: &str = "ca.cer";
pub const CERT_PEM_FILE: &str = "ca-cert.pem";
pub const KEY_PEM_FILE: &str = "ca-key.pem";

/// Issuance settings. Every field defaults to the fixed root CA profile;
/// an empty `output_dir` means the current working directory.
#[derive(Clone, Debug, Builder)]
pub struct RootCaConfig {
    #[builder(default = KEY_BITS)]
    pub key_bits: usize,
    #[builder(default = VALIDITY_YEARS)]
    pub validity_years: i32,
    #[builder(into, default)]
    pub output_dir: PathBuf,
}

impl Default for RootCaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Where [`RootCa::write_to`] put each artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub cert_der: PathBuf,
    pub cert_pem: PathBuf,
    pub key_pem: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cert_der: dir.join(CERT_DER_FILE),
            cert_pem: dir.join(CERT_PEM_FILE),
            key_pem: dir.join(KEY_PEM_FILE),
        }
    }
}

/// A freshly issued root CA: the self-signed certificate and its key.
#[derive(Debug)]
pub struct RootCa {
    pub certificate: Certificate,
    pub key: KeyPair,
}

impl RootCa {
    /// Generate the key pair and self-sign the root certificate. Nothing is written.
    pub fn issue<C: Clock, R: CryptoRngCore>(
        config: &RootCaConfig,
        clock: &C,
        rng: &mut R,
    ) -> Result<Self> {
        let issued = clock
            .now_utc()
            .to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)?;
        let validity = Validity::for_calendar_years(issued, config.validity_years)?;

        debug!(bits = config.key_bits, "generating RSA key pair");
        let key = KeyPair::generate_rsa(rng, config.key_bits)?;

        let serial_number = serial_for_date(issued.date())?;

        let descriptor = CertificateDescriptor::builder()
            .serial_number(serial_number)
            .subject(
                DistinguishedName::builder()
                    .organization(ORGANIZATION)
                    .common_name(COMMON_NAME)
                    .build(),
            )
            .subject_public_key(key.public_key().clone())
            .validity(validity)
            .is_ca(true)
            .basic_constraints_valid(true)
            .key_usage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign)
            .usages(vec![
                ExtendedKeyUsageOption::ClientAuth,
                ExtendedKeyUsageOption::ServerAuth,
            ])
            .signature_algorithm(SignatureAlgorithm::Sha256WithRSA)
            .build();

        debug!(serial_number, "self-signing root certificate");
        let certificate =
            Certificate::new_self_signed(&descriptor, &key, rng).map_err(|e| match e {
                CaError::Signing(_) => e,
                other => CaError::Signing(other.to_string()),
            })?;

        Ok(Self { certificate, key })
    }

    /// Write `ca.cer`, `ca-cert.pem` and `ca-key.pem` into `dir`, in that order.
    pub fn write_to(&self, dir: &Path) -> Result<OutputPaths> {
        let paths = OutputPaths::in_dir(dir);

        let der = self.certificate.to_der()?;
        write_artifact(Artifact::CertificateDer, &paths.cert_der, &der)?;

        let pem = der_to_pem(&der, CERTIFICATE_PEM_LABEL);
        write_artifact(Artifact::CertificatePem, &paths.cert_pem, pem.as_bytes())?;

        let key_pem = self.key.to_pkcs1_pem()?;
        write_artifact(Artifact::PrivateKeyPem, &paths.key_pem, key_pem.as_bytes())?;

        Ok(paths)
    }
}

fn write_artifact(artifact: Artifact, path: &Path, contents: &[u8]) -> Result<()> {
    write_owner_only(path, contents).map_err(|source| CaError::FileWrite {
        artifact,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote {artifact}");
    Ok(())
}

/// Issue the root CA and write its artifacts to `config.output_dir`.
pub fn provision<C: Clock, R: CryptoRngCore>(
    config: &RootCaConfig,
    clock: &C,
    rng: &mut R,
) -> Result<RootCa> {
    let root = RootCa::issue(config, clock, rng)?;
    let paths = root.write_to(&config.output_dir)?;
    info!(
        certificate = %paths.cert_pem.display(),
        key = %paths.key_pem.display(),
        "root CA written"
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use rand_core::OsRng;
    use time::macros::datetime;

    #[test]
    fn test_default_config_is_fixed_profile() {
        let config = RootCaConfig::default();
        assert_eq!(config.key_bits, 4096);
        assert_eq!(config.validity_years, 10);
        assert_eq!(config.output_dir, PathBuf::new());
        assert_eq!(
            OutputPaths::in_dir(&config.output_dir).cert_der,
            PathBuf::from("ca.cer")
        );
    }

    #[test]
    fn test_issue_truncates_to_whole_seconds() {
        let config = RootCaConfig::builder().key_bits(2048).build();
        let clock = FixedClock(datetime!(2024-03-05 23:59:59.999 UTC));
        let root = RootCa::issue(&config, &clock, &mut OsRng).unwrap();

        let validity = root.certificate.validity().unwrap();
        assert_eq!(validity.not_before, datetime!(2024-03-05 23:59:59 UTC));
        assert_eq!(validity.not_after, datetime!(2034-03-05 23:59:59 UTC));
        assert_eq!(root.certificate.serial_number().unwrap(), 20240305);
    }

    #[test]
    fn test_serial_uses_utc_date() {
        let config = RootCaConfig::builder().key_bits(2048).build();
        // 2024-03-05 22:30 at -05:00 is already March 6th in UTC.
        let clock = FixedClock(datetime!(2024-03-05 22:30:00 -5));
        let root = RootCa::issue(&config, &clock, &mut OsRng).unwrap();
        assert_eq!(root.certificate.serial_number().unwrap(), 20240306);
    }

    #[test]
    fn test_degenerate_key_size_is_key_generation_failure() {
        let config = RootCaConfig::builder().key_bits(0).build();
        let clock = FixedClock(datetime!(2024-03-05 00:00:00 UTC));
        assert!(matches!(
            RootCa::issue(&config, &clock, &mut OsRng),
            Err(CaError::KeyGeneration(_))
        ));
    }
}
