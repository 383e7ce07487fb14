pub mod extensions;
pub mod params;

use der::asn1::{Any, AnyRef};
use der::{Decode, Encode};
use extensions::ToAndFromX509Extension;
use params::{CertificateDescriptor, DistinguishedName, Validity};
use rand_core::CryptoRngCore;
use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature as RsaSignature, VerifyingKey as RsaVerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use sha2::Sha256;
use x509_cert::certificate::CertificateInner;

use crate::error::{CaError, Result};
use crate::issuer::Issuer;
use crate::key::KeyPair;
use crate::pem_utils;
use crate::tbs_certificate::TbsCertificate;

/// PEM label for certificates.
pub const CERTIFICATE_PEM_LABEL: &str = "CERTIFICATE";

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    #[default]
    Sha256WithRSA,
}

impl SignatureAlgorithm {
    /// Looks up the algorithm for a signature `AlgorithmIdentifier`.
    pub fn from_algorithm_identifier(
        algorithm: &x509_cert::spki::AlgorithmIdentifierOwned,
    ) -> Result<Self> {
        match algorithm.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Ok(Self::Sha256WithRSA),
            other => Err(CaError::DecodingError(format!(
                "Unsupported signature algorithm {other}"
            ))),
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA PKCS#1 v1.5 identifiers carry explicit NULL parameters (RFC 4055).
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(Any::from(AnyRef::NULL)),
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats, read it back, and inspect the fields the root CA relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CaError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format (`CERTIFICATE`, LF line endings).
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CERTIFICATE_PEM_LABEL))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    pub fn from_pem(pem: &str) -> Result<Self> {
        Self::from_der(&pem_utils::pem_to_der(pem, CERTIFICATE_PEM_LABEL)?)
    }

    /// Decodes the to-be-signed portion into a [`TbsCertificate`].
    pub fn tbs_certificate(&self) -> Result<TbsCertificate> {
        TbsCertificate::from_tbs_certificate_inner(&self.inner.tbs_certificate)
    }

    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// The serial number as an unsigned integer.
    pub fn serial_number(&self) -> Result<u64> {
        let bytes = self.inner.tbs_certificate.serial_number.as_bytes();
        let bytes = match bytes.split_first() {
            Some((0, rest)) => rest,
            _ => bytes,
        };
        if bytes.len() > 8 {
            return Err(CaError::DecodingError(format!(
                "serial number of {} bytes does not fit in u64",
                bytes.len()
            )));
        }
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn validity(&self) -> Result<Validity> {
        let tbs = self.tbs_certificate()?;
        Ok(Validity {
            not_before: tbs.not_before,
            not_after: tbs.not_after,
        })
    }

    /// The certified RSA public key.
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        let spki_der = self.inner.tbs_certificate.subject_public_key_info.to_der()?;
        RsaPublicKey::from_public_key_der(&spki_der)
            .map_err(|e| CaError::DecodingError(e.to_string()))
    }

    /// Finds the extension `E`, returning its criticality and decoded value.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<(bool, E)>> {
        let tbs = self.tbs_certificate()?;
        match tbs.extensions.iter().find(|ext| ext.oid == E::OID) {
            Some(ext) => Ok(Some((ext.critical, ext.to_extension::<E>()?))),
            None => Ok(None),
        }
    }

    /// Checks the certificate signature against `public_key`.
    pub fn verify_signature(&self, public_key: &RsaPublicKey) -> Result<()> {
        let outer = SignatureAlgorithm::from_algorithm_identifier(&self.inner.signature_algorithm)?;
        let inner =
            SignatureAlgorithm::from_algorithm_identifier(&self.inner.tbs_certificate.signature)?;
        if outer != inner {
            return Err(CaError::Verification(
                "signature algorithm differs between certificate and TBS".to_string(),
            ));
        }

        let signature_bytes = self.inner.signature.as_bytes().ok_or_else(|| {
            CaError::DecodingError("signature has unused bits".to_string())
        })?;
        let tbs_der = self.inner.tbs_certificate.to_der()?;

        match outer {
            SignatureAlgorithm::Sha256WithRSA => {
                let verifying_key = RsaVerifyingKey::<Sha256>::new(public_key.clone());
                let signature = RsaSignature::try_from(signature_bytes)
                    .map_err(|e| CaError::Verification(e.to_string()))?;
                verifying_key
                    .verify(&tbs_der, &signature)
                    .map_err(|e| CaError::Verification(e.to_string()))
            }
        }
    }

    /// Whether issuer equals subject and the embedded key verifies the signature.
    pub fn is_self_signed(&self) -> Result<bool> {
        let tbs = &self.inner.tbs_certificate;
        if tbs.issuer != tbs.subject {
            return Ok(false);
        }
        match self.verify_signature(&self.public_key()?) {
            Ok(()) => Ok(true),
            Err(CaError::Verification(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Creates a new self-signed certificate.
    ///
    /// # Arguments
    /// * `descriptor` - What to certify. Its subject doubles as the issuer.
    /// * `key` - The key pair used to sign the certificate.
    /// * `rng` - Randomness for RSA blinding.
    pub fn new_self_signed<R: CryptoRngCore>(
        descriptor: &CertificateDescriptor,
        key: &KeyPair,
        rng: &mut R,
    ) -> Result<Self> {
        // For self-signed certificates, the issuer is the same as the subject
        let self_issuer = SelfIssuer {
            name: descriptor.subject.clone(),
            key,
        };
        self_issuer.issue(descriptor, rng)
    }
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: DistinguishedName,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> DistinguishedName {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}
