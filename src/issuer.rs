use der::Encode;
use rand_core::CryptoRngCore;
use x509_cert::certificate::CertificateInner;

use crate::cert::Certificate;
use crate::cert::extensions::BasicConstraints;
use crate::cert::extensions::ExtendedKeyUsage;
use crate::cert::extensions::KeyUsage;
use crate::cert::extensions::SubjectKeyIdentifier;
use crate::cert::params::{CertificateDescriptor, DistinguishedName, ExtensionParam};
use crate::error::{CaError, Result};
use crate::key::{KeyPair, rsa_spki};
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Issues a certificate for `descriptor`, signed with [`Issuer::signing_key`].
    ///
    /// Extensions are emitted in the order keyUsage (critical), extKeyUsage,
    /// basicConstraints (critical), subjectKeyIdentifier. Each is skipped when
    /// the descriptor leaves it empty; the subject key identifier is only
    /// added for CA certificates.
    fn issue<R: CryptoRngCore>(
        &self,
        descriptor: &CertificateDescriptor,
        rng: &mut R,
    ) -> Result<Certificate> {
        let mut extensions: Vec<ExtensionParam> = Vec::new();

        if !descriptor.key_usage.is_empty() {
            let key_usage = KeyUsage(descriptor.key_usage);
            extensions.push(ExtensionParam::from_extension(&key_usage, true)?);
        }

        if !descriptor.usages.is_empty() {
            let extended_key_usage = ExtendedKeyUsage {
                usage: descriptor.usages.clone(),
            };
            extensions.push(ExtensionParam::from_extension(&extended_key_usage, false)?);
        }

        if descriptor.basic_constraints_valid {
            let basic_constraints = BasicConstraints {
                is_ca: descriptor.is_ca,
                max_path_length: None,
            };
            extensions.push(ExtensionParam::from_extension(&basic_constraints, true)?);
        }

        if descriptor.is_ca {
            let subject_spki = rsa_spki(&descriptor.subject_public_key)?;
            let key_id = SubjectKeyIdentifier::for_spki(&subject_spki);
            extensions.push(ExtensionParam::from_extension(&key_id, false)?);
        }

        let tbs_cert = TbsCertificate {
            serial_number: descriptor.serial_number.to_be_bytes().to_vec(),
            signature_algorithm: descriptor.signature_algorithm,
            issuer: self.issuer_name(),
            not_before: descriptor.validity.not_before,
            not_after: descriptor.validity.not_after,
            subject: descriptor.subject.clone(),
            subject_public_key: descriptor.subject_public_key.clone(),
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| CaError::EncodingError(e.to_string()))?;

        let signature = self.signing_key().sign_data(rng, &tbs_der)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: descriptor.signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| CaError::Signing(e.to_string()))?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}
