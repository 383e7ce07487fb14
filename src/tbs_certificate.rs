use std::time::Duration;

use der::Encode;
use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam};
use crate::error::{CaError, Result};
use crate::key::rsa_spki;

/// Dates from this year on must be encoded as `GeneralizedTime` (RFC 5280, 4.1.2.5).
const GENERALIZED_TIME_FROM_YEAR: u16 = 2050;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
/// This struct contains all the fields required to generate a valid X.509 certificate.
///
/// # Fields
/// * `serial_number` - Big-endian serial number bytes.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `not_before` - The start of the certificate's validity period.
/// * `not_after` - The end of the certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
#[derive(Clone, Debug)]
pub struct TbsCertificate {
    /// Certificate serial number
    pub serial_number: Vec<u8>,
    /// Certificate signature algorithm
    pub signature_algorithm: SignatureAlgorithm,
    /// Certificate issuer distinguished name
    pub issuer: DistinguishedName,
    /// Not before time, whole seconds
    pub not_before: OffsetDateTime,
    /// Not after time, whole seconds
    pub not_after: OffsetDateTime,
    /// Certificate subject distinguished name
    pub subject: DistinguishedName,
    /// Subject's public key
    pub subject_public_key: RsaPublicKey,
    /// Certificate extensions
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let algorithm_id: x509_cert::spki::AlgorithmIdentifierOwned =
            self.signature_algorithm.into();

        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                OctetString::new(ext.value.clone())
                    .map(|extn_value| x509_cert::ext::Extension {
                        extn_id: ext.oid,
                        critical: ext.critical,
                        extn_value,
                    })
                    .map_err(CaError::from)
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())?;

        let subject_public_key_info = rsa_spki(&self.subject_public_key)?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: algorithm_id,
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: if self.extensions.is_empty() {
                None
            } else {
                Some(extensions)
            },
        })
    }

    /// Creates a `TbsCertificate` from a `TbsCertificateInner`.
    pub fn from_tbs_certificate_inner(inner: &TbsCertificateInner) -> Result<Self> {
        let issuer = DistinguishedName::from_x509_name(&inner.issuer)?;
        let subject = DistinguishedName::from_x509_name(&inner.subject)?;
        let subject_public_key =
            RsaPublicKey::from_public_key_der(&inner.subject_public_key_info.to_der()?)
                .map_err(|e| CaError::DecodingError(e.to_string()))?;

        let extensions = inner
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect::<Vec<_>>();

        Ok(Self {
            serial_number: inner.serial_number.as_bytes().into(),
            signature_algorithm: SignatureAlgorithm::from_algorithm_identifier(&inner.signature)?,
            issuer,
            not_before: from_x509_time(&inner.validity.not_before)?,
            not_after: from_x509_time(&inner.validity.not_after)?,
            subject,
            subject_public_key,
            extensions,
        })
    }
}

/// `UTCTime` through 2049, `GeneralizedTime` afterwards. Sub-second precision is dropped.
fn to_x509_time(instant: OffsetDateTime) -> Result<Time> {
    let secs = u64::try_from(instant.unix_timestamp())
        .map_err(|_| CaError::InvalidInput(format!("{instant} precedes the Unix epoch")))?;
    let date_time = der::DateTime::from_unix_duration(Duration::from_secs(secs))?;
    if date_time.year() < GENERALIZED_TIME_FROM_YEAR {
        Ok(Time::UtcTime(UtcTime::from_date_time(date_time)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_date_time(date_time)))
    }
}

fn from_x509_time(time: &Time) -> Result<OffsetDateTime> {
    let since_epoch = match time {
        Time::UtcTime(ut) => ut.to_unix_duration(),
        Time::GeneralTime(gt) => gt.to_unix_duration(),
    };
    let secs = i64::try_from(since_epoch.as_secs())
        .map_err(|e| CaError::DecodingError(e.to_string()))?;
    OffsetDateTime::from_unix_timestamp(secs).map_err(|e| CaError::DecodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_time_encoding_switches_at_2050() {
        assert!(matches!(
            to_x509_time(datetime!(2049-12-31 23:59:59 UTC)).unwrap(),
            Time::UtcTime(_)
        ));
        assert!(matches!(
            to_x509_time(datetime!(2050-01-01 00:00:00 UTC)).unwrap(),
            Time::GeneralTime(_)
        ));
    }

    #[test]
    fn test_time_round_trip_drops_subseconds() {
        let instant = datetime!(2060-02-29 12:34:56.789 UTC);
        let decoded = from_x509_time(&to_x509_time(instant).unwrap()).unwrap();
        assert_eq!(decoded, datetime!(2060-02-29 12:34:56 UTC));
    }

    #[test]
    fn test_pre_epoch_is_rejected() {
        assert!(matches!(
            to_x509_time(datetime!(1960-01-01 00:00:00 UTC)),
            Err(CaError::InvalidInput(_))
        ));
    }
}
