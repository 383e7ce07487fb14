use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{Any, PrintableStringRef, SetOfVec, Utf8StringRef};
use rsa::RsaPublicKey;
use time::{Date, Month, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::SignatureAlgorithm;
use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
use crate::cert::extensions::{FlagSet, KeyUsages};
use crate::error::{CaError, Result};

/// Describes the certificate to be issued.
///
/// # Fields
/// * `serial_number` - Certificate serial, see [`serial_for_date`].
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key being certified.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `is_ca` - Value of the basicConstraints `cA` flag.
/// * `basic_constraints_valid` - Whether the basicConstraints extension is emitted at all.
/// * `key_usage` - keyUsage bits; omitted from the certificate when empty.
/// * `usages` - extKeyUsage purposes; omitted from the certificate when empty.
/// * `signature_algorithm` - The algorithm the issuer signs with.
#[derive(Clone, Debug, Builder)]
pub struct CertificateDescriptor {
    pub serial_number: u32,
    pub subject: DistinguishedName,
    pub subject_public_key: RsaPublicKey,
    pub validity: Validity,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub basic_constraints_valid: bool,
    #[builder(default)]
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

/// Distinguished name of a certificate subject or issuer.
///
/// Encoded as `O=<organization>, CN=<common_name>`, organization first.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(into)]
    pub common_name: String,
    #[builder(into)]
    pub organization: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509-compatible format.
    ///
    /// Each attribute gets its own RDN. Values are `PrintableString` where
    /// the character set allows, `UTF8String` otherwise.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName> {
        let mut rdns = Vec::new();
        if let Some(organization) = &self.organization {
            rdns.push(rdn(const_oid::db::rfc4519::ORGANIZATION_NAME, organization)?);
        }
        rdns.push(rdn(const_oid::db::rfc4519::COMMON_NAME, &self.common_name)?);
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// Attributes other than CN and O are ignored.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Result<Self> {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let value = || {
                    std::str::from_utf8(attr.value.value())
                        .map(str::to_string)
                        .map_err(|e| CaError::DecodingError(e.to_string()))
                };
                if attr.oid == const_oid::db::rfc4519::COMMON_NAME {
                    dn.common_name = value()?;
                } else if attr.oid == const_oid::db::rfc4519::ORGANIZATION_NAME {
                    dn.organization = Some(value()?);
                }
            }
        }

        Ok(dn)
    }
}

fn rdn(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    let value = match PrintableStringRef::new(value) {
        Ok(printable) => Any::encode_from(&printable)?,
        Err(_) => Any::encode_from(&Utf8StringRef::new(value)?)?,
    };
    let set = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])?;
    Ok(RelativeDistinguishedName(set))
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A window of `years` calendar years starting at `not_before`.
    ///
    /// The year is added to the calendar date; time of day is kept. A
    /// February 29 start whose target year is not a leap year ends on
    /// February 28.
    pub fn for_calendar_years(not_before: OffsetDateTime, years: i32) -> Result<Self> {
        let start = not_before.date();
        let target_year = start
            .year()
            .checked_add(years)
            .ok_or_else(|| CaError::InvalidInput(format!("{years} years overflows")))?;

        let end = match start.replace_year(target_year) {
            Ok(end) => end,
            Err(_) if start.month() == Month::February && start.day() == 29 => {
                Date::from_calendar_date(target_year, Month::February, 28)?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            not_before,
            not_after: not_before.replace_date(end),
        })
    }
}

/// Serial number derived from the issuance date: `YYYY*10000 + MM*100 + DD`.
///
/// 2024-03-05 gives `20240305`.
pub fn serial_for_date(date: Date) -> Result<u32> {
    let year = u32::try_from(date.year())
        .map_err(|_| CaError::InvalidInput(format!("year {} precedes year 0", date.year())))?;
    Ok(year * 10000 + u32::from(u8::from(date.month())) * 100 + u32::from(date.day()))
}

/// Represents an X.509 extension.
///
/// This struct contains the OID, criticality, and value of an extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: &E,
        critical: bool,
    ) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Tagged;
    use time::macros::{date, datetime};

    #[test]
    fn test_serial_for_date() {
        assert_eq!(serial_for_date(date!(2024 - 03 - 05)).unwrap(), 20240305);
        assert_eq!(serial_for_date(date!(2026 - 12 - 31)).unwrap(), 20261231);
    }

    #[test]
    fn test_ten_years_keeps_date_and_time() {
        let validity =
            Validity::for_calendar_years(datetime!(2024-03-05 13:14:15 UTC), 10).unwrap();
        assert_eq!(validity.not_after, datetime!(2034-03-05 13:14:15 UTC));
    }

    #[test]
    fn test_ten_years_spans_leap_days() {
        // 2028 and 2032 contribute a leap day each; no fixed day count would do.
        let validity =
            Validity::for_calendar_years(datetime!(2026-01-10 00:00:00 UTC), 10).unwrap();
        assert_eq!(validity.not_after, datetime!(2036-01-10 00:00:00 UTC));
        assert_eq!(
            (validity.not_after - validity.not_before).whole_days(),
            365 * 10 + 2
        );
    }

    #[test]
    fn test_leap_day_start_clamps_to_february_28() {
        let validity =
            Validity::for_calendar_years(datetime!(2024-02-29 08:00:00 UTC), 10).unwrap();
        assert_eq!(validity.not_after, datetime!(2034-02-28 08:00:00 UTC));
    }

    #[test]
    fn test_distinguished_name_order_and_round_trip() {
        let dn = DistinguishedName::builder()
            .common_name("Acme Root CA")
            .organization("Acme Corporation")
            .build();
        let x509 = dn.as_x509_name().unwrap();
        assert_eq!(x509.to_string(), "CN=Acme Root CA,O=Acme Corporation");
        assert_eq!(
            x509.0[0].0.iter().next().unwrap().oid,
            const_oid::db::rfc4519::ORGANIZATION_NAME
        );
        assert_eq!(DistinguishedName::from_x509_name(&x509).unwrap(), dn);
    }

    #[test]
    fn test_non_printable_value_uses_utf8_string() {
        let dn = DistinguishedName::builder().common_name("Ünïcode CA").build();
        let x509 = dn.as_x509_name().unwrap();
        let attr = x509.0[0].0.iter().next().unwrap();
        assert_eq!(attr.value.tag(), der::Tag::Utf8String);
        assert_eq!(DistinguishedName::from_x509_name(&x509).unwrap(), dn);
    }
}
