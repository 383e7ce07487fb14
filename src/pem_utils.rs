use crate::error::{CaError, Result};

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
///
/// Lines are wrapped at 64 characters and end in LF.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes, insisting on `expected_label`.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != expected_label {
        return Err(CaError::DecodingError(format!(
            "expected PEM block {expected_label}, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_at_64_with_lf() {
        let pem = der_to_pem(&[0x5a; 96], "CERTIFICATE");
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines[0], "-----BEGIN CERTIFICATE-----");
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines.last(), Some(&"-----END CERTIFICATE-----"));
        assert!(!pem.contains('\r'));
        assert!(pem.ends_with('\n'));
    }

    #[test]
    fn test_label_mismatch_is_rejected() {
        let pem = der_to_pem(&[1, 2, 3], "RSA PRIVATE KEY");
        assert_eq!(pem_to_der(&pem, "RSA PRIVATE KEY").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            pem_to_der(&pem, "CERTIFICATE"),
            Err(CaError::DecodingError(_))
        ));
    }
}
