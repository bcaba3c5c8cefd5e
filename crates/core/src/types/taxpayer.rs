//! Brazilian taxpayer identifier types (CPF and CNPJ).
//!
//! Both identifiers carry two trailing check digits computed from the
//! preceding digits with a weighted sum modulo 11. The types here strip
//! formatting punctuation, verify the check digits, and store the canonical
//! digit string.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cpf`] or [`Cnpj`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxpayerIdError {
    /// The input does not contain the expected number of digits.
    #[error("expected {expected} digits, found {found}")]
    WrongLength {
        /// Digit count required by the identifier kind.
        expected: usize,
        /// Digit count found after stripping formatting characters.
        found: usize,
    },
    /// Every digit is identical. Sequences like `000.000.000-00` satisfy
    /// the check-digit arithmetic but are rejected by the registry.
    #[error("repeated single-digit sequences are not valid identifiers")]
    RepeatedDigits,
    /// The trailing check digits do not match the computed values.
    #[error("check digits do not match")]
    CheckDigitMismatch,
}

const CPF_LENGTH: usize = 11;
const CNPJ_LENGTH: usize = 14;

// Weight tables for the first and second check digits. CPF weights descend
// from 10 (resp. 11) down to 2; CNPJ uses the cyclic tables published by
// the federal registry.
const CPF_WEIGHTS_FIRST: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_WEIGHTS_SECOND: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Collect the decimal digits of `raw`, ignoring any other character.
fn strip_digits(raw: &str) -> Vec<u8> {
    raw.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Weighted sum modulo 11 over `digits`, truncated to the weight table.
#[allow(clippy::cast_possible_truncation)] // 11 - remainder is in 2..=9
fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        remainder => (11 - remainder) as u8,
    }
}

/// Shared verification for both identifier kinds.
fn verify_digits(
    digits: &[u8],
    length: usize,
    first_weights: &[u32],
    second_weights: &[u32],
) -> Result<(), TaxpayerIdError> {
    if digits.len() != length {
        return Err(TaxpayerIdError::WrongLength {
            expected: length,
            found: digits.len(),
        });
    }

    // Registry denylist, not derivable from the arithmetic.
    if let Some(&head) = digits.first()
        && digits.iter().all(|&d| d == head)
    {
        return Err(TaxpayerIdError::RepeatedDigits);
    }

    let mut prefix: Vec<u8> = digits.iter().take(length - 2).copied().collect();
    let first = check_digit(&prefix, first_weights);
    prefix.push(first);
    let second = check_digit(&prefix, second_weights);

    if digits.get(length - 2) == Some(&first) && digits.get(length - 1) == Some(&second) {
        Ok(())
    } else {
        Err(TaxpayerIdError::CheckDigitMismatch)
    }
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}

/// A CPF, the Brazilian individual taxpayer registry number.
///
/// Stored as its canonical 11-digit string. Formatting characters in the
/// input (dots, dash, spaces) are stripped before validation, so
/// `"012.345.678-90"` and `"01234567890"` parse to the same value.
///
/// ## Examples
///
/// ```
/// use quitanda_core::Cpf;
///
/// assert!(Cpf::validate("111.444.777-35"));
/// assert!(Cpf::validate("11144477735"));
///
/// assert!(!Cpf::validate("111.444.777-36")); // corrupted check digit
/// assert!(!Cpf::validate("000.000.000-00")); // repeated-digit sequence
/// assert!(!Cpf::validate(""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Number of digits in a CPF.
    pub const LENGTH: usize = CPF_LENGTH;

    /// Parse a `Cpf` from a string, stripping formatting characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not contain exactly 11 digits,
    /// is a repeated single-digit sequence, or fails the check digits.
    pub fn parse(raw: &str) -> Result<Self, TaxpayerIdError> {
        let digits = strip_digits(raw);
        verify_digits(&digits, CPF_LENGTH, &CPF_WEIGHTS_FIRST, &CPF_WEIGHTS_SECOND)?;
        Ok(Self(digits_to_string(&digits)))
    }

    /// Whether `raw` is a valid CPF. Never panics; malformed input is
    /// simply invalid.
    #[must_use]
    pub fn validate(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Returns the canonical 11-digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Cpf` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Renders the conventional `XXX.XXX.XXX-XX` form.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // canonical value is 11 ASCII digits
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cpf {
    type Err = TaxpayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A CNPJ, the Brazilian company taxpayer registry number.
///
/// Stored as its canonical 14-digit string. Formatting characters in the
/// input (dots, slash, dash) are stripped before validation.
///
/// ## Examples
///
/// ```
/// use quitanda_core::Cnpj;
///
/// assert!(Cnpj::validate("11.222.333/0001-81"));
/// assert!(Cnpj::validate("11222333000181"));
///
/// assert!(!Cnpj::validate("11.222.333/0001-82"));
/// assert!(!Cnpj::validate("11.111.111/1111-11")); // repeated-digit sequence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cnpj(String);

impl Cnpj {
    /// Number of digits in a CNPJ.
    pub const LENGTH: usize = CNPJ_LENGTH;

    /// Parse a `Cnpj` from a string, stripping formatting characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not contain exactly 14 digits,
    /// is a repeated single-digit sequence, or fails the check digits.
    pub fn parse(raw: &str) -> Result<Self, TaxpayerIdError> {
        let digits = strip_digits(raw);
        verify_digits(
            &digits,
            CNPJ_LENGTH,
            &CNPJ_WEIGHTS_FIRST,
            &CNPJ_WEIGHTS_SECOND,
        )?;
        Ok(Self(digits_to_string(&digits)))
    }

    /// Whether `raw` is a valid CNPJ. Never panics; malformed input is
    /// simply invalid.
    #[must_use]
    pub fn validate(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Returns the canonical 14-digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Cnpj` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Renders the conventional `XX.XXX.XXX/XXXX-XX` form.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // canonical value is 14 ASCII digits
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        )
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cnpj {
    type Err = TaxpayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cnpj {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature). Database values are assumed valid.
#[cfg(feature = "postgres")]
macro_rules! impl_taxpayer_sqlx {
    ($name:ident) => {
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(Self(s))
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

#[cfg(feature = "postgres")]
impl_taxpayer_sqlx!(Cpf);
#[cfg(feature = "postgres")]
impl_taxpayer_sqlx!(Cnpj);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_cpf() {
        assert!(Cpf::validate("111.444.777-35"));
        assert!(Cpf::validate("012.345.678-90"));
        assert!(Cpf::validate("529.982.247-25"));
    }

    #[test]
    fn test_single_digit_corruption_flips_cpf() {
        assert!(Cpf::validate("111.444.777-35"));
        assert!(!Cpf::validate("111.444.777-36"));
        assert!(!Cpf::validate("111.444.778-35"));
    }

    #[test]
    fn test_repeated_digit_sequences_rejected() {
        // These satisfy the check-digit arithmetic but are denylisted.
        for d in 0u8..=9 {
            let cpf: String = char::from(b'0' + d).to_string().repeat(11);
            assert_eq!(Cpf::parse(&cpf), Err(TaxpayerIdError::RepeatedDigits));
        }
        assert_eq!(
            Cpf::parse("000.000.000-00"),
            Err(TaxpayerIdError::RepeatedDigits)
        );
        assert_eq!(
            Cnpj::parse("11.111.111/1111-11"),
            Err(TaxpayerIdError::RepeatedDigits)
        );
    }

    #[test]
    fn test_formatting_characters_are_stripped() {
        assert_eq!(
            Cpf::validate("012.345.678-90"),
            Cpf::validate("01234567890")
        );
        assert_eq!(
            Cpf::parse("012.345.678-90").unwrap(),
            Cpf::parse("01234567890").unwrap()
        );
        assert_eq!(
            Cnpj::parse("11.222.333/0001-81").unwrap(),
            Cnpj::parse("11222333000181").unwrap()
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            Cpf::parse(""),
            Err(TaxpayerIdError::WrongLength {
                expected: 11,
                found: 0
            })
        );
        assert_eq!(
            Cpf::parse("123"),
            Err(TaxpayerIdError::WrongLength {
                expected: 11,
                found: 3
            })
        );
        assert_eq!(
            Cpf::parse("111.444.777-350"),
            Err(TaxpayerIdError::WrongLength {
                expected: 11,
                found: 12
            })
        );
        assert_eq!(
            Cnpj::parse("11.222.333/0001"),
            Err(TaxpayerIdError::WrongLength {
                expected: 14,
                found: 11
            })
        );
    }

    #[test]
    fn test_punctuation_only_input() {
        assert_eq!(
            Cpf::parse(".../---"),
            Err(TaxpayerIdError::WrongLength {
                expected: 11,
                found: 0
            })
        );
    }

    #[test]
    fn test_known_valid_cnpj() {
        assert!(Cnpj::validate("11.222.333/0001-81"));
        assert!(Cnpj::validate("06.990.590/0001-23"));
        assert!(!Cnpj::validate("11.222.333/0001-82"));
    }

    #[test]
    fn test_check_digits_match_algorithm() {
        // For arbitrary non-repeated bases, an identifier is valid exactly
        // when its two trailing digits are the computed check digits.
        for base in ["111444777", "012345678", "529982247", "123456789"] {
            let digits: Vec<u8> = base.bytes().map(|b| b - b'0').collect();
            let mut prefix = digits.clone();
            let d1 = check_digit(&prefix, &CPF_WEIGHTS_FIRST);
            prefix.push(d1);
            let d2 = check_digit(&prefix, &CPF_WEIGHTS_SECOND);

            let valid = format!("{base}{d1}{d2}");
            assert!(Cpf::validate(&valid), "{valid} should be valid");

            let wrong_d2 = (d2 + 1) % 10;
            let invalid = format!("{base}{d1}{wrong_d2}");
            assert!(!Cpf::validate(&invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn test_validator_is_pure() {
        let input = "111.444.777-35";
        assert_eq!(Cpf::validate(input), Cpf::validate(input));
        let bad = "111.444.777-36";
        assert_eq!(Cpf::validate(bad), Cpf::validate(bad));
    }

    #[test]
    fn test_parse_canonicalizes() {
        let cpf = Cpf::parse("111.444.777-35").unwrap();
        assert_eq!(cpf.as_str(), "11144477735");
        assert_eq!(cpf.formatted(), "111.444.777-35");
        assert_eq!(cpf.to_string(), "111.444.777-35");

        let cnpj = Cnpj::parse("11222333000181").unwrap();
        assert_eq!(cnpj.as_str(), "11222333000181");
        assert_eq!(cnpj.formatted(), "11.222.333/0001-81");
    }

    #[test]
    fn test_from_str() {
        let cpf: Cpf = "111.444.777-35".parse().unwrap();
        assert_eq!(cpf.as_str(), "11144477735");
        assert!("not-a-cpf".parse::<Cpf>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let cpf = Cpf::parse("111.444.777-35").unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"11144477735\"");

        let parsed: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cpf);
    }
}
