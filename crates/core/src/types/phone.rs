//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A phone number as entered by a user.
///
/// The host platform treats phone fields as free text: values are stored
/// exactly as submitted and read back without normalization, so this type
/// performs no validation. An empty value means "no number on file".
///
/// Phone numbers are personal data. Use [`PhoneNumber::masked`] whenever a
/// number might end up in logs or error output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a phone number from the submitted text.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns true if no number is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Masked form for logging: all but the last four characters hidden.
    ///
    /// ```
    /// use dialout_core::PhoneNumber;
    ///
    /// assert_eq!(PhoneNumber::new("+15550100199").masked(), "***0199");
    /// assert_eq!(PhoneNumber::new("0199").masked(), "****");
    /// ```
    #[must_use]
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count <= 4 {
            "****".to_string()
        } else {
            let tail: String = self.0.chars().skip(count - 4).collect();
            format!("***{tail}")
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PhoneNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PhoneNumber {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_verbatim() {
        // Free text is accepted as-is, including formatting characters.
        let phone = PhoneNumber::new("+1 (555) 010-0199");
        assert_eq!(phone.as_str(), "+1 (555) 010-0199");
    }

    #[test]
    fn test_empty_means_absent() {
        assert!(PhoneNumber::new("").is_empty());
        assert!(PhoneNumber::default().is_empty());
        assert!(!PhoneNumber::new("5550100").is_empty());
    }

    #[test]
    fn test_masked_keeps_last_four() {
        assert_eq!(PhoneNumber::new("+15550100199").masked(), "***0199");
    }

    #[test]
    fn test_masked_short_values_fully_hidden() {
        assert_eq!(PhoneNumber::new("199").masked(), "****");
        assert_eq!(PhoneNumber::new("0199").masked(), "****");
        assert_eq!(PhoneNumber::new("").masked(), "****");
    }

    #[test]
    fn test_display() {
        let phone = PhoneNumber::new("+15550100199");
        assert_eq!(format!("{phone}"), "+15550100199");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::new("+15550100199");
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+15550100199\"");

        let parsed: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
