use serde::{Deserialize, Deserializer};

use crate::error::{AppError, Result};

/// Deserializes `""` (and whitespace) as `None`. The dashboard sends empty
/// strings for untouched optional inputs.
pub fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Validates an upstream record id taken from a path or form field.
///
/// # Arguments
///
/// * `kind` - What the id refers to, used in the error message.
/// * `id` - The id to validate.
pub fn validate_record_id(kind: &str, id: i64) -> Result<i64> {
    if id < 1 {
        return Err(AppError::Validation(format!("{} ID is required", kind)));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct ContactForm {
        #[serde(default, deserialize_with = "empty_as_none")]
        email: Option<String>,
    }

    #[test]
    fn blank_strings_become_none() {
        let form: ContactForm = sonic_rs::from_str(r#"{"email":"  "}"#).unwrap();
        assert!(form.email.is_none());
        let form: ContactForm = sonic_rs::from_str(r#"{}"#).unwrap();
        assert!(form.email.is_none());
        let form: ContactForm = sonic_rs::from_str(r#"{"email":"a@b.io"}"#).unwrap();
        assert_eq!(form.email.as_deref(), Some("a@b.io"));
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(validate_record_id("Brand", 0).is_err());
        assert_eq!(validate_record_id("Brand", 7).unwrap(), 7);
    }
}
