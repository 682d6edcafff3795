use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::identity::OAuthProfile;

/// The profile fields sign-in requires.
#[derive(Debug, Validate)]
struct RequiredProfile {
    #[garde(required, email)]
    email: Option<String>,
    #[garde(required, length(min = 1, max = 255))]
    name: Option<String>,
}

/// A profile that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProfile {
    pub email: String,
    pub name: String,
    pub picture: String,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates an identity provider profile.
///
/// # Arguments
///
/// * `profile` - The profile returned by the identity provider.
///
/// # Returns
///
/// A `Result` containing the `VerifiedProfile`, or `SignInRejected` when
/// the email or name is missing or malformed.
pub fn validate_profile(profile: &OAuthProfile) -> Result<VerifiedProfile> {
    let required = RequiredProfile {
        email: trimmed(&profile.email),
        name: trimmed(&profile.name),
    };

    required.validate().map_err(|report| {
        tracing::error!("Profile is missing required fields: {}", report);
        AppError::SignInRejected("Profile is missing required fields".to_string())
    })?;

    match (required.email, required.name) {
        (Some(email), Some(name)) => Ok(VerifiedProfile {
            email,
            name,
            picture: profile.picture.clone().unwrap_or_default(),
        }),
        _ => Err(AppError::SignInRejected(
            "Profile is missing required fields".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: Option<&str>, name: Option<&str>) -> OAuthProfile {
        OAuthProfile {
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            picture: None,
        }
    }

    #[test]
    fn complete_profile_keeps_the_email_as_given() {
        let verified = validate_profile(&profile(Some(" Ada@Example.com "), Some("Ada"))).unwrap();
        assert_eq!(verified.email, "Ada@Example.com");
        assert_eq!(verified.name, "Ada");
        assert_eq!(verified.picture, "");
    }

    #[test]
    fn missing_email_or_name_is_rejected() {
        for p in [
            profile(None, Some("Ada")),
            profile(Some("ada@example.com"), None),
            profile(Some("   "), Some("Ada")),
            profile(Some("not-an-email"), Some("Ada")),
        ] {
            assert!(matches!(validate_profile(&p), Err(AppError::SignInRejected(_))));
        }
    }
}
