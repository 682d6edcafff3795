use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// The size of the OAuth `state` value in bytes.
const STATE_SIZE: usize = 32;

/// Generates a new random `state` value for the authorize redirect.
///
/// # Returns
///
/// A URL-safe base64-encoded string.
pub fn generate_oauth_state() -> String {
    let mut state = [0u8; STATE_SIZE];
    OsRng.fill_bytes(&mut state);

    general_purpose::URL_SAFE_NO_PAD.encode(state)
}

/// Compares the `state` echoed by the identity provider with the one we issued.
pub fn states_match(issued: &str, returned: &str) -> bool {
    !issued.is_empty() && bool::from(issued.as_bytes().ct_eq(returned.as_bytes()))
}
