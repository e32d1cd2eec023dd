//! Session code generation

use rand::Rng;

use tablepick_domain::SessionCode;

const CODE_LEN: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random shareable session code (6 uppercase alphanumerics).
///
/// Uniqueness is not guaranteed here; a collision surfaces as a
/// creation error from the store and the caller retries with a new code.
pub fn generate_session_code() -> SessionCode {
    let mut rng = rand::thread_rng();
    let code: String = (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    SessionCode::new(code)
}
