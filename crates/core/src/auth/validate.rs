//! Input shape checks shared by signup and the transfer engine.

/// Checks the simple email shape `local@domain.tld`.
///
/// Mirrors the lenient check used at signup: at least one character before
/// the `@`, and a domain containing a `.` with characters on both sides.
/// This is a shape check, not RFC 5322 validation.
#[must_use]
pub fn valid_email_shape(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Returns true for strings with at least one non-whitespace character.
#[must_use]
pub fn non_empty_trimmed(s: &str) -> bool {
    !s.trim().is_empty()
}
