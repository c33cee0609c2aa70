//! Masking helpers for identities that end up in log fields

/// Mask a caller-supplied key for logging (e.g. `***5678`)
///
/// Keys of four characters or fewer are fully masked. Works on characters,
/// not bytes, so e-mail addresses and non-ASCII ids are safe to pass.
pub fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("***{}", tail)
}
