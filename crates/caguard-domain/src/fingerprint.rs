use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a per-policy finding.
///
/// Identity fields:
/// - check id
/// - code (naming code, violation kind or practice id)
/// - policy name
/// - discriminator (offending value, if any)
pub fn fingerprint_for_policy(
    check_id: &str,
    code: &str,
    policy: &str,
    discriminator: Option<&str>,
) -> String {
    let mut parts = vec![check_id, code, policy];
    if let Some(d) = discriminator {
        parts.push(d);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = fingerprint_for_policy("naming", "pattern_mismatch", "p1", None);
        let b = fingerprint_for_policy("naming", "pattern_mismatch", "p1", None);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn discriminator_changes_fingerprint() {
        let a = fingerprint_for_policy("compliance", "missing_mandatory_control", "p1", Some("mfa"));
        let b = fingerprint_for_policy(
            "compliance",
            "missing_mandatory_control",
            "p1",
            Some("compliantDevice"),
        );
        assert_ne!(a, b);
    }
}
