//! Bearer credential extraction from an `Authorization` header value.

/// Literal scheme prefix, case-sensitive with exactly one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Return the credential following `"Bearer "`, if any.
///
/// Absence is a normal outcome: a missing header, another scheme, a
/// differently-cased prefix or an empty credential all yield `None`. The
/// credential is returned verbatim and is not interpreted here.
pub fn extract_bearer(header_value: Option<&str>) -> Option<&str> {
    header_value?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_strict() {
        assert_eq!(extract_bearer(Some("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer(Some("bearer abc")), None);
        assert_eq!(extract_bearer(Some("BEARER abc")), None);
        assert_eq!(extract_bearer(Some("abc")), None);
        assert_eq!(extract_bearer(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer(None), None);
    }

    #[test]
    fn empty_values_are_absent() {
        assert_eq!(extract_bearer(Some("")), None);
        assert_eq!(extract_bearer(Some("Bearer ")), None);
        assert_eq!(extract_bearer(Some("Bearer")), None);
    }

    #[test]
    fn credential_is_not_trimmed_or_interpreted() {
        assert_eq!(extract_bearer(Some("Bearer  abc")), Some(" abc"));
        assert_eq!(extract_bearer(Some("Bearer a.b.c ")), Some("a.b.c "));
    }
}
