//! Credential handling: OS-keychain storage and the reserved demo token.

pub mod credentials;

pub use credentials::CredentialStore;

/// Reserved credential that routes every operation to the bundled demo
/// fixtures, regardless of the offline flag.
pub const DEMO_TOKEN: &str = "demo";

/// Check a credential against the reserved demo token.
pub fn is_demo_token(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case(DEMO_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_token_matching() {
        assert!(is_demo_token("demo"));
        assert!(is_demo_token("DEMO"));
        assert!(is_demo_token(" demo "));
        assert!(!is_demo_token("demonstration"));
        assert!(!is_demo_token(""));
    }
}
