//! Identifier utilities
//!
//! Entity identifiers are opaque strings; freshly created rows get a UUIDv4.

use uuid::Uuid;

/// Generate a new identifier string
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_parseable() {
        let id = generate();
        assert!(parse(&id).is_ok());
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(generate(), generate());
    }
}
