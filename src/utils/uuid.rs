use ::uuid::Uuid;

/// Generate a random (v4) UUID in lowercase hyphenated form
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Check whether a string parses as a UUID; absent input is never valid
pub fn is_valid(candidate: Option<&str>) -> bool {
    candidate.is_some_and(|s| Uuid::parse_str(s).is_ok())
}
