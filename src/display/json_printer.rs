//! Section rendering for decoded JSON.

use std::fmt::Write;

/// Render a titled section, e.g. `--- Header ---` followed by `body`.
///
/// An absent body renders as `(unavailable)`.
pub fn render_section(title: &str, body: Option<&str>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "--- {title} ---");
    let _ = writeln!(out, "{}", body.unwrap_or("(unavailable)"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_section_with_body() {
        assert_eq!(
            render_section("Header", Some("{\n  \"alg\": \"none\"\n}")),
            "--- Header ---\n{\n  \"alg\": \"none\"\n}\n"
        );
    }

    #[test]
    fn test_render_section_without_body() {
        assert_eq!(
            render_section("Payload", None),
            "--- Payload ---\n(unavailable)\n"
        );
    }
}
