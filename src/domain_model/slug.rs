pub const FALLBACK_SLUG: &str = "not-available";

/// URL-friendly form of a display name: lowercase ASCII letters, digits and
/// single dashes.
pub fn make_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            '-' if !slug.is_empty() && !slug.ends_with('-') => slug.push('-'),
            _ => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Web Design", "web-design")]
    #[case("  Full   Stack  ", "full-stack")]
    #[case("C++ & Rust!", "c-rust")]
    #[case("already-slugged--name", "already-slugged-name")]
    #[case("Part\ttime", "part-time")]
    #[case("Ünïcode", "ncode")]
    #[case("!!!", FALLBACK_SLUG)]
    #[case("", FALLBACK_SLUG)]
    fn slugifies(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(make_slug(name), expected);
    }
}
