/// Replace `${ENV_VAR}` placeholders in raw config text with values from the
/// process environment.
///
/// Unresolvable variables and unterminated placeholders are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with an explicit variable lookup.
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: keep the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "BOT_TOKEN" => Some("123:abc".into()),
            "SMTP_PASS" => Some("s3cret".into()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_vars() {
        assert_eq!(
            substitute_with(r#"{"token": "${BOT_TOKEN}", "pw": "${SMTP_PASS}"}"#, lookup),
            r#"{"token": "123:abc", "pw": "s3cret"}"#
        );
    }

    #[test]
    fn leaves_unknown_and_empty_placeholders() {
        assert_eq!(substitute_with("${NOPE} ${}", lookup), "${NOPE} ${}");
    }

    #[test]
    fn leaves_unterminated_placeholder() {
        assert_eq!(substitute_with("a ${BOT_TOKEN", lookup), "a ${BOT_TOKEN");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(substitute_with("plain $text {}", lookup), "plain $text {}");
    }
}
