use tracing::debug;

/// Replace `${ENV_VAR}` placeholders with values from the process environment.
///
/// Unset variables and malformed placeholders are left untouched, so secret
/// references such as `op://vault/item/field` pass through unchanged.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with an injected lookup, for tests.
pub(crate) fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                debug!(var = name, "leaving unresolved env placeholder");
                out.push_str(&rest[start..start + 2 + end + 1]);
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
            "CLAWMUX_MODEL" => Some("openai/gpt-4o".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variable() {
        assert_eq!(
            substitute_env_with(r#"{"model": "${CLAWMUX_MODEL}"}"#, lookup),
            r#"{"model": "openai/gpt-4o"}"#
        );
    }

    #[test]
    fn replaces_with_empty_value() {
        assert_eq!(substitute_env_with("a${EMPTY}b", lookup), "ab");
    }

    #[test]
    fn keeps_unknown_variable() {
        assert_eq!(substitute_env_with("${NOPE_XYZ}", lookup), "${NOPE_XYZ}");
    }

    #[test]
    fn keeps_malformed_placeholders() {
        assert_eq!(substitute_env_with("x ${}", lookup), "x ${}");
        assert_eq!(substitute_env_with("x ${OPEN", lookup), "x ${OPEN");
    }

    #[test]
    fn leaves_secret_references_alone() {
        let raw = "op://Personal/Anthropic/credential";
        assert_eq!(substitute_env_with(raw, lookup), raw);
    }

    #[test]
    fn handles_multiple_placeholders() {
        assert_eq!(
            substitute_env_with("${CLAWMUX_MODEL}|${NOPE}|${CLAWMUX_MODEL}", lookup),
            "openai/gpt-4o|${NOPE}|openai/gpt-4o"
        );
    }
}
