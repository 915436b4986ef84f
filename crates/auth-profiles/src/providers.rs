//! Credential env var → provider slug mapping.

/// Well-known credential variables and the provider they authenticate.
pub const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("ANTHROPIC_API_KEY", "anthropic"),
    ("OPENAI_API_KEY", "openai"),
    ("GEMINI_API_KEY", "google"),
    ("GOOGLE_API_KEY", "google"),
    ("GROQ_API_KEY", "groq"),
    ("XAI_API_KEY", "xai"),
    ("DEEPSEEK_API_KEY", "deepseek"),
    ("MISTRAL_API_KEY", "mistral"),
    ("OPENROUTER_API_KEY", "openrouter"),
    ("CEREBRAS_API_KEY", "cerebras"),
    ("MOONSHOT_API_KEY", "moonshot"),
    ("MINIMAX_API_KEY", "minimax"),
    ("VENICE_API_KEY", "venice"),
    ("ZAI_API_KEY", "zai"),
    ("TOGETHER_API_KEY", "together"),
    ("PERPLEXITY_API_KEY", "perplexity"),
];

const SUFFIXES: &[&str] = &["_API_KEY", "_KEY", "_TOKEN"];

/// Provider for `var`: a table hit, or a slug inferred from the name.
pub fn provider_for_env_var(var: &str) -> String {
    CREDENTIAL_VARS
        .iter()
        .find(|(name, _)| *name == var)
        .map(|(_, provider)| (*provider).to_string())
        .unwrap_or_else(|| infer_provider_slug(var))
}

/// Strip the first matching credential suffix, then lowercase and hyphenate.
///
/// `BRAVE_API_KEY` → `brave`, `HUGGING_FACE_TOKEN` → `hugging-face`. A name
/// that is nothing but a suffix keeps its full text.
pub fn infer_provider_slug(var: &str) -> String {
    let stem = SUFFIXES
        .iter()
        .find_map(|suffix| var.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(var);
    stem.to_ascii_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("ANTHROPIC_API_KEY", "anthropic")]
    #[case("OPENAI_API_KEY", "openai")]
    #[case("GEMINI_API_KEY", "google")]
    #[case("GOOGLE_API_KEY", "google")]
    #[case("XAI_API_KEY", "xai")]
    #[case("PERPLEXITY_API_KEY", "perplexity")]
    fn table_hits(#[case] var: &str, #[case] provider: &str) {
        assert_eq!(provider_for_env_var(var), provider);
    }

    #[rstest]
    #[case("BRAVE_API_KEY", "brave")]
    #[case("ELEVENLABS_KEY", "elevenlabs")]
    #[case("HUGGING_FACE_TOKEN", "hugging-face")]
    #[case("GITHUB_TOKEN", "github")]
    #[case("TZ", "tz")]
    #[case("_TOKEN", "-token")]
    fn inferred_slugs(#[case] var: &str, #[case] provider: &str) {
        assert_eq!(provider_for_env_var(var), provider);
    }

    #[test]
    fn api_key_suffix_wins_over_key_suffix() {
        assert_eq!(infer_provider_slug("FOO_API_KEY"), "foo");
    }
}
