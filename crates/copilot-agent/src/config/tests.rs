#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.model, "gemini-2.0-flash-lite-001");
        assert_eq!(config.database.dbname, "mEdit");
        assert_eq!(config.database.port, 5432);
        assert!(config.database.include_tables.is_empty());
        assert_eq!(config.sources.fallback_mondo_id, "MONDO:0013342");
        assert!(!config.classifier.structured);
        assert!(config.workflow.query_db_on_fallback);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [llm]
            provider = "openai_compatible"
            base_url = "http://localhost:11434/v1"
            model = "llama3:8b"

            [database]
            include_tables = ["variants", "genes"]

            [workflow]
            query_db_on_fallback = false
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.provider, LlmProvider::OpenaiCompatible);
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(config.llm.max_tokens, 1500);
        assert_eq!(config.database.include_tables, vec!["variants", "genes"]);
        assert_eq!(config.database.user, "postgres");
        assert!(!config.workflow.query_db_on_fallback);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(Config::from_toml_str("[llm]\nprovider = \"anthropic\"\n").is_err());
    }

    #[test]
    fn test_bind_env_wins() {
        assert_eq!(resolve_bind(Some("127.0.0.1:8080".into()), "0.0.0.0:3000"), "127.0.0.1:8080");
        assert_eq!(resolve_bind(Some("  ".into()), "0.0.0.0:3000"), "0.0.0.0:3000");
        assert_eq!(resolve_bind(None, "0.0.0.0:3000"), "0.0.0.0:3000");
    }
}
