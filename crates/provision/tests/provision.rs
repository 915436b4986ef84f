#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    clawmux_config::load_users_config,
    clawmux_provision::{Error, ProvisionOptions, UserStatus, provision, provision_from_path},
    clawmux_vault::{SecretResolver, VaultError},
    secrecy::Secret,
    serde_json::{Value, json},
};

#[derive(Default)]
struct FakeVault {
    items: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeVault {
    fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            items: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SecretResolver for FakeVault {
    async fn resolve(&self, reference: &str) -> clawmux_vault::error::Result<Secret<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .get(reference)
            .map(|v| Secret::new(v.clone()))
            .ok_or_else(|| VaultError::failed(reference, "item not found"))
    }
}

const USERS: &str = r#"{
  "users": [
    {
      "id": "alice",
      "name": "Alice",
      "identifiers": ["+1234567890", "telegram:111"],
      "env": {"ANTHROPIC_API_KEY": "op://Personal/Anthropic/credential"}
    },
    {
      "id": "bob",
      "identifiers": ["+0987654321", "discord:222"],
      "model": "openai/gpt-4o",
      "env": {"OPENAI_API_KEY": "op://Personal/Missing/credential"}
    },
    {
      "id": "carol",
      "identifiers": ["slack:U3"],
      "env": {"ANTHROPIC_API_KEY": "op://Personal/Anthropic/credential"}
    },
    {
      "id": "dave",
      "identifiers": ["telegram:444"]
    }
  ],
  "shared": {"env": {"BRAVE_API_KEY": "op://Shared/Brave/credential"}},
  "defaults": {"model": "anthropic/claude-sonnet-4-5"}
}"#;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn vault() -> FakeVault {
    FakeVault::with(&[
        ("op://Personal/Anthropic/credential", "sk-ant-resolved"),
        ("op://Shared/Brave/credential", "brave-resolved"),
    ])
}

fn setup() -> (tempfile::TempDir, ProvisionOptions) {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("users.json"), USERS).unwrap();
    let options = ProvisionOptions::new(tmp.path().join("clawmux.json"), tmp.path().join("state"));
    (tmp, options)
}

#[tokio::test]
async fn provisions_config_and_isolates_per_user_failures() {
    let (tmp, options) = setup();
    let vault = vault();

    let report = provision_from_path(&tmp.path().join("users.json"), &options, &vault)
        .await
        .unwrap();

    assert_eq!(report.agent_count, 4);
    assert_eq!(report.binding_count, 8);
    assert!(report.has_failures());

    assert_eq!(report.user("alice").unwrap().status, UserStatus::Written);
    assert_eq!(report.user("carol").unwrap().status, UserStatus::Written);
    assert_eq!(report.user("dave").unwrap().status, UserStatus::NoCredentials);
    let bob = report.user("bob").unwrap();
    assert_eq!(bob.status, UserStatus::Failed);
    assert!(bob.error.as_deref().unwrap().contains("op://Personal/Missing/credential"));

    // Same reference for alice and carol is looked up once per run.
    assert_eq!(vault.calls.load(Ordering::SeqCst), 2);

    let config = read_json(&options.output_path);
    assert_eq!(config["env"]["BRAVE_API_KEY"], "op://Shared/Brave/credential");
    assert_eq!(
        config["channels"]["whatsapp"]["allowFrom"],
        json!(["+0987654321", "+1234567890"])
    );
    assert_eq!(config["channels"]["discord"]["dm"]["allowFrom"], json!(["222"]));
    assert_eq!(config["agents"]["list"][0]["model"], "anthropic/claude-sonnet-4-5");
    assert_eq!(config["agents"]["list"][1]["model"], "openai/gpt-4o");

    let state = options.state_dir.join("agents");
    let alice = read_json(&state.join("alice/agent/auth-profiles.json"));
    assert_eq!(alice["profiles"]["anthropic:default"]["key"], "sk-ant-resolved");
    assert!(!state.join("bob").exists());
    assert!(!state.join("dave").exists());
}

#[tokio::test]
async fn resolves_shared_env_when_asked() {
    let (tmp, mut options) = setup();
    options.resolve_shared_env = true;

    provision_from_path(&tmp.path().join("users.json"), &options, &vault())
        .await
        .unwrap();

    let config = read_json(&options.output_path);
    assert_eq!(config["env"]["BRAVE_API_KEY"], "brave-resolved");
}

#[tokio::test]
async fn shared_env_failure_writes_nothing() {
    let (tmp, mut options) = setup();
    options.resolve_shared_env = true;

    let err = provision_from_path(&tmp.path().join("users.json"), &options, &FakeVault::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SharedSecret(_)), "{err}");
    assert!(!options.output_path.exists());
    assert!(!options.state_dir.exists());
}

#[tokio::test]
async fn dry_run_touches_nothing() {
    let (tmp, mut options) = setup();
    options.dry_run = true;

    let report = provision_from_path(&tmp.path().join("users.json"), &options, &vault())
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.user("alice").unwrap().status, UserStatus::Planned);
    assert_eq!(report.user("alice").unwrap().profile_count, 1);
    assert!(!options.output_path.exists());
    assert!(!options.state_dir.exists());
}

#[tokio::test]
async fn invalid_config_aborts_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let users = tmp.path().join("users.json");
    std::fs::write(
        &users,
        r#"{"users": [
            {"id": "alice", "identifiers": ["+1234567890"]},
            {"id": "bob", "identifiers": ["whatsapp:+1234567890"]}
        ]}"#,
    )
    .unwrap();
    let options = ProvisionOptions::new(tmp.path().join("clawmux.json"), tmp.path().join("state"));

    let err = provision_from_path(&users, &options, &FakeVault::default())
        .await
        .unwrap_err();

    match err {
        Error::Config(e) => assert!(e.is_collision(), "{e}"),
        other => panic!("expected collision, got {other:?}"),
    }
    assert!(!options.output_path.exists());
}

#[tokio::test]
async fn rerun_preserves_externally_managed_profiles() {
    let (tmp, options) = setup();
    let path = options.state_dir.join("agents/alice/agent/auth-profiles.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        json!({
            "version": 1,
            "profiles": {
                "anthropic:default": {"type": "api_key", "provider": "anthropic", "key": "stale"},
                "openai-codex:default": {"type": "oauth", "provider": "openai-codex", "access": "at", "refresh": "rt"}
            }
        })
        .to_string(),
    )
    .unwrap();

    let config = load_users_config(&tmp.path().join("users.json")).unwrap();
    let report = provision(&config, &options, &vault()).await.unwrap();

    assert!(report.user("alice").unwrap().merged);
    let alice = read_json(&path);
    assert_eq!(alice["profiles"]["anthropic:default"]["key"], "sk-ant-resolved");
    assert_eq!(alice["profiles"]["openai-codex:default"]["refresh"], "rt");
}
