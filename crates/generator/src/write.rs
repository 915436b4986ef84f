use std::path::Path;

use {clawmux_common::fs, tracing::info};

use crate::{
    error::{Context, Result},
    types::GeneratedConfig,
};

/// Render `config` and, unless `dry_run`, atomically replace `path` with it.
///
/// Returns the rendered document either way. The file is owner-only because
/// `env` may carry resolved shared secrets.
pub fn write_generated_config(path: &Path, config: &GeneratedConfig, dry_run: bool) -> Result<String> {
    let rendered = fs::to_pretty_json(config)?;
    if dry_run {
        info!(path = %path.display(), bindings = config.binding_count(), "dry run, not writing gateway config");
        return Ok(rendered);
    }

    fs::write_atomic(path, rendered.as_bytes(), true)
        .with_context(|| format!("failed to write gateway config {}", path.display()))?;
    info!(
        path = %path.display(),
        agents = config.agents.list.len(),
        bindings = config.binding_count(),
        "wrote gateway config"
    );
    Ok(rendered)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::generate::generate_config,
        clawmux_config::{UserProfile, UsersConfig},
    };

    fn sample() -> GeneratedConfig {
        generate_config(&UsersConfig {
            users: vec![UserProfile::new("alice", ["+1234567890"])],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn writes_pretty_json_with_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/clawmux.json");

        let rendered = write_generated_config(&path, &sample(), false).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();

        assert_eq!(rendered, on_disk);
        assert!(on_disk.ends_with("}\n"));
        assert!(on_disk.contains("\n  \"agents\": {"));
        let parsed: GeneratedConfig = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn dry_run_leaves_disk_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clawmux.json");

        let rendered = write_generated_config(&path, &sample(), true).unwrap();
        assert!(rendered.contains("\"bindings\""));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clawmux.json");
        write_generated_config(&path, &sample(), false).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
