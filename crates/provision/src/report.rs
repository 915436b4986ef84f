//! Provisioning report: what a run wrote, per user.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Outcome for one user's credential file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Written,
    /// Dry run: computed but not written.
    Planned,
    /// The user has no env credentials and no auth entries.
    NoCredentials,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReport {
    pub user_id: String,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_path: Option<PathBuf>,
    pub profile_count: usize,
    pub merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UserReport {
    pub fn failed(user_id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            user_id: user_id.into(),
            status: UserStatus::Failed,
            auth_path: None,
            profile_count: 0,
            merged: false,
            error: Some(error.to_string()),
        }
    }
}

/// Full report of a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub config_path: PathBuf,
    pub dry_run: bool,
    pub agent_count: usize,
    pub binding_count: usize,
    pub channel_count: usize,
    pub users: Vec<UserReport>,
}

impl ProvisionReport {
    pub fn add_user(&mut self, report: UserReport) {
        self.users.push(report);
    }

    /// Whether any user's credentials failed.
    pub fn has_failures(&self) -> bool {
        self.users.iter().any(|u| u.status == UserStatus::Failed)
    }

    pub fn failed_users(&self) -> impl Iterator<Item = &UserReport> {
        self.users.iter().filter(|u| u.status == UserStatus::Failed)
    }

    /// Profiles generated across all users.
    pub fn total_profiles(&self) -> usize {
        self.users.iter().map(|u| u.profile_count).sum()
    }

    pub fn user(&self, user_id: &str) -> Option<&UserReport> {
        self.users.iter().find(|u| u.user_id == user_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn report() -> ProvisionReport {
        ProvisionReport {
            config_path: PathBuf::from("clawmux.json"),
            dry_run: false,
            agent_count: 2,
            binding_count: 3,
            channel_count: 2,
            users: Vec::new(),
        }
    }

    #[test]
    fn failures_and_totals() {
        let mut report = report();
        report.add_user(UserReport {
            user_id: "alice".into(),
            status: UserStatus::Written,
            auth_path: Some(PathBuf::from("a")),
            profile_count: 2,
            merged: true,
            error: None,
        });
        assert!(!report.has_failures());

        report.add_user(UserReport::failed("bob", "failed to resolve 'op://x'"));
        assert!(report.has_failures());
        assert_eq!(report.total_profiles(), 2);
        assert_eq!(report.failed_users().count(), 1);
        assert_eq!(
            report.user("bob").unwrap().error.as_deref(),
            Some("failed to resolve 'op://x'")
        );
    }

    #[test]
    fn serializes_status_snake_case() {
        let json = serde_json::to_value(UserReport::failed("bob", "boom")).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("auth_path").is_none());
    }
}
