/// Audit trail for session lifecycle events
///
/// Each entry is one structured tracing event. Entries carry user ids and
/// outcomes only: no passwords, tokens, keys or email addresses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Register,
    Login,
    Refresh,
    Revoke,
    UpdateProfile,
    UpgradeMembership,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Register => "REGISTER",
            AuditAction::Login => "LOGIN",
            AuditAction::Refresh => "REFRESH",
            AuditAction::Revoke => "REVOKE",
            AuditAction::UpdateProfile => "UPDATE_PROFILE",
            AuditAction::UpgradeMembership => "UPGRADE_MEMBERSHIP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
}

/// Audit log entry
#[derive(Debug, Clone, Serialize)]
pub struct AuditLog {
    pub log_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub status: AuditStatus,
    pub user_id: Option<Uuid>,
    /// Short machine-readable reason, set on failures
    pub reason: Option<String>,
}

impl AuditLog {
    pub fn success(action: AuditAction, user_id: Uuid) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action,
            status: AuditStatus::Success,
            user_id: Some(user_id),
            reason: None,
        }
    }

    pub fn failure(action: AuditAction, reason: impl Into<String>) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action,
            status: AuditStatus::Failure,
            user_id: None,
            reason: Some(reason.into()),
        }
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Emit an audit entry; failures at warn, successes at info
pub fn log_audit(entry: &AuditLog) {
    match entry.status {
        AuditStatus::Failure => {
            tracing::warn!(
                log_id = %entry.log_id,
                action = entry.action.as_str(),
                user_id = ?entry.user_id,
                reason = ?entry.reason,
                status = "FAILURE",
                "Audit log entry"
            );
        }
        AuditStatus::Success => {
            tracing::info!(
                log_id = %entry.log_id,
                action = entry.action.as_str(),
                user_id = ?entry.user_id,
                status = "SUCCESS",
                "Audit log entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_entry() {
        let user_id = Uuid::new_v4();
        let entry = AuditLog::success(AuditAction::Login, user_id);

        assert_eq!(entry.status, AuditStatus::Success);
        assert_eq!(entry.user_id, Some(user_id));
        assert!(entry.reason.is_none());
    }

    #[test]
    fn test_failure_entry_serializes_action_name() {
        let entry = AuditLog::failure(AuditAction::Refresh, "refresh token revoked");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["action"], "REFRESH");
        assert_eq!(json["status"], "FAILURE");
        assert_eq!(json["reason"], "refresh token revoked");
    }
}
