use serde::{Deserialize, Serialize};

/// Credentials for one user, injected explicitly wherever they are needed.
/// Nothing in the workspace reads auth from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub token: String,
    pub user_id: String,
}

impl AuthContext {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && !self.user_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
}

impl RepoTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// One documentation-generation request. Built once per user action and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub target: RepoTarget,
    pub auth: AuthContext,
    pub include_tests: bool,
}

impl GenerationRequest {
    pub fn new(target: RepoTarget, auth: AuthContext, include_tests: bool) -> Self {
        Self {
            target,
            auth,
            include_tests,
        }
    }

    /// The JSON body of the terminal request, in the backend's field naming.
    pub fn terminal_body(&self) -> TerminalBody {
        TerminalBody {
            token: self.auth.token.clone(),
            owner: self.target.owner.clone(),
            repo: self.target.repo.clone(),
            include_tests: self.include_tests,
            user_id: self.auth.user_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalBody {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub include_tests: bool,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_body_uses_backend_field_names() {
        let req = GenerationRequest::new(
            RepoTarget::new("acme", "widget"),
            AuthContext::new("t1", "u1"),
            true,
        );
        let json = serde_json::to_value(req.terminal_body()).unwrap();
        assert_eq!(json["token"], "t1");
        assert_eq!(json["owner"], "acme");
        assert_eq!(json["repo"], "widget");
        assert_eq!(json["includeTests"], true);
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn blank_auth_fields_are_incomplete() {
        assert!(!AuthContext::new("", "u1").is_complete());
        assert!(!AuthContext::new("t1", "  ").is_complete());
        assert!(AuthContext::new("t1", "u1").is_complete());
    }
}
