//! GitHub pull-request webhook verification.
//!
//! [`WebhookVerifier::verify`] runs a fixed chain of gates against an inbound
//! delivery and stops at the first one that fails:
//!
//! 1. `User-Agent` starts with `GitHub-Hookshot/`
//! 2. `X-Github-Event` is `pull_request`
//! 3. `X-Hub-Signature` matches the HMAC-SHA1 of the raw body
//! 4. the base repository belongs to the configured namespace
//! 5. the event is a merged, closed pull request
//! 6. the target branch is not the protected branch
//!
//! A delivery that passes every gate becomes a [`RegenerateCommand`].

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WebhookPolicy;
use crate::signature;

pub const HOOKSHOT_AGENT_PREFIX: &str = "GitHub-Hookshot/";
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// The parts of an HTTP delivery the gates look at.
#[derive(Debug, Clone, Copy)]
pub struct HookRequest<'a> {
    pub user_agent: Option<&'a str>,
    pub event: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub body: &'a [u8],
}

/// A trusted instruction to regenerate the artifacts of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateCommand {
    pub project: String,
    pub clone_url: String,
    pub branch: String,
}

/// Why a delivery was turned away. The display text is the client-facing
/// `error` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookRejection {
    #[error("Not a GitHub hook")]
    NotGitHub,

    #[error("Not a Pull Request hook")]
    NotPullRequest,

    #[error("Not a valid secret key")]
    BadSignature,

    #[error("Not a {0} project")]
    ForeignNamespace(String),

    #[error("We got hook which is not merged pull request")]
    NotMerged,

    #[error("No bananas for you")]
    ProtectedBranch,

    #[error("Malformed hook payload")]
    MalformedPayload,
}

impl HookRejection {
    /// Only an authentication failure is reported as 403; every policy
    /// rejection is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            HookRejection::BadSignature => 403,
            _ => 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestEvent {
    action: String,
    pull_request: PullRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequest {
    merged: serde_json::Value,
    base: BaseRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BaseRef {
    #[serde(rename = "ref")]
    branch: String,
    repo: Repository,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    name: String,
    full_name: String,
    clone_url: String,
}

// ---------------------------------------------------------------------------
// WebhookVerifier
// ---------------------------------------------------------------------------

pub struct WebhookVerifier {
    secret: Vec<u8>,
    policy: WebhookPolicy,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>, policy: WebhookPolicy) -> Self {
        Self {
            secret: secret.into(),
            policy,
        }
    }

    pub fn verify(&self, req: &HookRequest<'_>) -> Result<RegenerateCommand, HookRejection> {
        let from_hookshot = req
            .user_agent
            .is_some_and(|ua| ua.starts_with(HOOKSHOT_AGENT_PREFIX));
        if !from_hookshot {
            return Err(HookRejection::NotGitHub);
        }

        if req.event != Some(PULL_REQUEST_EVENT) {
            return Err(HookRejection::NotPullRequest);
        }

        if !signature::verify(&self.secret, req.body, req.signature) {
            return Err(HookRejection::BadSignature);
        }

        let event: PullRequestEvent = serde_json::from_slice(req.body).map_err(|e| {
            warn!(error = %e, "signed hook payload is not a pull request event");
            HookRejection::MalformedPayload
        })?;
        let base = event.pull_request.base;

        let owner_prefix = format!("{}/", self.policy.namespace);
        if !base.repo.full_name.starts_with(&owner_prefix) {
            debug!(repo = %base.repo.full_name, "ignoring hook from foreign namespace");
            return Err(HookRejection::ForeignNamespace(self.policy.namespace.clone()));
        }

        let merged = event.pull_request.merged == serde_json::Value::Bool(true);
        if event.action != "closed" || !merged {
            warn!(
                payload = %String::from_utf8_lossy(req.body),
                "received hook which is not a merged pull request"
            );
            return Err(HookRejection::NotMerged);
        }

        if base.branch == self.policy.protected_branch {
            return Err(HookRejection::ProtectedBranch);
        }

        Ok(RegenerateCommand {
            project: base.repo.name,
            clone_url: base.repo.clone_url,
            branch: base.branch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::sign;

    const SECRET: &[u8] = b"topsecret";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SECRET, WebhookPolicy::default())
    }

    fn payload(full_name: &str, action: &str, merged: serde_json::Value, branch: &str) -> Vec<u8> {
        let name = full_name.rsplit('/').next().unwrap_or(full_name);
        serde_json::to_vec(&serde_json::json!({
            "action": action,
            "pull_request": {
                "merged": merged,
                "base": {
                    "ref": branch,
                    "repo": {
                        "name": name,
                        "full_name": full_name,
                        "clone_url": format!("https://github.com/{full_name}.git"),
                    }
                }
            }
        }))
        .unwrap()
    }

    fn check(body: &[u8], sig: &str) -> Result<RegenerateCommand, HookRejection> {
        verifier().verify(&HookRequest {
            user_agent: Some("GitHub-Hookshot/abc123"),
            event: Some("pull_request"),
            signature: Some(sig),
            body,
        })
    }

    #[test]
    fn merged_pull_request_becomes_command() {
        let body = payload("mesonbuild/example", "closed", true.into(), "1.0");
        let cmd = check(&body, &sign(SECRET, &body)).unwrap();
        assert_eq!(
            cmd,
            RegenerateCommand {
                project: "example".into(),
                clone_url: "https://github.com/mesonbuild/example.git".into(),
                branch: "1.0".into(),
            }
        );
    }

    #[test]
    fn user_agent_is_checked_first() {
        let body = b"not even json";
        let err = verifier()
            .verify(&HookRequest {
                user_agent: Some("curl/8.0"),
                event: Some("push"),
                signature: Some("sha1=00"),
                body,
            })
            .unwrap_err();
        assert_eq!(err, HookRejection::NotGitHub);
    }

    #[test]
    fn missing_user_agent_is_not_github() {
        let body = payload("mesonbuild/example", "closed", true.into(), "1.0");
        let err = verifier()
            .verify(&HookRequest {
                user_agent: None,
                event: Some("pull_request"),
                signature: Some(&sign(SECRET, &body)),
                body: &body,
            })
            .unwrap_err();
        assert_eq!(err, HookRejection::NotGitHub);
    }

    #[test]
    fn event_type_is_checked_before_signature() {
        let err = verifier()
            .verify(&HookRequest {
                user_agent: Some("GitHub-Hookshot/1"),
                event: Some("push"),
                signature: None,
                body: b"{}",
            })
            .unwrap_err();
        assert_eq!(err, HookRejection::NotPullRequest);
    }

    #[test]
    fn bad_signature_is_403() {
        let body = payload("mesonbuild/example", "closed", true.into(), "1.0");
        let err = check(&body, "sha1=0000000000000000000000000000000000000000").unwrap_err();
        assert_eq!(err, HookRejection::BadSignature);
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Not a valid secret key");
    }

    #[test]
    fn signature_is_checked_before_payload_is_parsed() {
        let err = check(b"garbage", "sha1=deadbeef").unwrap_err();
        assert_eq!(err, HookRejection::BadSignature);
    }

    #[test]
    fn foreign_namespace_is_rejected() {
        let body = payload("someone/example", "closed", true.into(), "1.0");
        let err = check(&body, &sign(SECRET, &body)).unwrap_err();
        assert_eq!(err.to_string(), "Not a mesonbuild project");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn namespace_must_match_whole_owner() {
        let body = payload("mesonbuild-fork/example", "closed", true.into(), "1.0");
        let err = check(&body, &sign(SECRET, &body)).unwrap_err();
        assert!(matches!(err, HookRejection::ForeignNamespace(_)));
    }

    #[test]
    fn unmerged_or_open_pull_requests_are_rejected() {
        for (action, merged) in [
            ("closed", serde_json::Value::Bool(false)),
            ("opened", serde_json::Value::Bool(true)),
            ("closed", serde_json::Value::Null),
            ("closed", serde_json::Value::String("true".into())),
        ] {
            let body = payload("mesonbuild/example", action, merged, "1.0");
            let err = check(&body, &sign(SECRET, &body)).unwrap_err();
            assert_eq!(err, HookRejection::NotMerged, "action={action}");
        }
    }

    #[test]
    fn protected_branch_is_rejected() {
        let body = payload("mesonbuild/example", "closed", true.into(), "master");
        let err = check(&body, &sign(SECRET, &body)).unwrap_err();
        assert_eq!(err.to_string(), "No bananas for you");
    }

    #[test]
    fn namespace_is_checked_before_merge_state() {
        let body = payload("other/example", "opened", false.into(), "master");
        let err = check(&body, &sign(SECRET, &body)).unwrap_err();
        assert!(matches!(err, HookRejection::ForeignNamespace(_)));
    }

    #[test]
    fn signed_non_json_is_malformed() {
        let body = b"this is not json";
        let err = check(body, &sign(SECRET, body)).unwrap_err();
        assert_eq!(err, HookRejection::MalformedPayload);
    }

    #[test]
    fn custom_policy_is_honoured() {
        let v = WebhookVerifier::new(
            SECRET,
            WebhookPolicy {
                namespace: "acme".into(),
                protected_branch: "main".into(),
            },
        );
        let body = payload("acme/widget", "closed", true.into(), "main");
        let err = v
            .verify(&HookRequest {
                user_agent: Some("GitHub-Hookshot/1"),
                event: Some("pull_request"),
                signature: Some(&sign(SECRET, &body)),
                body: &body,
            })
            .unwrap_err();
        assert_eq!(err, HookRejection::ProtectedBranch);
    }
}
