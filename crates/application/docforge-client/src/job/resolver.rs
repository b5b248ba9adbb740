use docforge_core::{Documentation, GenerationOutcome};
use tracing::warn;

use crate::job::{JobError, TerminalResponse};

/// Classify the terminal response into the session's final outcome.
///
/// 402 wins over everything, including a parsable body. Failure reasons
/// are short diagnostics; transport detail goes to the log, not the user.
pub fn resolve_terminal(resp: Result<TerminalResponse, JobError>) -> GenerationOutcome {
    let resp = match resp {
        Ok(r) => r,
        Err(e) => {
            warn!("terminal request failed: {e}");
            return GenerationOutcome::Failure("network failure".into());
        }
    };

    if resp.status == 402 {
        return GenerationOutcome::PaymentRequired;
    }
    if !(200..300).contains(&resp.status) {
        return GenerationOutcome::Failure(format!("status {}", resp.status));
    }

    let value: serde_json::Value = match serde_json::from_slice(&resp.body) {
        Ok(v) => v,
        Err(e) => {
            warn!("terminal response body unparsable: {e}");
            return GenerationOutcome::Failure("unparsable response body".into());
        }
    };

    let Some(doc_value) = value.get("documentation") else {
        return GenerationOutcome::Failure("response missing documentation".into());
    };

    match serde_json::from_value::<Documentation>(doc_value.clone()) {
        Ok(doc) => GenerationOutcome::Success(doc),
        Err(e) => {
            warn!("documentation payload malformed: {e}");
            GenerationOutcome::Failure("malformed documentation payload".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16, body: &str) -> Result<TerminalResponse, JobError> {
        Ok(TerminalResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    #[test]
    fn payment_required_ignores_body() {
        assert_eq!(
            resolve_terminal(resp(402, "{}")),
            GenerationOutcome::PaymentRequired
        );
        assert_eq!(
            resolve_terminal(resp(402, r#"{"documentation":{"title":"x"}}"#)),
            GenerationOutcome::PaymentRequired
        );
    }

    #[test]
    fn ok_with_documentation_succeeds() {
        let out = resolve_terminal(resp(200, r#"{"documentation":{"title":"Widget"}}"#));
        match out {
            GenerationOutcome::Success(doc) => assert_eq!(doc.title.as_deref(), Some("Widget")),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn ok_without_documentation_field_fails() {
        let out = resolve_terminal(resp(200, r#"{"status":"done"}"#));
        assert!(matches!(out, GenerationOutcome::Failure(_)));
    }

    #[test]
    fn non_success_status_fails_with_code() {
        assert_eq!(
            resolve_terminal(resp(500, "boom")),
            GenerationOutcome::Failure("status 500".into())
        );
    }

    #[test]
    fn network_error_fails_without_internals() {
        let out = resolve_terminal(Err(JobError::Terminal(
            "connection reset by peer (os error 104)".into(),
        )));
        assert_eq!(out, GenerationOutcome::Failure("network failure".into()));
    }
}
