#![allow(dead_code)]

use aitrace_app::{AppConfig, AppState, LogStepRequest, LogTraceRequest, UsagePayload};
use tempfile::TempDir;

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = AppConfig::new(dir.path().join("app.sqlite"));
    let state = AppState::new(config).expect("app state");
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}

pub fn usage(prompt: u64, completion: u64) -> UsagePayload {
    UsagePayload {
        prompt_tokens: Some(prompt),
        completion_tokens: Some(completion),
        total_tokens: Some(prompt + completion),
        ..UsagePayload::default()
    }
}

pub fn step_request(step_id: &str, usage: Option<UsagePayload>) -> LogStepRequest {
    LogStepRequest {
        project_name: "agent".to_string(),
        step_id: step_id.to_string(),
        trace_id: Some("trace-1".to_string()),
        model: Some("gpt-4o".to_string()),
        llm_provider: Some("openai".to_string()),
        usage,
        ..LogStepRequest::default()
    }
}

pub fn trace_request(trace_id: &str, start: &str, end: &str) -> LogTraceRequest {
    LogTraceRequest {
        project_name: "agent".to_string(),
        trace_id: trace_id.to_string(),
        trace_name: Some("workflow".to_string()),
        start_time: start.to_string(),
        last_update_timestamp: end.to_string(),
    }
}
