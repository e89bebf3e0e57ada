//! End-to-end tests for the resume generator and its file-backed memory.

use agent_hooks::memory::{RECORD_SEPARATOR, looks_like_full_info};
use agent_hooks::{
    FileResumeStore, LlmRequest, LlmResponse, MemorySink, ResumeRunner, ResumeStore,
    ScriptedModel, Session, TrafficEvent, resume_generator_agent,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("agent_hooks=debug")
        .with_test_writer()
        .try_init();
}

fn file_store(dir: &TempDir) -> Arc<dyn ResumeStore> {
    Arc::new(FileResumeStore::new(dir.path()).unwrap())
}

/// A first generation is persisted, a later retrieval request in a new
/// process sees it injected.
#[tokio::test]
async fn test_resume_survives_restart_and_is_injected() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let candidate = "Name: Jane Doe\nExperience: 5 years backend at Acme\nSkills: Rust, SQL";
    assert!(looks_like_full_info(candidate));

    // First run: fresh candidate information.
    {
        let model = Arc::new(ScriptedModel::always("JANE DOE\nBackend engineer"));
        let agent = resume_generator_agent(model.clone(), Some(file_store(&dir)), Arc::new(MemorySink::new()));
        let mut session = Session::new("s1").with_state(json!({"user_id": "jane"}));

        let response = agent
            .run(&mut session, LlmRequest::from_user_text(candidate))
            .await
            .unwrap();

        assert_eq!(response.text(), "JANE DOE\nBackend engineer");
        assert_eq!(model.last_request().unwrap().last_text(), Some(candidate));
        assert_eq!(
            session.state_str("previous_resume"),
            Some("JANE DOE\nBackend engineer")
        );
    }

    // Second run with a fresh store instance over the same directory.
    let model = Arc::new(ScriptedModel::always("Here it is"));
    let sink = Arc::new(MemorySink::new());
    let store = file_store(&dir);
    let agent = resume_generator_agent(model.clone(), Some(store.clone()), sink.clone());
    let mut session = Session::new("s2").with_state(json!({"user_id": "jane"}));

    agent
        .run(&mut session, LlmRequest::from_user_text("show my resume"))
        .await
        .unwrap();

    let sent = model.last_request().unwrap();
    let prompt = sent.last_text().unwrap();
    assert_eq!(
        prompt,
        "Stored resume for this user (from previous sessions):\n\
         JANE DOE\nBackend engineer\n\nUser request:\nshow my resume"
    );
    assert!(matches!(
        &sink.events()[0],
        TrafficEvent::Query { text, .. } if text == prompt
    ));

    // The answer to the retrieval request is appended too.
    let record = store.load("jane").await.unwrap();
    assert_eq!(
        record,
        format!("JANE DOE\nBackend engineer{}Here it is", *RECORD_SEPARATOR)
    );
}

#[tokio::test]
async fn test_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.save("u", "first").await.unwrap();
    store.save("u", "second").await.unwrap();

    let a = store.load("u").await.unwrap();
    let b = store.load("u").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a, format!("first{}second", *RECORD_SEPARATOR));
}

#[tokio::test]
async fn test_users_do_not_share_records() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.save("alice", "A").await.unwrap();
    store.save("bob", "B").await.unwrap();

    assert_eq!(store.load("alice").await.unwrap(), "A");
    assert_eq!(store.load("bob").await.unwrap(), "B");
    assert_eq!(store.load("carol").await.unwrap(), "");
}

#[tokio::test]
async fn test_concurrent_appends_all_land() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.save("shared", &format!("entry-{i}")).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let record = store.load("shared").await.unwrap();
    let entries: Vec<_> = record.split(RECORD_SEPARATOR.as_str()).collect();
    assert_eq!(entries.len(), 8);
    for i in 0..8 {
        assert!(entries.contains(&format!("entry-{i}").as_str()));
    }
}

#[tokio::test]
async fn test_runner_uses_generated_session_as_key() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let model = Arc::new(ScriptedModel::new([LlmResponse::from_text("RESUME v1")]));
    let runner = ResumeRunner::new(model, Some(store.clone()), Arc::new(MemorySink::new()));

    let (response, session_id) = runner.run("Skills: Rust", None, None).await.unwrap();

    assert_eq!(response.text(), "RESUME v1");
    assert_eq!(store.load(&session_id).await.unwrap(), "RESUME v1");
}

#[tokio::test]
async fn test_missing_store_degrades_silently() {
    let model = Arc::new(ScriptedModel::always("ok"));
    let agent = resume_generator_agent(model.clone(), None, Arc::new(MemorySink::new()));
    let mut session = Session::new("s").with_state(json!({"user_id": "nobody"}));

    let response = agent
        .run(&mut session, LlmRequest::from_user_text("show my resume"))
        .await
        .unwrap();

    assert_eq!(response.text(), "ok");
    assert_eq!(model.last_request().unwrap().last_text(), Some("show my resume"));
}
