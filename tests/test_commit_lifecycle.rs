mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedClient, default_baseline, init_tracing, updated_baseline};
use logsource::error::FormError;
use logsource::form::{CommitOutcome, CommitState, ConfigurationForm};
use logsource::patch::FieldEdit;

#[tokio::test]
async fn failure_preserves_baseline_and_pending() {
    init_tracing();
    let form = ConfigurationForm::new(default_baseline());
    let client = ScriptedClient::rejecting_with("version conflict");

    form.record_change(FieldEdit::LogAlias("logs-2-*".to_string()));
    let pending_before = form.pending_changes();

    let err = form.commit(&client).await.expect_err("rejection must surface");
    assert!(matches!(err, FormError::PersistenceFailed { .. }));

    assert_eq!(form.baseline(), default_baseline());
    assert_eq!(form.pending_changes(), pending_before);
    assert!(form.is_dirty(), "the user can retry");
    assert_eq!(form.commit_state(), CommitState::Idle);
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    init_tracing();
    let form = ConfigurationForm::new(default_baseline());
    let mut client = ScriptedClient::rejecting_with("temporarily unavailable");
    client.push_outcome(Ok(updated_baseline("logs-2-*")));

    form.record_change(FieldEdit::LogAlias("logs-2-*".to_string()));

    form.commit(&client).await.expect_err("first attempt fails");
    let outcome = form.commit(&client).await.expect("retry succeeds");

    assert_eq!(outcome, CommitOutcome::Applied(updated_baseline("logs-2-*")));
    assert_eq!(client.call_count(), 2, "no automatic retry in between");
    assert!(!form.is_dirty());
}

#[tokio::test]
async fn second_commit_while_in_flight_is_refused() {
    init_tracing();
    let form = ConfigurationForm::new(default_baseline());
    let client = Arc::new(ScriptedClient::succeeding_with(updated_baseline("logs-2-*")).held());

    form.record_change(FieldEdit::LogAlias("logs-2-*".to_string()));

    let in_flight = {
        let form = form.clone();
        let client = Arc::clone(&client);
        tokio::spawn(async move { form.commit(client.as_ref()).await })
    };

    // Wait until the first commit has taken its snapshot and suspended
    while form.commit_state() != CommitState::Committing {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let err = form.commit(client.as_ref()).await.expect_err("re-entrant commit");
    assert!(matches!(err, FormError::CommitInProgress));
    assert_eq!(client.call_count(), 1, "second commit never reached persistence");

    client.release();
    let outcome = in_flight
        .await
        .expect("commit task panicked")
        .expect("held commit should succeed once released");
    assert_eq!(outcome, CommitOutcome::Applied(updated_baseline("logs-2-*")));
    assert_eq!(form.commit_state(), CommitState::Idle);
}

#[tokio::test]
async fn edits_during_flight_go_into_a_later_commit() {
    init_tracing();
    let form = ConfigurationForm::new(default_baseline());
    let mut scripted = ScriptedClient::succeeding_with(updated_baseline("logs-2-*")).held();
    let mut renamed = updated_baseline("logs-2-*");
    renamed.name = "B".to_string();
    scripted.push_outcome(Ok(renamed.clone()));
    let client = Arc::new(scripted);

    form.record_change(FieldEdit::LogAlias("logs-2-*".to_string()));

    let in_flight = {
        let form = form.clone();
        let client = Arc::clone(&client);
        tokio::spawn(async move { form.commit(client.as_ref()).await })
    };
    while form.commit_state() != CommitState::Committing {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // Recorded after the snapshot was taken; must not join the in-flight patch
    form.record_change(FieldEdit::Name("B".to_string()));

    client.release();
    in_flight
        .await
        .expect("commit task panicked")
        .expect("held commit should succeed once released");

    assert_eq!(
        client.received_patches()[0]
            .get("name")
            .map(ToOwned::to_owned),
        None,
        "in-flight patch must not contain the later edit"
    );
    assert_eq!(form.pending_changes().name.as_deref(), Some("B"));
    assert!(form.is_dirty());

    // The follow-up commit carries only the later edit
    client.release();
    form.commit(client.as_ref()).await.expect("second commit succeeds");
    assert_eq!(
        client.received_patches()[1],
        serde_json::json!({"name": "B"})
    );
    assert!(!form.is_dirty());
}

#[tokio::test]
async fn cancelled_commit_applies_nothing_and_returns_to_idle() {
    init_tracing();
    let form = ConfigurationForm::new(default_baseline());
    let client = Arc::new(ScriptedClient::succeeding_with(updated_baseline("logs-2-*")).held());

    form.record_change(FieldEdit::LogAlias("logs-2-*".to_string()));
    let pending_before = form.pending_changes();

    let in_flight = {
        let form = form.clone();
        let client = Arc::clone(&client);
        tokio::spawn(async move { form.commit(client.as_ref()).await })
    };
    while form.commit_state() != CommitState::Committing {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // The owning view goes away before the update resolves
    in_flight.abort();
    assert!(in_flight.await.expect_err("task was aborted").is_cancelled());

    assert_eq!(form.commit_state(), CommitState::Idle);
    assert_eq!(form.baseline(), default_baseline());
    assert_eq!(form.pending_changes(), pending_before);

    // The form is usable again: the same edit can be committed afresh
    client.release();
    let outcome = form
        .commit(client.as_ref())
        .await
        .expect("commit after cancellation succeeds");
    assert_eq!(outcome, CommitOutcome::Applied(updated_baseline("logs-2-*")));
}
