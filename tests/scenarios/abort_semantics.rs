//! Abort semantics: what stops a run, where, and what never runs afterwards

use crate::helpers::*;
use release_flow::core::WorkflowError;
use release_flow::execution::{CommandOutput, ExecutionEvent};

#[tokio::test]
async fn test_invalid_platform_aborts_before_any_side_effect() {
    for platform in ["heroku", "EB", "", "gae "] {
        let h = harness(Setup {
            storage: true,
            index_rewrite: true,
            ..Setup::default()
        });

        let report = h.orchestrator.deploy("1.2.0", Some(platform)).await;

        assert_aborted_at(&report, "validate");
        assert!(matches!(report.result.reason(), Some(WorkflowError::Validation(_))));
        assert!(h.calls().is_empty(), "platform {:?} made calls: {:?}", platform, h.calls());
        assert!(report.executed_steps().is_empty());
    }
}

#[tokio::test]
async fn test_empty_version_is_rejected() {
    let h = harness(Setup::default());

    let report = h.orchestrator.deploy("  ", Some("gae")).await;

    assert_aborted_at(&report, "validate");
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_empty_project_name_is_rejected() {
    let h = harness(Setup {
        answers: vec!["y"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("").await;

    assert_aborted_at(&report, "validate");
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_build_exit_status_aborts_regardless_of_stdout() {
    let h = harness(Setup {
        replies: vec![(
            "npm run build:prod",
            CommandOutput::new("Hash: 4f2a\nbundle.js  812 KiB", "ERROR in ./src/index.js\nExit status 2"),
        )],
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_aborted_at(&report, "build");
    assert!(h.calls_with("git.").is_empty());
    assert!(h.calls_with("deploy.").is_empty());
    assert!(h.calls_with("upload").is_empty());
    assert!(report.reason.as_deref().unwrap_or_default().contains("Exit status 2"));
}

#[tokio::test]
async fn test_other_build_stderr_does_not_abort() {
    let h = harness(Setup {
        replies: vec![(
            "npm run build:prod",
            CommandOutput::new("", "WARNING in asset size limit"),
        )],
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_completed(&report);
    assert!(h.notices().contains(&"Production build completed".to_string()));
}

#[tokio::test]
async fn test_declining_empty_repo_prompt_touches_nothing() {
    let h = harness(Setup {
        answers: vec!["n"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_aborted_at(&report, "confirm-empty-repo");
    assert!(matches!(report.result.reason(), Some(WorkflowError::UserAbort(_))));
    assert_eq!(report.reason.as_deref(), Some("shop-front aborted by operator"));
    assert_eq!(h.calls(), vec!["prompt Do you want to continue? Y/n"]);
}

#[tokio::test]
async fn test_closed_input_aborts_at_the_prompt() {
    let h = harness(Setup {
        answers: vec!["y"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_aborted_at(&report, "confirm-app-engine");
    assert!(matches!(report.result.reason(), Some(WorkflowError::UserAbort(_))));
    assert!(h.calls_with("command ").is_empty());
    assert!(h.calls_with("fs.create ./index.html").is_empty());
}

#[tokio::test]
async fn test_failed_push_stops_before_deploy() {
    let h = harness(Setup {
        fail_on: Some("git.push"),
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("gae")).await;

    assert_aborted_at(&report, "git-push");
    assert!(h.calls_with("deploy.").is_empty());
    assert!(h.calls_with("upload").is_empty());
}

#[tokio::test]
async fn test_failed_deploy_skips_upload() {
    let h = harness(Setup {
        fail_on: Some("deploy.app_engine"),
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("gae")).await;

    assert_aborted_at(&report, "deploy-app-engine");
    assert_eq!(h.calls_with("git.push"), vec!["git.push 1.2.0"]);
    assert!(h.calls_with("upload").is_empty());
}

#[tokio::test]
async fn test_abort_emits_failure_then_finish() {
    let h = harness(Setup {
        fail_on: Some("git.push"),
        ..Setup::default()
    });

    h.orchestrator.deploy("1.2.0", Some("gae")).await;

    let events = h.events.lock().unwrap();
    let tail: Vec<&ExecutionEvent> = events.iter().rev().take(2).collect();
    assert!(matches!(tail[0], ExecutionEvent::PipelineFinished { .. }));
    assert!(matches!(tail[1], ExecutionEvent::StepFailed { step, .. } if step == "git-push"));
}
