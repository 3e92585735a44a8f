//! Deploy workflow: step order per platform, index rewrite and reporting

use crate::helpers::*;
use release_flow::core::WorkflowError;
use release_flow::execution::{CommandOutput, ExecutionEvent};

#[tokio::test]
async fn test_deploy_to_elastic_beanstalk_runs_every_stage_in_order() {
    let h = harness(Setup {
        storage: true,
        index_rewrite: true,
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_completed(&report);
    assert_eq!(
        h.calls(),
        vec![
            "command npm run test",
            "command npm run build:prod",
            "config.require_active storage",
            "config.get_active storage",
            "fs.rewrite_reference build/index.html bundle.js https://s3.eu-west-1.amazonaws.com/assets/bundle.js",
            "git.push 1.2.0",
            "deploy.elastic_beanstalk 1.2.0 staged=false",
            "upload compressed=true",
        ]
    );
    assert_eq!(report.skipped_steps(), vec!["deploy-app-engine", "deploy-default"]);
}

#[tokio::test]
async fn test_deploy_to_app_engine() {
    let h = harness(Setup::default());

    let report = h.orchestrator.deploy("2.0.1", Some("gae")).await;

    assert_completed(&report);
    assert_eq!(h.calls_with("deploy."), vec!["deploy.app_engine 2.0.1"]);
    assert_eq!(
        report.executed_steps(),
        vec!["test", "build", "git-push", "deploy-app-engine", "bundle-upload"]
    );
}

#[tokio::test]
async fn test_deploy_without_platform_uses_default_target() {
    let h = harness(Setup::default());

    let report = h.orchestrator.deploy("0.3.0", None).await;

    assert_completed(&report);
    assert_eq!(h.calls_with("deploy."), vec!["deploy.default 0.3.0"]);
    assert_eq!(
        report.skipped_steps(),
        vec!["deploy-app-engine", "deploy-elastic-beanstalk"]
    );
}

#[tokio::test]
async fn test_missing_storage_profile_aborts_before_push() {
    let h = harness(Setup {
        storage: false,
        index_rewrite: true,
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_aborted_at(&report, "index-rewrite");
    assert!(report.reason.as_deref().unwrap_or_default().contains("storage"));
    assert!(h.calls_with("fs.").is_empty());
    assert!(h.calls_with("git.").is_empty());
    assert!(h.calls_with("upload").is_empty());
}

#[tokio::test]
async fn test_storage_profile_without_region_aborts_before_push() {
    let h = harness(Setup {
        storage: true,
        storage_values: vec![("bucket", "assets")],
        index_rewrite: true,
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_aborted_at(&report, "index-rewrite");
    assert!(matches!(report.result.reason(), Some(WorkflowError::Config(_))));
    assert!(h.calls_with("fs.rewrite_reference").is_empty());
    assert!(h.calls_with("git.").is_empty());
}

#[tokio::test]
async fn test_deploy_without_index_rewrite_never_reads_storage() {
    let h = harness(Setup::default());

    let report = h.orchestrator.deploy("1.2.0", Some("eb")).await;

    assert_completed(&report);
    assert!(h.calls_with("config.").is_empty());
    assert!(h.calls_with("fs.").is_empty());
}

#[tokio::test]
async fn test_failing_tests_are_reported_and_deploy_continues() {
    let h = harness(Setup {
        replies: vec![(
            "npm run test",
            CommandOutput::new("", "FAIL src/Home.test.js").with_exit_code(1),
        )],
        ..Setup::default()
    });

    let report = h.orchestrator.deploy("1.2.0", Some("gae")).await;

    assert_completed(&report);
    assert!(h.notices().contains(&"FAIL src/Home.test.js".to_string()));
    assert_eq!(h.calls_with("git.push"), vec!["git.push 1.2.0"]);
}

#[tokio::test]
async fn test_step_descriptions_carry_the_version() {
    let h = harness(Setup::default());

    h.orchestrator.deploy("4.5.6", Some("gae")).await;

    let descriptions: Vec<String> = h
        .events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            ExecutionEvent::StepStarted { description, .. } => description.clone(),
            _ => None,
        })
        .collect();

    assert!(descriptions.contains(&"Pushing version 4.5.6...".to_string()));
    assert!(descriptions.contains(&"Deploying 4.5.6 to Google App Engine...".to_string()));
}

#[tokio::test]
async fn test_report_serializes_the_run() {
    let h = harness(Setup::default());

    let report = h.orchestrator.deploy("1.0.0", Some("eb")).await;
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["workflow"], "deploy");
    assert_eq!(json["project_name"], "shop-front");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["status"], "Completed");
    assert!(json["failing_step"].is_null());
    assert_eq!(json["steps"].as_array().map(|s| s.len()), Some(7));
}
