//! Init workflow: scaffolding, confirmation gates and install outcomes

use crate::helpers::*;
use release_flow::execution::CommandOutput;

const ALL_YES: [&str; 4] = ["y", "y", "y", "y"];

#[tokio::test]
async fn test_init_with_every_gate_confirmed() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        replies: vec![("npm install", CommandOutput::new("added 1204 packages in 41s", ""))],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    assert!(report.skipped_steps().is_empty());

    assert_eq!(h.calls_with("git.init").len(), 1);
    assert_eq!(h.calls_with("fs.make_dir").len(), 9);
    assert_eq!(h.calls_with("fs.create").len(), 32);
    assert_eq!(
        h.calls_with("command "),
        vec![
            "command npm install",
            "command npm run test",
            "command open-terminal npm run build",
        ]
    );

    let notices = h.notices();
    assert!(notices.contains(&"Installed npm packages".to_string()));
    assert!(notices.contains(&"shop-front initialisation finished".to_string()));
    assert!(notices.contains(&"1. Set constants in src/utils/Environment.js".to_string()));
}

#[tokio::test]
async fn test_generated_files_carry_the_project_name() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        ..Setup::default()
    });

    h.orchestrator.init("shop-front").await;

    let files = h.fakes.files.lock().unwrap();
    let package: serde_json::Value = serde_json::from_str(&files["./package.json"]).unwrap();
    assert_eq!(package["name"], "shop-front");
    assert!(files["./README.md"].contains("# shop-front"));
    assert!(files.contains_key("./app.yaml"));
}

#[tokio::test]
async fn test_declined_gates_skip_their_steps() {
    let h = harness(Setup {
        answers: vec!["y", "n", "n", "n"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    assert_eq!(
        report.skipped_steps(),
        vec!["app-engine-files", "test", "build-and-run"]
    );
    assert_eq!(h.calls_with("command "), vec!["command npm install"]);
    assert!(h.calls_with("fs.create ./app.yaml").is_empty());
    assert!(h.calls_with("fs.create ./.gcloudignore").is_empty());
    assert_eq!(h.calls_with("fs.create").len(), 30);
}

#[tokio::test]
async fn test_uppercase_answers_confirm() {
    let h = harness(Setup {
        answers: vec!["Y", "Y", "n", "N"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    assert_eq!(report.skipped_steps(), vec!["test", "build-and-run"]);
    assert_eq!(h.calls_with("fs.create ./app.yaml").len(), 1);
}

#[tokio::test]
async fn test_prompts_are_asked_in_order() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        ..Setup::default()
    });

    h.orchestrator.init("shop-front").await;

    assert_eq!(
        h.calls_with("prompt "),
        vec![
            "prompt Do you want to continue? Y/n",
            "prompt Will this project be deployed on google app engine? Y/n",
            "prompt Would you like to run npm tests? Y/n",
            "prompt Would you like to build and run shop-front? Y/n",
        ]
    );
}

#[tokio::test]
async fn test_install_warnings_do_not_abort() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        replies: vec![(
            "npm install",
            CommandOutput::new("added 12 packages", "npm WARN deprecated left-pad@1.3.0"),
        )],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    assert!(h
        .notices()
        .contains(&"NPM Warning: npm WARN deprecated left-pad@1.3.0".to_string()));
}

#[tokio::test]
async fn test_install_errors_are_reported_and_init_continues() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        replies: vec![(
            "npm install",
            CommandOutput::new("", "npm ERR! code E404").with_exit_code(1),
        )],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    assert!(h.notices().contains(&"NPM Error: npm ERR! code E404".to_string()));
    assert_eq!(h.calls_with("command npm run test").len(), 1);
}

#[tokio::test]
async fn test_install_that_cannot_start_aborts() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        spawn_failures: vec!["npm install"],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_aborted_at(&report, "install");
    assert_eq!(h.calls_with("prompt ").len(), 2);
    assert_eq!(h.calls_with("command "), vec!["command npm install"]);
}

#[tokio::test]
async fn test_launch_stderr_is_reported_not_fatal() {
    let h = harness(Setup {
        answers: ALL_YES.to_vec(),
        replies: vec![("open-terminal", CommandOutput::new("", "execution error: Not authorized"))],
        ..Setup::default()
    });

    let report = h.orchestrator.init("shop-front").await;

    assert_completed(&report);
    let notices = h.notices();
    assert!(notices.contains(&"execution error: Not authorized".to_string()));
    assert!(notices.contains(&"shop-front initialisation finished".to_string()));
}
