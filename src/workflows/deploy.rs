//! Deploy workflow - tests, builds and publishes a release

use crate::core::{config::ReleaseConfig, Delegate, FileOp, Platform, Step, StepCondition};
use crate::execution::CommandPurpose;

/// Steps of the deploy workflow, in order
///
/// Exactly one of the three deploy steps runs, picked by the context's
/// platform when the run reaches them.
pub fn steps(config: &ReleaseConfig) -> Vec<Step> {
    let mut steps = vec![
        Step::command("test", CommandPurpose::Test, config.commands.test.as_str()).describe("Running npm tests..."),
        Step::command("build", CommandPurpose::Build, config.commands.build.as_str())
            .describe("Running production build..."),
    ];

    if let Some(rewrite) = &config.index_rewrite {
        steps.push(
            Step::file_op(
                "index-rewrite",
                FileOp::RewriteReference {
                    target: rewrite.target.clone(),
                    marker: rewrite.marker.clone(),
                    url: rewrite.url.clone(),
                },
            )
            .describe(format!("Pointing {} at the active storage bucket...", rewrite.target)),
        );
    }

    steps.extend([
        Step::delegate("git-push", Delegate::GitPush).describe("Pushing version {{ version }}..."),
        Step::delegate("deploy-app-engine", Delegate::AppEngineDeploy)
            .describe("Deploying {{ version }} to Google App Engine...")
            .when(StepCondition::Platform(Some(Platform::Gae))),
        Step::delegate("deploy-elastic-beanstalk", Delegate::ElasticBeanstalkDeploy { staged: false })
            .describe("Deploying {{ version }} to Elastic Beanstalk...")
            .when(StepCondition::Platform(Some(Platform::Eb))),
        Step::delegate("deploy-default", Delegate::DefaultDeploy)
            .describe("Deploying {{ version }}...")
            .when(StepCondition::Platform(None)),
        Step::delegate(
            "bundle-upload",
            Delegate::BundleUpload {
                compressed: config.upload.compressed,
            },
        )
        .describe("Uploading bundle..."),
    ]);

    steps
}
