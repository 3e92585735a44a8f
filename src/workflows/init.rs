//! Init workflow - scaffolds a new front-end project

use crate::core::{
    config::ReleaseConfig, Delegate, FileOp, FileSpec, Step, StepCondition, StepNotice,
};
use crate::execution::CommandPurpose;

pub const CONFIRM_EMPTY_REPO: &str = "empty_repo";
pub const CONFIRM_APP_ENGINE: &str = "app_engine";
pub const CONFIRM_RUN_TESTS: &str = "run_tests";
pub const CONFIRM_BUILD_AND_RUN: &str = "build_and_run";

/// Directory skeleton of a new project
pub const DIRECTORIES: &[&str] = &[
    "./build",
    "./src",
    "./src/components",
    "./src/components/Container",
    "./src/components/Head",
    "./src/components/views",
    "./src/components/views/Home",
    "./src/components/views/PageNotFound",
    "./src/utils",
];

/// (path, template) pairs
type FileTable = &'static [(&'static str, &'static str)];

pub const CONFIG_FILES: FileTable = &[
    ("./.babelrc", "config/babelrc"),
    ("./.eslintrc", "config/eslintrc"),
    ("./jest.config.js", "config/jest_config"),
    ("./src/enzyme.js", "config/enzyme"),
    ("./package.json", "config/package"),
    ("./webpack.config.js", "config/webpack_config"),
    ("./webpack.dev.config.js", "config/webpack_dev_config"),
    ("./webpack.prod.config.js", "config/webpack_prod_config"),
];

pub const GIT_FILES: FileTable = &[
    ("./.gitignore", "git/gitignore"),
    ("./CHANGELOG.md", "git/changelog"),
    ("./README.md", "git/readme"),
];

pub const APP_ENGINE_FILES: FileTable = &[
    ("./app.yaml", "gae/app_yaml"),
    ("./.gcloudignore", "gae/gcloudignore"),
];

pub const APP_FILES: FileTable = &[
    ("./index.html", "app/index_html"),
    ("./src/index.js", "app/main_index"),
    ("./src/index.less", "app/index_less"),
    ("./src/variables.less", "app/variables_less"),
    ("./src/components/Container/Container.js", "app/container"),
    ("./src/components/Container/Container.test.js", "app/container_test"),
    ("./src/components/Container/container.less", "app/container_less"),
    ("./src/components/Container/index.js", "app/container_index"),
    ("./src/components/Head/Head.js", "app/head"),
    ("./src/components/Head/index.js", "app/head_index"),
    ("./src/components/views/Home/Home.js", "app/home"),
    ("./src/components/views/Home/Home.test.js", "app/home_test"),
    ("./src/components/views/Home/home.less", "app/home_less"),
    ("./src/components/views/Home/index.js", "app/home_index"),
    ("./src/components/views/PageNotFound/PageNotFound.js", "app/page_not_found"),
    ("./src/components/views/PageNotFound/PageNotFound.test.js", "app/page_not_found_test"),
    ("./src/components/views/PageNotFound/pagenotfound.less", "app/page_not_found_less"),
    ("./src/components/views/PageNotFound/index.js", "app/page_not_found_index"),
];

pub const UTIL_FILES: FileTable = &[("./src/utils/Environment.js", "util/environment")];

fn files(table: FileTable) -> FileOp {
    FileOp::CreateFiles(
        table
            .iter()
            .map(|(path, template)| FileSpec::new(*path, *template))
            .collect(),
    )
}

fn confirmed(key: &str) -> StepCondition {
    StepCondition::Confirmed(key.to_string())
}

/// Steps of the init workflow, in order
pub fn steps(config: &ReleaseConfig) -> Vec<Step> {
    let commands = &config.commands;

    vec![
        Step::require_confirmation("confirm-empty-repo", CONFIRM_EMPTY_REPO, "Do you want to continue? Y/n")
            .describe("Please make sure that an empty repo has already been created on GitHub for this project."),
        Step::delegate("git-init", Delegate::GitInit).describe("Initialising git repository..."),
        Step::file_op(
            "folders",
            FileOp::MakeDirs(DIRECTORIES.iter().map(|d| d.to_string()).collect()),
        )
        .describe("Creating folders..."),
        Step::file_op("config-files", files(CONFIG_FILES)).describe("Creating config files..."),
        Step::file_op("git-files", files(GIT_FILES)).describe("Creating git files..."),
        Step::confirm(
            "confirm-app-engine",
            CONFIRM_APP_ENGINE,
            "Will this project be deployed on google app engine? Y/n",
        ),
        Step::file_op("app-engine-files", files(APP_ENGINE_FILES))
            .describe("Creating google app engine files...")
            .when(confirmed(CONFIRM_APP_ENGINE)),
        Step::file_op("app-files", files(APP_FILES)).describe("Creating app files..."),
        Step::file_op("util-files", files(UTIL_FILES)).describe("Creating util files..."),
        Step::command("install", CommandPurpose::PackageInstall, commands.install.as_str())
            .describe("Installing npm packages..."),
        Step::confirm("confirm-tests", CONFIRM_RUN_TESTS, "Would you like to run npm tests? Y/n"),
        Step::command("test", CommandPurpose::Test, commands.test.as_str())
            .describe("Running npm tests...")
            .when(confirmed(CONFIRM_RUN_TESTS)),
        Step::confirm(
            "confirm-build-and-run",
            CONFIRM_BUILD_AND_RUN,
            "Would you like to build and run {{ project_name }}? Y/n",
        ),
        Step::command("build-and-run", CommandPurpose::Launch, commands.launch.as_str())
            .describe("Building and running {{ project_name }}...")
            .when(confirmed(CONFIRM_BUILD_AND_RUN)),
        Step::notice(
            "next-steps",
            vec![
                StepNotice::success("{{ project_name }} initialisation finished"),
                StepNotice::info("Next Steps:"),
                StepNotice::info("1. Set constants in src/utils/Environment.js"),
            ],
        ),
    ]
}
