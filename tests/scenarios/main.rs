//! Scenario tests for the init and deploy workflows
//!
//! Every collaborator is faked and records into one ordered call log.

mod helpers;

mod abort_semantics;
mod deploy_flow;
mod init_flow;
