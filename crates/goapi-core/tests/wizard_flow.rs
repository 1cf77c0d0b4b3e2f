//! End-to-end wizard flows driven through `Wizard::update`

use goapi_core::aws::{AwsCredentials, AwsProfiles};
use goapi_core::runtime::DeployOutput;
use goapi_core::wizard::{Command, Input, Message, Outcome, Step};
use goapi_core::{
    CatalogError, DatabaseKind, DeployError, Framework, GenerateError, GenerationReport, Wizard,
    WizardDefaults,
};
use std::collections::HashMap;
use std::path::PathBuf;

struct Profiles(HashMap<String, AwsCredentials>);

impl Profiles {
    fn with_work_profile() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert("default".to_string(), AwsCredentials::default());
        profiles.insert(
            "work".to_string(),
            AwsCredentials {
                access_key_id: "AKIAWORK1234".to_string(),
                secret_access_key: "worksecret".to_string(),
                region: "eu-west-1".to_string(),
            },
        );
        Self(profiles)
    }
}

impl AwsProfiles for Profiles {
    fn list_profiles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.keys().filter(|n| *n != "default").cloned().collect();
        names.sort();
        names.insert(0, "default".to_string());
        names
    }

    fn load_credentials(&self, profile: &str) -> AwsCredentials {
        self.0.get(profile).cloned().unwrap_or_default()
    }
}

fn wizard() -> Wizard {
    Wizard::new(
        WizardDefaults {
            project_name: "my-api".to_string(),
            module_prefix: "github.com/user".to_string(),
            aws_region: "us-east-1".to_string(),
        },
        Box::new(Profiles::with_work_profile()),
    )
}

fn press(wizard: &mut Wizard, input: Input) -> Command {
    wizard.update(Message::Input(input))
}

fn type_text(wizard: &mut Wizard, text: &str) {
    for c in text.chars() {
        press(wizard, Input::Char(c));
    }
}

fn clear(wizard: &mut Wizard) {
    press(wizard, Input::End);
    let len = wizard
        .text_input(wizard.step())
        .map(|input| input.value().chars().count())
        .unwrap_or(0);
    for _ in 0..len {
        press(wizard, Input::Backspace);
    }
}

fn report(dir: &str) -> GenerationReport {
    GenerationReport {
        output_dir: PathBuf::from(dir),
        files: vec!["go.mod".to_string()],
    }
}

/// Welcome through project name "orders", stopping at DatabaseSelection
fn to_database(wizard: &mut Wizard) {
    press(wizard, Input::Confirm);
    clear(wizard);
    type_text(wizard, "orders");
    press(wizard, Input::Confirm);
    press(wizard, Input::Confirm);
    press(wizard, Input::Confirm);
    assert_eq!(wizard.step(), Step::DatabaseSelection);
}

#[test]
fn test_postgres_flow_skips_aws_steps() {
    let mut w = wizard();
    to_database(&mut w);

    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::FrameworkSelection);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::DeploySelection);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::Review);

    let Command::Generate(config) = press(&mut w, Input::Confirm) else {
        panic!("expected generate");
    };
    assert_eq!(config.project_name, "orders");
    assert_eq!(config.module_path, "github.com/user/orders");
    assert_eq!(config.output_dir, PathBuf::from("./orders"));
    assert_eq!(config.database.kind, DatabaseKind::Postgres);
    assert_eq!(config.framework, Framework::Chi);
    assert!(config.deploy_enabled);
    assert!(!w.deploy_requested());

    assert!(!w.history().contains(&Step::AwsProfileSelection));
    assert_eq!(w.step(), Step::Generating);

    assert_eq!(w.update(Message::GenerationFinished(Ok(report("./orders")))), Command::None);
    assert_eq!(w.step(), Step::Complete);
    assert!(w.outcome().is_some_and(Outcome::is_success));
    assert_eq!(press(&mut w, Input::Confirm), Command::Quit);
}

#[test]
fn test_dynamodb_flow_prefills_from_profile() {
    let mut w = wizard();
    to_database(&mut w);

    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::AwsProfileSelection);
    assert_eq!(w.aws_profiles().items().len(), 2);

    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::AwsAccessKeyId);
    assert_eq!(w.text_input(Step::AwsAccessKeyId).unwrap().value(), "AKIAWORK1234");
    assert_eq!(
        w.text_input(Step::AwsAccessKeyId).unwrap().display_value(),
        "********1234"
    );

    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::AwsRegion);
    assert_eq!(w.text_input(Step::AwsRegion).unwrap().value(), "eu-west-1");
    press(&mut w, Input::Confirm);

    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Down);
    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::Review);

    let review = w.review();
    let secret = review
        .iter()
        .find(|(label, _)| label.contains("Secret"))
        .map(|(_, value)| value.as_str());
    assert_eq!(secret, Some("******cret"));

    let Command::Generate(config) = press(&mut w, Input::Confirm) else {
        panic!("expected generate");
    };
    assert_eq!(config.database.kind, DatabaseKind::DynamoDb);
    assert_eq!(config.database.aws_access_key_id, "AKIAWORK1234");
    assert_eq!(config.database.aws_secret_key, "worksecret");
    assert_eq!(config.database.aws_region, "eu-west-1");
    assert_eq!(config.framework, Framework::ConnectRpc);
    assert!(!config.deploy_enabled);
}

#[test]
fn test_default_profile_without_keys_leaves_fields_empty() {
    let mut w = wizard();
    to_database(&mut w);
    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);

    assert_eq!(w.step(), Step::AwsAccessKeyId);
    assert!(w.text_input(Step::AwsAccessKeyId).unwrap().is_empty());

    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::AwsAccessKeyId);
    assert_eq!(
        w.error().map(ToString::to_string).as_deref(),
        Some("AWS Access Key ID is required")
    );

    type_text(&mut w, "A");
    assert!(w.error().is_none());
}

#[test]
fn test_back_navigation_retraces_history() {
    let mut w = wizard();
    to_database(&mut w);
    press(&mut w, Input::Down);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::AwsProfileSelection);

    press(&mut w, Input::Back);
    assert_eq!(w.step(), Step::DatabaseSelection);

    // Switching back to Postgres drops the AWS branch
    press(&mut w, Input::Up);
    press(&mut w, Input::Confirm);
    assert_eq!(w.step(), Step::FrameworkSelection);

    for expected in [
        Step::DatabaseSelection,
        Step::OutputDir,
        Step::ModulePath,
        Step::ProjectName,
        Step::Welcome,
        Step::Welcome,
    ] {
        press(&mut w, Input::Back);
        assert_eq!(w.step(), expected);
    }
}

#[test]
fn test_deploy_now_with_missing_tool() {
    let mut w = wizard();
    to_database(&mut w);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Up);
    press(&mut w, Input::Confirm);

    let Command::Generate(config) = press(&mut w, Input::Confirm) else {
        panic!("expected generate");
    };
    assert!(config.deploy_enabled);
    assert!(w.deploy_requested());

    // Input is ignored while the job runs
    assert_eq!(press(&mut w, Input::Back), Command::None);
    assert_eq!(w.step(), Step::Generating);

    w.update(Message::Tick);
    assert_eq!(w.spinner().ticks(), 1);

    let command = w.update(Message::GenerationFinished(Ok(report("./orders"))));
    assert_eq!(
        command,
        Command::Deploy {
            project_name: "orders".to_string(),
            project_dir: PathBuf::from("./orders"),
        }
    );
    assert!(w.is_deploying());
    assert_eq!(w.step(), Step::Generating);

    let docs = "https://fly.io/docs/getting-started/installing-flyctl/";
    w.update(Message::DeploymentFinished(Err(DeployError::ToolNotFound {
        candidates: "flyctl or fly".to_string(),
        docs_url: docs.to_string(),
    })));

    assert_eq!(w.step(), Step::Complete);
    let outcome = w.outcome().unwrap();
    assert!(outcome.is_success());
    assert!(outcome.deploy_error().is_some_and(DeployError::is_tool_not_found));
    assert_eq!(w.docs_url(), Some(docs));
    assert_eq!(press(&mut w, Input::Char('o')), Command::OpenUrl(docs.to_string()));
}

#[test]
fn test_successful_deploy_is_recorded() {
    let mut w = wizard();
    to_database(&mut w);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Up);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);

    w.update(Message::GenerationFinished(Ok(report("./orders"))));
    w.update(Message::DeploymentFinished(Ok(DeployOutput {
        tool: PathBuf::from("/usr/local/bin/flyctl"),
        output: "Visit your app".to_string(),
    })));

    match w.outcome() {
        Some(Outcome::Generated {
            deployment: Some(Ok(output)),
            ..
        }) => assert_eq!(output.output, "Visit your app"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(w.docs_url(), None);
    assert_eq!(press(&mut w, Input::Char('o')), Command::None);
}

#[test]
fn test_generation_failure_skips_deploy() {
    let mut w = wizard();
    to_database(&mut w);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Up);
    press(&mut w, Input::Confirm);
    press(&mut w, Input::Confirm);

    let command = w.update(Message::GenerationFinished(Err(GenerateError::Catalog(
        CatalogError::NotFound {
            path: "templates/base/go.mod.tmpl".to_string(),
        },
    ))));

    assert_eq!(command, Command::None);
    assert_eq!(w.step(), Step::Complete);
    assert!(matches!(w.outcome(), Some(Outcome::Failed(_))));

    // A late deploy result has nothing to attach to
    w.update(Message::DeploymentFinished(Ok(DeployOutput {
        tool: PathBuf::from("flyctl"),
        output: String::new(),
    })));
    assert!(matches!(w.outcome(), Some(Outcome::Failed(_))));
}
