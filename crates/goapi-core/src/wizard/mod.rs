//! Interactive configuration wizard
//!
//! The wizard is a pure state machine: [`Wizard::update`] consumes a
//! [`Message`] and returns the [`Command`] the front-end should execute.
//! It performs no terminal or file-system I/O of its own apart from the
//! AWS profile lookup, which goes through the [`AwsProfiles`] boundary.
//!
//! Steps, in forward order:
//!
//! ```text
//! Welcome → ProjectName → ModulePath → OutputDir → DatabaseSelection
//!   → [AwsProfileSelection → AwsAccessKeyId → AwsSecretKey → AwsRegion]
//!   → FrameworkSelection → DeploySelection → Review → Generating → Complete
//! ```
//!
//! The bracketed steps are only visited when DynamoDB is selected.

mod forms;

pub use forms::{mask, Choice, SelectList, Spinner, TextInput};

use crate::aws::{AwsProfiles, DEFAULT_AWS_REGION};
use crate::config::{DatabaseConfig, DatabaseKind, Framework, ProjectConfig};
use crate::error::{DeployError, GenerateError, ValidationError};
use crate::generator::GenerationReport;
use crate::product::ProductConfig;
use crate::runtime::DeployOutput;
use std::path::PathBuf;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    ProjectName,
    ModulePath,
    OutputDir,
    DatabaseSelection,
    AwsProfileSelection,
    AwsAccessKeyId,
    AwsSecretKey,
    AwsRegion,
    FrameworkSelection,
    DeploySelection,
    Review,
    Generating,
    Complete,
}

impl Step {
    /// Step reached by confirming this one
    ///
    /// `None` for Generating and Complete, which are left by task
    /// completion and quitting respectively.
    pub fn forward(self, database: DatabaseKind) -> Option<Step> {
        let next = match self {
            Step::Welcome => Step::ProjectName,
            Step::ProjectName => Step::ModulePath,
            Step::ModulePath => Step::OutputDir,
            Step::OutputDir => Step::DatabaseSelection,
            Step::DatabaseSelection => match database {
                DatabaseKind::Postgres => Step::FrameworkSelection,
                DatabaseKind::DynamoDb => Step::AwsProfileSelection,
            },
            Step::AwsProfileSelection => Step::AwsAccessKeyId,
            Step::AwsAccessKeyId => Step::AwsSecretKey,
            Step::AwsSecretKey => Step::AwsRegion,
            Step::AwsRegion => Step::FrameworkSelection,
            Step::FrameworkSelection => Step::DeploySelection,
            Step::DeploySelection => Step::Review,
            Step::Review => Step::Generating,
            Step::Generating | Step::Complete => return None,
        };
        Some(next)
    }

    /// Whether the step edits free text
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            Step::ProjectName
                | Step::ModulePath
                | Step::OutputDir
                | Step::AwsAccessKeyId
                | Step::AwsSecretKey
                | Step::AwsRegion
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Welcome => "Welcome",
            Step::ProjectName => "Project Name",
            Step::ModulePath => "Go Module Path",
            Step::OutputDir => "Output Directory",
            Step::DatabaseSelection => "Database",
            Step::AwsProfileSelection => "AWS Profile",
            Step::AwsAccessKeyId => "AWS Access Key ID",
            Step::AwsSecretKey => "AWS Secret Access Key",
            Step::AwsRegion => "AWS Region",
            Step::FrameworkSelection => "API Framework",
            Step::DeploySelection => "Deployment",
            Step::Review => "Review",
            Step::Generating => "Generating",
            Step::Complete => "Complete",
        }
    }
}

/// Answer to the deployment step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployChoice {
    /// Generate deployment files, then run the deploy tool
    DeployNow,
    /// Generate deployment files only
    FilesOnly,
    /// Generate no deployment files
    Skip,
}

impl DeployChoice {
    pub fn deploy_enabled(self) -> bool {
        !matches!(self, DeployChoice::Skip)
    }

    pub fn deploy_now(self) -> bool {
        matches!(self, DeployChoice::DeployNow)
    }

    pub fn title(self) -> &'static str {
        match self {
            DeployChoice::DeployNow => "Generate deployment files and deploy now",
            DeployChoice::FilesOnly => "Generate deployment files only",
            DeployChoice::Skip => "Skip deployment files",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DeployChoice::DeployNow => "Runs fly launch once the project is generated",
            DeployChoice::FilesOnly => "fly.toml, Dockerfile and a GitHub Actions workflow",
            DeployChoice::Skip => "Deploy however you like later",
        }
    }
}

/// Front-end input, already decoded from key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Confirm,
    Back,
    Quit,
}

/// Everything that can change wizard state
#[derive(Debug)]
pub enum Message {
    Input(Input),
    /// Progress timer; only meaningful while generating
    Tick,
    GenerationFinished(Result<GenerationReport, GenerateError>),
    DeploymentFinished(Result<DeployOutput, DeployError>),
}

/// Effect requested by the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Generate(ProjectConfig),
    Deploy {
        project_name: String,
        project_dir: PathBuf,
    },
    OpenUrl(String),
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    /// The project was generated; a failed deployment is only an annotation
    Generated {
        report: GenerationReport,
        deployment: Option<Result<DeployOutput, DeployError>>,
    },
    Failed(GenerateError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Generated { .. })
    }

    pub fn deploy_error(&self) -> Option<&DeployError> {
        match self {
            Outcome::Generated {
                deployment: Some(Err(error)),
                ..
            } => Some(error),
            _ => None,
        }
    }
}

/// Values pre-filled into a fresh wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefaults {
    pub project_name: String,
    pub module_prefix: String,
    pub aws_region: String,
}

impl WizardDefaults {
    pub fn from_product<P: ProductConfig>(product: &P) -> Self {
        Self {
            project_name: product.default_project_name().to_string(),
            module_prefix: product.module_prefix().to_string(),
            aws_region: DEFAULT_AWS_REGION.to_string(),
        }
    }

    pub fn module_path(&self, project_name: &str) -> String {
        format!("{}/{}", self.module_prefix, project_name)
    }

    pub fn output_dir(&self, project_name: &str) -> String {
        format!("./{project_name}")
    }
}

/// Wizard state
pub struct Wizard {
    step: Step,
    history: Vec<Step>,
    defaults: WizardDefaults,
    /// Project name the module path and output dir were last suggested for
    suggested_name: String,
    project_name: TextInput,
    module_path: TextInput,
    output_dir: TextInput,
    database: SelectList<DatabaseKind>,
    aws_profile: SelectList<String>,
    aws_access_key_id: TextInput,
    aws_secret_key: TextInput,
    aws_region: TextInput,
    framework: SelectList<Framework>,
    deploy: SelectList<DeployChoice>,
    error: Option<ValidationError>,
    spinner: Spinner,
    submitted: Option<ProjectConfig>,
    deploy_requested: bool,
    deploying: bool,
    pending_report: Option<GenerationReport>,
    outcome: Option<Outcome>,
    profiles: Box<dyn AwsProfiles>,
}

impl Wizard {
    pub fn new(defaults: WizardDefaults, profiles: Box<dyn AwsProfiles>) -> Self {
        let name = defaults.project_name.clone();

        let database = SelectList::new(
            "Select database:",
            [DatabaseKind::Postgres, DatabaseKind::DynamoDb]
                .into_iter()
                .map(|kind| Choice::new(kind, kind.display_name(), kind.description()))
                .collect(),
        );
        let framework = SelectList::new(
            "Select API framework:",
            [Framework::Chi, Framework::ConnectRpc]
                .into_iter()
                .map(|fw| Choice::new(fw, fw.display_name(), fw.description()))
                .collect(),
        );
        let mut deploy = SelectList::new(
            "Deployment:",
            [DeployChoice::DeployNow, DeployChoice::FilesOnly, DeployChoice::Skip]
                .into_iter()
                .map(|choice| Choice::new(choice, choice.title(), choice.description()))
                .collect(),
        );
        deploy.select(&DeployChoice::FilesOnly);

        Self {
            step: Step::Welcome,
            history: Vec::new(),
            project_name: TextInput::new("Project name:", name.clone()),
            module_path: TextInput::new("Go module path:", defaults.module_path(&name)),
            output_dir: TextInput::new("Output directory:", defaults.output_dir(&name)),
            database,
            aws_profile: SelectList::new("Select AWS profile:", Vec::new()),
            aws_access_key_id: TextInput::sensitive("AWS Access Key ID:", ""),
            aws_secret_key: TextInput::sensitive("AWS Secret Access Key:", ""),
            aws_region: TextInput::new("AWS region:", defaults.aws_region.clone()),
            framework,
            deploy,
            error: None,
            spinner: Spinner::default(),
            submitted: None,
            deploy_requested: false,
            deploying: false,
            pending_report: None,
            outcome: None,
            suggested_name: name,
            defaults,
            profiles,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Visited steps, most recent last
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    /// True while the deploy tool runs after a successful generation
    pub fn is_deploying(&self) -> bool {
        self.deploying
    }

    pub fn deploy_requested(&self) -> bool {
        self.deploy_requested
    }

    /// Configuration handed to the generator, once Review is confirmed
    pub fn submitted_config(&self) -> Option<&ProjectConfig> {
        self.submitted.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn database(&self) -> &SelectList<DatabaseKind> {
        &self.database
    }

    pub fn aws_profiles(&self) -> &SelectList<String> {
        &self.aws_profile
    }

    pub fn framework(&self) -> &SelectList<Framework> {
        &self.framework
    }

    pub fn deploy(&self) -> &SelectList<DeployChoice> {
        &self.deploy
    }

    /// Text field edited on `step`, if it is a text step
    pub fn text_input(&self, step: Step) -> Option<&TextInput> {
        match step {
            Step::ProjectName => Some(&self.project_name),
            Step::ModulePath => Some(&self.module_path),
            Step::OutputDir => Some(&self.output_dir),
            Step::AwsAccessKeyId => Some(&self.aws_access_key_id),
            Step::AwsSecretKey => Some(&self.aws_secret_key),
            Step::AwsRegion => Some(&self.aws_region),
            _ => None,
        }
    }

    fn text_input_mut(&mut self, step: Step) -> Option<&mut TextInput> {
        match step {
            Step::ProjectName => Some(&mut self.project_name),
            Step::ModulePath => Some(&mut self.module_path),
            Step::OutputDir => Some(&mut self.output_dir),
            Step::AwsAccessKeyId => Some(&mut self.aws_access_key_id),
            Step::AwsSecretKey => Some(&mut self.aws_secret_key),
            Step::AwsRegion => Some(&mut self.aws_region),
            _ => None,
        }
    }

    fn database_kind(&self) -> DatabaseKind {
        self.database
            .selected_value()
            .copied()
            .unwrap_or(DatabaseKind::Postgres)
    }

    /// Label/value pairs shown on the review step, secrets masked
    pub fn review(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Project name", self.project_name.value().to_string()),
            ("Module path", self.module_path.value().to_string()),
            ("Output directory", self.output_dir.value().to_string()),
            ("Database", self.database_kind().display_name().to_string()),
        ];

        if self.database_kind() == DatabaseKind::DynamoDb {
            let profile = self.aws_profile.selected_value().cloned().unwrap_or_default();
            lines.push(("AWS profile", profile));
            lines.push(("AWS Access Key ID", self.aws_access_key_id.display_value()));
            lines.push(("AWS Secret Access Key", self.aws_secret_key.display_value()));
            lines.push(("AWS region", self.aws_region.value().to_string()));
        }

        if let Some(framework) = self.framework.selected_value() {
            lines.push(("Framework", framework.display_name().to_string()));
        }
        if let Some(deploy) = self.deploy.selected_value() {
            lines.push(("Deployment", deploy.title().to_string()));
        }

        lines
    }

    /// Assemble the configuration from the step buffers
    pub fn project_config(&self) -> Result<ProjectConfig, ValidationError> {
        let kind = *self
            .database
            .selected_value()
            .ok_or(ValidationError::Required { field: "Database" })?;
        let framework = *self
            .framework
            .selected_value()
            .ok_or(ValidationError::Required { field: "Framework" })?;
        let deploy = *self
            .deploy
            .selected_value()
            .ok_or(ValidationError::Required { field: "Deployment" })?;

        Ok(ProjectConfig {
            project_name: self.project_name.value().to_string(),
            module_path: self.module_path.value().to_string(),
            output_dir: PathBuf::from(self.output_dir.value()),
            database: DatabaseConfig::new(
                kind,
                self.aws_access_key_id.value(),
                self.aws_secret_key.value(),
                self.aws_region.value(),
            ),
            framework,
            deploy_enabled: deploy.deploy_enabled(),
        })
    }

    /// Install documentation link offered after a missing deploy tool
    pub fn docs_url(&self) -> Option<&str> {
        match self.outcome.as_ref()?.deploy_error()? {
            DeployError::ToolNotFound { docs_url, .. } => Some(docs_url.as_str()),
            _ => None,
        }
    }

    /// Apply one message and return the effect to run
    pub fn update(&mut self, message: Message) -> Command {
        match message {
            Message::Input(Input::Quit) => Command::Quit,
            Message::Input(input) => self.handle_input(input),
            Message::Tick => {
                if self.step == Step::Generating {
                    self.spinner.tick();
                }
                Command::None
            }
            Message::GenerationFinished(result) => self.generation_finished(result),
            Message::DeploymentFinished(result) => self.deployment_finished(result),
        }
    }

    fn handle_input(&mut self, input: Input) -> Command {
        match (self.step, input) {
            (Step::Generating, _) => Command::None,
            (Step::Complete, Input::Confirm) => Command::Quit,
            (Step::Complete, Input::Char('o')) => self
                .docs_url()
                .map(|url| Command::OpenUrl(url.to_string()))
                .unwrap_or(Command::None),
            (Step::Complete, _) => Command::None,
            (_, Input::Confirm) => self.confirm(),
            (_, Input::Back) => {
                self.back();
                Command::None
            }
            (step, input) => {
                self.edit(step, input);
                Command::None
            }
        }
    }

    fn edit(&mut self, step: Step, input: Input) {
        if let Some(field) = self.text_input_mut(step) {
            match input {
                Input::Char(c) => field.insert_char(c),
                Input::Backspace => field.delete_char(),
                Input::Delete => field.delete_forward(),
                Input::Left => field.move_cursor_left(),
                Input::Right => field.move_cursor_right(),
                Input::Home => field.move_cursor_home(),
                Input::End => field.move_cursor_end(),
                _ => return,
            }
            self.error = None;
            return;
        }

        match step {
            Step::DatabaseSelection => navigate(&mut self.database, input),
            Step::AwsProfileSelection => navigate(&mut self.aws_profile, input),
            Step::FrameworkSelection => navigate(&mut self.framework, input),
            Step::DeploySelection => navigate(&mut self.deploy, input),
            _ => {}
        }
    }

    fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            tracing::debug!(from = ?self.step, to = ?previous, "wizard back");
            self.step = previous;
            self.error = None;
        }
    }

    fn validate(&self, step: Step) -> Result<(), ValidationError> {
        if let Some(field) = self.text_input(step) {
            return if field.is_empty() {
                Err(ValidationError::Required {
                    field: step.title(),
                })
            } else {
                Ok(())
            };
        }

        let selected = match step {
            Step::DatabaseSelection => self.database.selected().is_some(),
            Step::AwsProfileSelection => self.aws_profile.selected().is_some(),
            Step::FrameworkSelection => self.framework.selected().is_some(),
            Step::DeploySelection => self.deploy.selected().is_some(),
            _ => true,
        };
        if selected {
            Ok(())
        } else {
            Err(ValidationError::Required {
                field: step.title(),
            })
        }
    }

    fn confirm(&mut self) -> Command {
        let step = self.step;
        if let Err(error) = self.validate(step) {
            tracing::debug!(?step, %error, "confirm rejected");
            self.error = Some(error);
            return Command::None;
        }
        self.error = None;

        match step {
            Step::ProjectName => self.propagate_defaults(),
            Step::AwsProfileSelection => self.apply_profile(),
            Step::Review => {
                let config = match self.project_config() {
                    Ok(config) => config,
                    Err(error) => {
                        self.error = Some(error);
                        return Command::None;
                    }
                };
                self.deploy_requested = self
                    .deploy
                    .selected_value()
                    .is_some_and(|choice| choice.deploy_now());
                self.deploying = false;
                self.spinner.reset();
                self.submitted = Some(config.clone());
                self.advance(Step::Generating);
                return Command::Generate(config);
            }
            _ => {}
        }

        if let Some(next) = step.forward(self.database_kind()) {
            self.advance(next);
        }
        Command::None
    }

    fn advance(&mut self, next: Step) {
        tracing::debug!(from = ?self.step, to = ?next, "wizard step");
        self.history.push(self.step);
        self.step = next;

        if next == Step::AwsProfileSelection && self.aws_profile.items().is_empty() {
            let items = self
                .profiles
                .list_profiles()
                .into_iter()
                .map(|name| Choice::new(name.clone(), name, ""))
                .collect();
            self.aws_profile = SelectList::new("Select AWS profile:", items);
        }
    }

    /// Re-derive module path and output dir if they still hold a suggestion
    fn propagate_defaults(&mut self) {
        let name = self.project_name.value().to_string();

        let previous_module = self.defaults.module_path(&self.suggested_name);
        if self.module_path.is_empty() || self.module_path.value() == previous_module {
            self.module_path.set_value(self.defaults.module_path(&name));
        }

        let previous_output = self.defaults.output_dir(&self.suggested_name);
        if self.output_dir.is_empty() || self.output_dir.value() == previous_output {
            self.output_dir.set_value(self.defaults.output_dir(&name));
        }

        self.suggested_name = name;
    }

    /// Pre-fill the AWS fields from the selected profile
    fn apply_profile(&mut self) {
        let Some(profile) = self.aws_profile.selected_value().cloned() else {
            return;
        };

        let credentials = self.profiles.load_credentials(&profile);
        if credentials.access_key_id.is_empty() {
            tracing::debug!(profile, "profile has no stored credentials");
            return;
        }

        self.aws_access_key_id.set_value(credentials.access_key_id);
        self.aws_secret_key.set_value(credentials.secret_access_key);
        if !credentials.region.is_empty() {
            self.aws_region.set_value(credentials.region);
        }
    }

    fn generation_finished(&mut self, result: Result<GenerationReport, GenerateError>) -> Command {
        if self.step != Step::Generating || self.deploying {
            tracing::debug!("ignoring stale generation result");
            return Command::None;
        }

        match result {
            Ok(report) => {
                let deploy_target = self
                    .submitted
                    .as_ref()
                    .filter(|_| self.deploy_requested)
                    .map(|config| config.project_name.clone());

                match deploy_target {
                    Some(project_name) => {
                        let command = Command::Deploy {
                            project_name,
                            project_dir: report.output_dir.clone(),
                        };
                        self.deploying = true;
                        self.pending_report = Some(report);
                        command
                    }
                    None => {
                        self.finish(Outcome::Generated {
                            report,
                            deployment: None,
                        });
                        Command::None
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, "generation failed");
                self.finish(Outcome::Failed(error));
                Command::None
            }
        }
    }

    fn deployment_finished(&mut self, result: Result<DeployOutput, DeployError>) -> Command {
        if self.step != Step::Generating || !self.deploying {
            tracing::debug!("ignoring stale deployment result");
            return Command::None;
        }
        let Some(report) = self.pending_report.take() else {
            return Command::None;
        };

        if let Err(error) = &result {
            tracing::warn!(%error, "deployment failed");
        }
        self.finish(Outcome::Generated {
            report,
            deployment: Some(result),
        });
        Command::None
    }

    fn finish(&mut self, outcome: Outcome) {
        tracing::debug!(success = outcome.is_success(), "wizard complete");
        self.deploying = false;
        self.outcome = Some(outcome);
        self.history.push(self.step);
        self.step = Step::Complete;
    }
}

fn navigate<T>(list: &mut SelectList<T>, input: Input) {
    match input {
        Input::Up => list.previous(),
        Input::Down => list.next(),
        _ => {}
    }
}
