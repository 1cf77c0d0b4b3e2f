//! Non-interactive create path using cliclack output

use crate::aws::{AwsProfiles, SharedConfigFiles, DEFAULT_AWS_REGION};
use crate::config::{DatabaseConfig, DatabaseKind, Framework, ProjectConfig};
use crate::error::ValidationError;
use crate::generator::Generator;
use crate::product::ProductConfig;
use crate::templates::TemplateSource;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI arguments for the create command
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Project name
    pub name: String,

    pub database: DatabaseKind,

    pub framework: Framework,

    /// Go module path; defaults to `<module prefix>/<name>`
    pub module_path: Option<String>,

    /// Output directory; defaults to `<name>`
    pub output: Option<PathBuf>,

    /// Generate deployment scaffolding
    pub deploy: bool,

    /// Overrides the region of the default AWS profile
    pub aws_region: Option<String>,

    /// Local directory to use for templates instead of the bundled catalog
    pub template_dir: Option<PathBuf>,
}

/// Build the project configuration from flags
///
/// DynamoDB projects take their keys from the `default` AWS profile.
pub fn resolve_config<C: ProductConfig>(
    product: &C,
    args: &CreateArgs,
    profiles: &dyn AwsProfiles,
) -> Result<ProjectConfig, ValidationError> {
    if args.name.is_empty() {
        return Err(ValidationError::Required {
            field: "Project name",
        });
    }

    let module_path = args
        .module_path
        .clone()
        .unwrap_or_else(|| product.suggested_module_path(&args.name));
    if module_path.is_empty() {
        return Err(ValidationError::Required {
            field: "Module path",
        });
    }

    let database = match args.database {
        DatabaseKind::Postgres => DatabaseConfig::postgres(),
        DatabaseKind::DynamoDb => {
            let credentials = profiles.load_credentials("default");
            let region = args
                .aws_region
                .clone()
                .filter(|r| !r.is_empty())
                .or_else(|| Some(credentials.region.clone()).filter(|r| !r.is_empty()))
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());
            DatabaseConfig::dynamodb(
                credentials.access_key_id,
                credentials.secret_access_key,
                region,
            )
        }
    };

    Ok(ProjectConfig {
        project_name: args.name.clone(),
        module_path,
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&args.name)),
        database,
        framework: args.framework,
        deploy_enabled: args.deploy,
    })
}

/// The output directory must be absent or empty
pub fn check_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        anyhow::bail!("{} exists and is not a directory", path.display());
    }

    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?;
    if entries.next().is_some() {
        anyhow::bail!("Directory {} already exists and is not empty", path.display());
    }
    Ok(())
}

/// Generate a project from flags without prompting
pub async fn run_create<C: ProductConfig>(product: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(product.display_name())?;

    let catalog = TemplateSource::from_config(product, args.template_dir.clone())?;
    if let Some(root) = catalog.local_root() {
        cliclack::log::info(format!("Using local templates from {}", root.display()))?;
    }

    let config = resolve_config(product, &args, &SharedConfigFiles::from_env())?;
    check_output_dir(&config.output_dir)?;

    if config.is_dynamodb() && config.database.aws_access_key_id.is_empty() {
        cliclack::log::warning(
            "No credentials in the default AWS profile; set them in .env before running",
        )?;
    }
    cliclack::log::info(format!(
        "{} + {}{}",
        config.database.kind,
        config.framework,
        if config.deploy_enabled { " + Fly.io" } else { "" }
    ))?;

    let spinner = cliclack::spinner();
    spinner.start("Generating project...");

    let report = match Generator::new(config.clone(), Arc::new(catalog)).generate().await {
        Ok(report) => report,
        Err(error) => {
            spinner.stop("Generation failed");
            return Err(error).context("Failed to create project");
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        report.files.len(),
        report.output_dir.display()
    ));

    print_next_steps(product, &config)
}

fn print_next_steps<C: ProductConfig>(product: &C, config: &ProjectConfig) -> Result<()> {
    let steps = product.next_steps(config);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
