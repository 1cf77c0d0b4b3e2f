//! Resolved project configuration

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Database backend of the generated service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseKind {
    /// Relational database with SQL migrations
    Postgres,
    /// NoSQL database on AWS
    #[value(name = "dynamodb")]
    DynamoDb,
}

impl DatabaseKind {
    /// Identifier used in templates and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Postgres => "postgres",
            DatabaseKind::DynamoDb => "dynamodb",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseKind::Postgres => "PostgreSQL",
            DatabaseKind::DynamoDb => "DynamoDB",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DatabaseKind::Postgres => "Relational database with Atlas migrations",
            DatabaseKind::DynamoDb => "NoSQL database on AWS",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// API framework of the generated service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Framework {
    /// Lightweight HTTP router
    Chi,
    /// gRPC-compatible RPC framework
    #[value(name = "connectrpc")]
    ConnectRpc,
}

impl Framework {
    /// Identifier used in templates and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Chi => "chi",
            Framework::ConnectRpc => "connectrpc",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Chi => "Chi",
            Framework::ConnectRpc => "ConnectRPC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Framework::Chi => "Lightweight HTTP router",
            Framework::ConnectRpc => "gRPC-compatible framework",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Database selection plus the AWS settings DynamoDB needs
///
/// The AWS fields are only meaningful when `kind` is
/// [`DatabaseKind::DynamoDb`]; they are left empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    pub aws_access_key_id: String,
    pub aws_secret_key: String,
    pub aws_region: String,
}

impl DatabaseConfig {
    pub fn postgres() -> Self {
        Self {
            kind: DatabaseKind::Postgres,
            aws_access_key_id: String::new(),
            aws_secret_key: String::new(),
            aws_region: String::new(),
        }
    }

    pub fn dynamodb(
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            kind: DatabaseKind::DynamoDb,
            aws_access_key_id: access_key_id.into(),
            aws_secret_key: secret_key.into(),
            aws_region: region.into(),
        }
    }

    /// Build a config for `kind`, dropping AWS settings unless they apply
    pub fn new(kind: DatabaseKind, access_key_id: &str, secret_key: &str, region: &str) -> Self {
        match kind {
            DatabaseKind::Postgres => Self::postgres(),
            DatabaseKind::DynamoDb => Self::dynamodb(access_key_id, secret_key, region),
        }
    }
}

/// Everything the generation engine needs to produce a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Project name, substituted for the placeholder project name
    pub project_name: String,
    /// Go module path, substituted for the placeholder import paths
    pub module_path: String,
    /// Directory the project is generated into
    pub output_dir: PathBuf,
    pub database: DatabaseConfig,
    pub framework: Framework,
    /// Whether deployment scripts and manifests are generated
    pub deploy_enabled: bool,
}

impl ProjectConfig {
    pub fn is_postgres(&self) -> bool {
        self.database.kind == DatabaseKind::Postgres
    }

    pub fn is_dynamodb(&self) -> bool {
        self.database.kind == DatabaseKind::DynamoDb
    }
}
