//! Declarative file generation rules
//!
//! The rule table is evaluated in declaration order. Database and framework
//! rules are keyed on the enum variant they serve, so for any configuration
//! exactly one rule of each group fires. Output paths that vary by database
//! or framework live only in those groups, which keeps every output path
//! unique within a plan.

use crate::config::{DatabaseKind, Framework, ProjectConfig};

/// Whether a source is executed as a template or copied as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Render,
    Verbatim,
}

/// Suffix marking catalog entries that go through the template engine
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// One output file and the catalog entry it is produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMapping {
    /// Slash-delimited path relative to the output directory
    pub output: &'static str,
    /// Slash-delimited catalog path
    pub source: &'static str,
}

impl FileMapping {
    const fn new(output: &'static str, source: &'static str) -> Self {
        Self { output, source }
    }

    pub fn kind(&self) -> ContentKind {
        if self.source.ends_with(TEMPLATE_SUFFIX) {
            ContentKind::Render
        } else {
            ContentKind::Verbatim
        }
    }
}

/// Condition under which a rule fires
#[derive(Clone, Copy)]
pub enum Selector {
    /// Unconditional
    Always,
    /// Arbitrary predicate over the resolved configuration
    When(fn(&ProjectConfig) -> bool),
    /// Fires for exactly one database kind
    Database(DatabaseKind),
    /// Fires for exactly one framework
    Framework(Framework),
}

impl Selector {
    pub fn matches(&self, config: &ProjectConfig) -> bool {
        match self {
            Selector::Always => true,
            Selector::When(predicate) => predicate(config),
            Selector::Database(kind) => config.database.kind == *kind,
            Selector::Framework(framework) => config.framework == *framework,
        }
    }
}

/// A group of file mappings produced together
pub struct GenerationRule {
    pub name: &'static str,
    pub files: &'static [FileMapping],
    pub selector: Selector,
}

fn deploy_enabled(config: &ProjectConfig) -> bool {
    config.deploy_enabled
}

pub static RULES: &[GenerationRule] = &[
    GenerationRule {
        name: "base",
        files: &[
            FileMapping::new("go.mod", "templates/base/go.mod.tmpl"),
            FileMapping::new("README.md", "templates/base/README.md.tmpl"),
            FileMapping::new("Makefile", "templates/Makefile.tmpl"),
            FileMapping::new(".gitignore", "static/.gitignore"),
            FileMapping::new(".dockerignore", "static/.dockerignore"),
            FileMapping::new(".env", "templates/.env.tmpl"),
            FileMapping::new(".mockery.yaml", "templates/.mockery.yaml.tmpl"),
            FileMapping::new("prometheus.yml", "templates/prometheus.yml.tmpl"),
            FileMapping::new(
                "grafana/provisioning/datasources/prometheus.yml",
                "templates/grafana/provisioning/datasources/prometheus.yml.tmpl",
            ),
        ],
        selector: Selector::Always,
    },
    GenerationRule {
        name: "config",
        files: &[
            FileMapping::new("internal/config/stage.go", "static/internal/config/stage.go"),
            FileMapping::new("internal/config/config.go", "static/internal/config/config.go"),
            FileMapping::new("internal/config/local.yaml", "static/internal/config/local.yaml"),
            FileMapping::new(
                "internal/config/production.yaml",
                "static/internal/config/production.yaml",
            ),
        ],
        selector: Selector::Always,
    },
    GenerationRule {
        name: "posts",
        files: &[
            FileMapping::new("internal/posts/post.go", "static/internal/posts/post.go"),
            FileMapping::new("internal/posts/errors.go", "static/internal/posts/errors.go"),
            FileMapping::new("internal/posts/table.go", "static/internal/posts/table.go"),
            FileMapping::new("internal/posts/service.go", "static/internal/posts/service.go"),
            FileMapping::new(
                "internal/posts/service_test.go",
                "static/internal/posts/service_test.go",
            ),
        ],
        selector: Selector::Always,
    },
    GenerationRule {
        name: "scripts",
        files: &[
            FileMapping::new("scripts/check-deps.sh", "templates/scripts/check-deps.sh.tmpl"),
            FileMapping::new("scripts/generate.sh", "templates/scripts/generate.sh.tmpl"),
            FileMapping::new("scripts/migrate.sh", "static/scripts/migrate.sh"),
        ],
        selector: Selector::Always,
    },
    GenerationRule {
        name: "deploy-scripts",
        files: &[
            FileMapping::new("scripts/deploy.sh", "templates/scripts/deploy.sh.tmpl"),
            FileMapping::new("scripts/destroy.sh", "templates/scripts/destroy.sh.tmpl"),
        ],
        selector: Selector::When(deploy_enabled),
    },
    GenerationRule {
        name: "postgres",
        files: &[
            FileMapping::new(
                "internal/database/postgres.go",
                "static/internal/database/postgres.go",
            ),
            FileMapping::new(
                "internal/posts/postgres_table.go",
                "static/internal/posts/postgres_table.go",
            ),
            FileMapping::new(
                "internal/posts/postgres_table_test.go",
                "static/internal/posts/postgres_table_test.go",
            ),
            FileMapping::new(".env.local", "static/.env.local.postgres"),
            FileMapping::new("docker-compose.yml", "static/docker-compose.yml.postgres"),
            FileMapping::new("schema.sql", "static/schema.sql"),
        ],
        selector: Selector::Database(DatabaseKind::Postgres),
    },
    GenerationRule {
        name: "dynamodb",
        files: &[
            FileMapping::new(
                "internal/database/dynamodb.go",
                "static/internal/database/dynamodb.go",
            ),
            FileMapping::new(
                "internal/posts/dynamodb_table.go",
                "static/internal/posts/dynamodb_table.go",
            ),
            FileMapping::new(
                "internal/posts/dynamodb_table_test.go",
                "static/internal/posts/dynamodb_table_test.go",
            ),
            FileMapping::new(
                "internal/posts/dynamodb_converters.go",
                "static/internal/posts/dynamodb_converters.go",
            ),
            FileMapping::new(".env.local", "templates/.env.local.dynamodb.tmpl"),
            FileMapping::new("docker-compose.yml", "static/docker-compose.yml.dynamodb"),
        ],
        selector: Selector::Database(DatabaseKind::DynamoDb),
    },
    GenerationRule {
        name: "chi",
        files: &[
            FileMapping::new("cmd/api/main.go", "templates/cmd/api/main_chi.go.tmpl"),
            FileMapping::new("internal/posts/routes.go", "static/internal/posts/routes.go"),
        ],
        selector: Selector::Framework(Framework::Chi),
    },
    GenerationRule {
        name: "connectrpc",
        files: &[
            FileMapping::new("cmd/api/main.go", "templates/cmd/api/main_connectrpc.go.tmpl"),
            FileMapping::new(
                "internal/api/posts_handler.go",
                "static/internal/api/posts_handler_connectrpc.go",
            ),
            FileMapping::new(
                "internal/posts/converters.go",
                "templates/internal/posts/converters.go.tmpl",
            ),
            FileMapping::new(
                "internal/protos/posts/v1/posts.proto",
                "static/protos/posts/v1/posts.proto",
            ),
            FileMapping::new("buf.yaml", "static/buf.yaml"),
            FileMapping::new("buf.gen.yaml", "templates/buf.gen.yaml.tmpl"),
        ],
        selector: Selector::Framework(Framework::ConnectRpc),
    },
    GenerationRule {
        name: "deployment",
        files: &[
            FileMapping::new("fly.toml", "templates/deploy/fly.toml.tmpl"),
            FileMapping::new("Dockerfile", "static/Dockerfile"),
            FileMapping::new(
                ".github/workflows/deploy.yml",
                "static/deploy/github/workflows/deploy.yml",
            ),
        ],
        selector: Selector::When(deploy_enabled),
    },
];

/// Rules that fire for `config`, in declaration order
pub fn active_rules(config: &ProjectConfig) -> impl Iterator<Item = &'static GenerationRule> + '_ {
    RULES.iter().filter(move |rule| rule.selector.matches(config))
}

/// Ordered list of files to produce for `config`
pub fn plan(config: &ProjectConfig) -> Vec<FileMapping> {
    let files: Vec<FileMapping> = active_rules(config)
        .flat_map(|rule| rule.files.iter().copied())
        .collect();

    debug_assert!(
        {
            let mut seen = std::collections::HashSet::new();
            files.iter().all(|f| seen.insert(f.output))
        },
        "two active rules write the same output path"
    );

    files
}

/// Directory skeleton created before any file is written
pub fn directories(config: &ProjectConfig) -> Vec<&'static str> {
    let mut dirs = vec![
        "cmd/api",
        "internal/config",
        "internal/database",
        "internal/posts",
        "internal/metrics",
    ];

    if config.framework == Framework::ConnectRpc {
        dirs.extend(["internal/protos/posts/v1", "internal/protos/gen/posts/v1"]);
    }

    match config.database.kind {
        DatabaseKind::Postgres => dirs.push("migrations"),
        DatabaseKind::DynamoDb => dirs.push("terraform"),
    }

    dirs.push("scripts");

    if config.deploy_enabled {
        dirs.push(".github/workflows");
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use clap::ValueEnum;
    use std::path::PathBuf;

    fn config(kind: DatabaseKind, framework: Framework, deploy: bool) -> ProjectConfig {
        ProjectConfig {
            project_name: "orders".to_string(),
            module_path: "example.com/team/orders".to_string(),
            output_dir: PathBuf::from("orders"),
            database: DatabaseConfig::new(kind, "AKIA", "secret", "eu-west-1"),
            framework,
            deploy_enabled: deploy,
        }
    }

    fn all_configs() -> Vec<ProjectConfig> {
        let mut configs = Vec::new();
        for kind in DatabaseKind::value_variants() {
            for framework in Framework::value_variants() {
                for deploy in [false, true] {
                    configs.push(config(*kind, *framework, deploy));
                }
            }
        }
        configs
    }

    fn outputs(plan: &[FileMapping]) -> Vec<&'static str> {
        plan.iter().map(|f| f.output).collect()
    }

    #[test]
    fn test_exactly_one_rule_per_database_and_framework() {
        for cfg in all_configs() {
            let active: Vec<_> = active_rules(&cfg).collect();
            let databases = active
                .iter()
                .filter(|r| matches!(r.selector, Selector::Database(_)))
                .count();
            let frameworks = active
                .iter()
                .filter(|r| matches!(r.selector, Selector::Framework(_)))
                .count();
            assert_eq!(databases, 1, "{cfg:?}");
            assert_eq!(frameworks, 1, "{cfg:?}");
        }
    }

    #[test]
    fn test_output_paths_unique_for_every_config() {
        for cfg in all_configs() {
            let plan = plan(&cfg);
            let unique: std::collections::HashSet<_> = plan.iter().map(|f| f.output).collect();
            assert_eq!(unique.len(), plan.len(), "{cfg:?}");
        }
    }

    #[test]
    fn test_postgres_chi_without_deploy() {
        let plan = plan(&config(DatabaseKind::Postgres, Framework::Chi, false));
        let outputs = outputs(&plan);

        assert!(!outputs.contains(&"fly.toml"));
        assert!(!outputs.contains(&"scripts/deploy.sh"));
        assert!(outputs.contains(&"internal/posts/postgres_table.go"));
        assert!(outputs.contains(&"schema.sql"));
        assert!(!outputs.contains(&"internal/posts/dynamodb_table.go"));
        assert!(plan.contains(&FileMapping::new(
            "cmd/api/main.go",
            "templates/cmd/api/main_chi.go.tmpl"
        )));
    }

    #[test]
    fn test_dynamodb_connectrpc_with_deploy() {
        let plan = plan(&config(DatabaseKind::DynamoDb, Framework::ConnectRpc, true));
        let outputs = outputs(&plan);

        assert!(outputs.contains(&"fly.toml"));
        assert!(outputs.contains(&"Dockerfile"));
        assert!(outputs.contains(&"internal/posts/dynamodb_converters.go"));
        assert!(!outputs.contains(&"internal/posts/routes.go"));
        assert!(plan.contains(&FileMapping::new(
            "cmd/api/main.go",
            "templates/cmd/api/main_connectrpc.go.tmpl"
        )));
    }

    #[test]
    fn test_plan_starts_with_base_files() {
        let plan = plan(&config(DatabaseKind::Postgres, Framework::Chi, false));
        assert_eq!(plan[0].output, "go.mod");
        assert_eq!(plan[1].output, "README.md");
        assert_eq!(plan[2].output, "Makefile");
    }

    #[test]
    fn test_content_kind_from_source_suffix() {
        assert_eq!(
            FileMapping::new("go.mod", "templates/base/go.mod.tmpl").kind(),
            ContentKind::Render
        );
        assert_eq!(
            FileMapping::new(".gitignore", "static/.gitignore").kind(),
            ContentKind::Verbatim
        );
        assert_eq!(
            FileMapping::new(".env.local", "static/.env.local.postgres").kind(),
            ContentKind::Verbatim
        );
    }

    #[test]
    fn test_directories_follow_config() {
        let pg = directories(&config(DatabaseKind::Postgres, Framework::Chi, false));
        assert!(pg.contains(&"migrations"));
        assert!(!pg.contains(&"terraform"));
        assert!(!pg.contains(&".github/workflows"));

        let ddb = directories(&config(DatabaseKind::DynamoDb, Framework::ConnectRpc, true));
        assert!(ddb.contains(&"terraform"));
        assert!(ddb.contains(&"internal/protos/gen/posts/v1"));
        assert!(ddb.contains(&".github/workflows"));
    }
}
