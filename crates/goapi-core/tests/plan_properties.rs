use goapi_core::generator::{plan, Placeholders};
use goapi_core::{DatabaseConfig, DatabaseKind, Framework, ProjectConfig};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

fn database_kind() -> impl Strategy<Value = DatabaseKind> {
    prop_oneof![Just(DatabaseKind::Postgres), Just(DatabaseKind::DynamoDb)]
}

fn framework() -> impl Strategy<Value = Framework> {
    prop_oneof![Just(Framework::Chi), Just(Framework::ConnectRpc)]
}

prop_compose! {
    fn project_config()(
        name in "[a-z][a-z0-9-]{0,15}",
        kind in database_kind(),
        framework in framework(),
        deploy_enabled in any::<bool>(),
        region in prop_oneof![Just(""), Just("us-east-1"), Just("eu-west-1"), Just("mars-1")],
    ) -> ProjectConfig {
        ProjectConfig {
            module_path: format!("example.com/{name}"),
            output_dir: PathBuf::from(&name),
            project_name: name,
            database: DatabaseConfig::new(kind, "AKIA", "secret", region),
            framework,
            deploy_enabled,
        }
    }
}

proptest! {
    #[test]
    fn plan_is_deterministic(config in project_config()) {
        prop_assert_eq!(plan(&config), plan(&config));
    }

    #[test]
    fn plan_outputs_are_unique(config in project_config()) {
        let files = plan(&config);
        let unique: HashSet<_> = files.iter().map(|f| f.output).collect();
        prop_assert_eq!(unique.len(), files.len());
    }

    #[test]
    fn plan_respects_selected_options(config in project_config()) {
        let outputs: HashSet<_> = plan(&config).iter().map(|f| f.output).collect();

        prop_assert_eq!(outputs.contains("fly.toml"), config.deploy_enabled);
        prop_assert_eq!(outputs.contains("scripts/deploy.sh"), config.deploy_enabled);
        prop_assert_eq!(outputs.contains("schema.sql"), config.is_postgres());
        prop_assert_eq!(
            outputs.contains("internal/posts/dynamodb_table.go"),
            config.is_dynamodb()
        );
        prop_assert_eq!(
            outputs.contains("internal/posts/routes.go"),
            config.framework == Framework::Chi
        );
        prop_assert_eq!(
            outputs.contains("buf.gen.yaml"),
            config.framework == Framework::ConnectRpc
        );
        prop_assert!(outputs.contains("cmd/api/main.go"));
        prop_assert!(outputs.contains(".env.local"));
        prop_assert!(outputs.contains("docker-compose.yml"));
    }

    #[test]
    fn substitution_never_rescans_user_values(suffix in "[a-z]{0,8}") {
        // A project name containing the placeholder must survive untouched
        let name = format!("postservice{suffix}");
        let placeholders = Placeholders::new("github.com/acme/postservice", &name);

        let out = placeholders.apply("README.md", "# postservice\nmodule github.com/acme/postservice\n");
        prop_assert_eq!(
            out,
            format!("# {name}\nmodule github.com/acme/postservice\n")
        );
    }
}
