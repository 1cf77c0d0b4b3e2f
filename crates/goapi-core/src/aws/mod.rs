//! AWS shared profile lookup
//!
//! Lists profiles from the shared credentials and config files and resolves
//! a profile's keys and region through the AWS SDK's profile providers, so
//! `credential_process`, `source_profile` and SSO profiles resolve the same
//! way they do for the AWS CLI. Lookups are best effort: any failure yields
//! empty credentials rather than an error.

use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::profile::{ProfileFileCredentialsProvider, ProfileFileRegionProvider};
use aws_config::meta::region::ProvideRegion;
use aws_credential_types::provider::ProvideCredentials;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Region used when a profile has keys but no region
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

const DEFAULT_PROFILE: &str = "default";

/// Credentials loaded from a profile; all empty when unavailable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

/// Source of AWS profiles
pub trait AwsProfiles {
    /// Profile names, `default` first
    fn list_profiles(&self) -> Vec<String>;

    /// Keys and region for `profile`, empty strings on any failure
    fn load_credentials(&self, profile: &str) -> AwsCredentials;
}

/// Profiles read from `~/.aws/credentials` and `~/.aws/config`
#[derive(Debug, Clone, Default)]
pub struct SharedConfigFiles {
    credentials_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl SharedConfigFiles {
    pub fn new(credentials_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            credentials_path,
            config_path,
        }
    }

    /// Locate the files the way the AWS CLI does
    pub fn from_env() -> Self {
        let aws_dir = dirs::home_dir().map(|home| home.join(".aws"));
        let credentials_path = std::env::var_os("AWS_SHARED_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .or_else(|| aws_dir.as_ref().map(|d| d.join("credentials")));
        let config_path = std::env::var_os("AWS_CONFIG_FILE")
            .map(PathBuf::from)
            .or_else(|| aws_dir.as_ref().map(|d| d.join("config")));

        Self::new(credentials_path, config_path)
    }

    /// The same two files in the SDK's terms; `None` when neither is set
    fn profile_files(&self) -> Option<ProfileFiles> {
        if self.credentials_path.is_none() && self.config_path.is_none() {
            return None;
        }

        let mut builder = ProfileFiles::builder();
        if let Some(path) = &self.credentials_path {
            builder = builder.with_file(ProfileFileKind::Credentials, path);
        }
        if let Some(path) = &self.config_path {
            builder = builder.with_file(ProfileFileKind::Config, path);
        }
        Some(builder.build())
    }
}

impl AwsProfiles for SharedConfigFiles {
    fn list_profiles(&self) -> Vec<String> {
        let mut names = BTreeSet::new();

        names.extend(section_headers(self.credentials_path.as_ref()));
        for header in section_headers(self.config_path.as_ref()) {
            if let Some(name) = config_profile_name(&header) {
                names.insert(name.to_string());
            }
        }

        names.remove(DEFAULT_PROFILE);
        std::iter::once(DEFAULT_PROFILE.to_string())
            .chain(names.into_iter().filter(|n| !n.is_empty()))
            .collect()
    }

    fn load_credentials(&self, profile: &str) -> AwsCredentials {
        let Some(files) = self.profile_files() else {
            return AwsCredentials::default();
        };
        let profile = profile.to_string();

        // Callers may already be on a runtime thread, so the SDK future
        // gets a runtime of its own
        let resolved = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            Ok::<_, std::io::Error>(runtime.block_on(resolve_profile(profile, files)))
        })
        .join();

        match resolved {
            Ok(Ok(credentials)) => credentials,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "could not start profile resolver runtime");
                AwsCredentials::default()
            }
            Err(_) => {
                tracing::debug!("profile resolver thread panicked");
                AwsCredentials::default()
            }
        }
    }
}

async fn resolve_profile(profile: String, files: ProfileFiles) -> AwsCredentials {
    let provider = ProfileFileCredentialsProvider::builder()
        .profile_files(files.clone())
        .profile_name(&profile)
        .build();

    let credentials = match provider.provide_credentials().await {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::debug!(profile = %profile, error = %e, "no credentials for profile");
            return AwsCredentials::default();
        }
    };

    let region_provider = ProfileFileRegionProvider::builder()
        .profile_files(files)
        .profile_name(&profile)
        .build();
    let region = ProvideRegion::region(&region_provider)
        .await
        .map(|region| region.to_string())
        .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());

    AwsCredentials {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
        region,
    }
}

/// Profile name of a config-file section header
///
/// The config file spells profiles `[profile name]`, except `[default]`.
fn config_profile_name(header: &str) -> Option<&str> {
    if header == DEFAULT_PROFILE {
        return Some(DEFAULT_PROFILE);
    }
    header
        .strip_prefix("profile ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// `[section]` names in a shared file, in file order
fn section_headers(path: Option<&PathBuf>) -> Vec<String> {
    let Some(content) = path.and_then(|p| std::fs::read_to_string(p).ok()) else {
        return Vec::new();
    };

    content
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .map(|header| header.trim().to_string())
        })
        .collect()
}
