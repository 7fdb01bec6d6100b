use crate::cli::Cli;
use crate::config::Config;
use crate::encoding::OutputEncoding;

/// Namespace of the standard assembly description attributes.
pub const REFLECTION_NAMESPACE: &str = "System.Reflection";
/// Namespace imported alongside assembly version attributes.
pub const INTEROP_NAMESPACE: &str = "System.Runtime.InteropServices";

/// Everything the renderer needs besides repository facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub build: Option<String>,
    pub company: Option<String>,
    pub product: Option<String>,
    pub copyright: Option<String>,
    pub trademark: Option<String>,
    pub assembly_version: Option<String>,
    pub assembly_file_version: Option<String>,
    usings: Vec<String>,
    pub include_source_control_revision: bool,
    pub include_build_info: bool,
    pub package_name: Option<String>,
    /// Full package identifier, e.g. `MyPackageVariant-v1.2.0`.
    pub package: Option<String>,
    pub encoding: OutputEncoding,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a namespace import unless it is already present.
    pub fn require_using<S: Into<String>>(&mut self, namespace: S) {
        let namespace = namespace.into();
        if !self.usings.contains(&namespace) {
            self.usings.push(namespace);
        }
    }

    pub fn usings(&self) -> &[String] {
        &self.usings
    }

    /// Merges command line values over configuration defaults.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let mut options = Self::new();

        for namespace in &config.usings {
            options.require_using(namespace.as_str());
        }

        let pick = |cli_value: &Option<String>, config_value: &Option<String>| {
            cli_value.clone().or_else(|| config_value.clone())
        };

        options.build = cli.build.clone();
        options.company = pick(&cli.company, &config.company);
        options.product = pick(&cli.product, &config.product);
        options.copyright = pick(&cli.copyright, &config.copyright);
        options.trademark = pick(&cli.trademark, &config.trademark);
        options.assembly_version = cli.assembly_version.clone();
        options.assembly_file_version = cli.file_version.clone();

        let describes_assembly = [
            &options.build,
            &options.company,
            &options.product,
            &options.copyright,
            &options.trademark,
        ]
        .iter()
        .any(|value| value.is_some());
        if describes_assembly {
            options.require_using(REFLECTION_NAMESPACE);
        }
        if options.assembly_version.is_some() || options.assembly_file_version.is_some() {
            options.require_using(INTEROP_NAMESPACE);
        }

        for namespace in &cli.usings {
            options.require_using(namespace.as_str());
        }

        options.include_source_control_revision =
            cli.source_control_revision || config.source_control_revision;
        options.include_build_info = cli.build_info || config.build_info;
        options.package_name = cli.package_name.clone();
        options.package = cli.package.clone();
        options.encoding = cli.encoding.or(config.encoding).unwrap_or_default();

        options
    }
}
