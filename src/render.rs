//! Renders assembly metadata into a C# source document.
//!
//! Rendering is a pure function of [`GenerationOptions`],
//! [`RepositoryContext`] and [`RenderEnvironment`]; only the timestamp
//! differs between two runs over the same inputs.

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::context::RepositoryContext;
use crate::filesystem::Filesystem;
use crate::host::HostEnvironment;
use crate::options::GenerationOptions;

pub const GENERATOR_NAME: &str = "update-assembly-info";

const NEWLINE: &str = if cfg!(windows) { "\r\n" } else { "\n" };
const RULE: &str = "//------------------------------------------------------------------------------";

/// Host facts written into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEnvironment {
    pub timestamp: DateTime<Utc>,
    pub machine_name: String,
    pub working_dir: PathBuf,
}

impl From<&HostEnvironment> for RenderEnvironment {
    fn from(host: &HostEnvironment) -> Self {
        Self {
            timestamp: host.timestamp,
            machine_name: host.machine_name.clone(),
            working_dir: host.working_dir.clone(),
        }
    }
}

impl RenderEnvironment {
    /// ISO 8601 round-trip form, e.g. `2026-10-15T08:30:00.1234567Z`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S%.7fZ").to_string()
    }
}

/// Escapes double quotes for a C# string literal.
pub fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

#[derive(Default)]
struct Document {
    text: String,
}

impl Document {
    fn line<S: AsRef<str>>(&mut self, line: S) {
        self.text.push_str(line.as_ref());
        self.text.push_str(NEWLINE);
    }

    fn blank(&mut self) {
        self.text.push_str(NEWLINE);
    }

    /// `[assembly: Name("value")]`
    fn attribute(&mut self, name: &str, value: &str) {
        self.blank();
        self.line(format!("[assembly: {}({})]", name, quoted(value)));
    }

    /// `[assembly: Name(Key = "value", ...)]`
    fn named_attribute(&mut self, name: &str, arguments: &[(&str, &str)]) {
        let arguments = arguments
            .iter()
            .map(|(key, value)| format!("{} = {}", key, quoted(value)))
            .collect::<Vec<_>>()
            .join(", ");
        self.blank();
        self.line(format!("[assembly: {}({})]", name, arguments));
    }
}

pub fn render(options: &GenerationOptions, context: &RepositoryContext, env: &RenderEnvironment) -> String {
    let timestamp = env.formatted_timestamp();
    let mut doc = Document::default();

    doc.blank();
    doc.line(RULE);
    doc.line("// <auto-generated>");
    doc.line("//     This code was generated by a tool.");
    doc.line("//");
    doc.line("//     Changes to this file may cause incorrect behavior and will be lost if");
    doc.line("//     the code is regenerated.");
    doc.line("//");
    doc.line(format!("//     Generated by: {}", GENERATOR_NAME));
    doc.line(format!("//     Generated on: {}", timestamp));
    doc.line(format!("//     Generated on: {}", env.machine_name));
    doc.line(format!("//     Generated at: {}", env.working_dir.display()));
    doc.line(format!("//     Encoding:     {}", options.encoding.display_name()));
    doc.line("// </auto-generated>");
    doc.line(RULE);
    doc.blank();

    for namespace in options.usings() {
        doc.line(format!("using {};", namespace));
    }

    let assembly_fields = [
        ("AssemblyConfiguration", &options.build),
        ("AssemblyCompany", &options.company),
        ("AssemblyProduct", &options.product),
        ("AssemblyCopyright", &options.copyright),
        ("AssemblyTrademark", &options.trademark),
        ("AssemblyVersion", &options.assembly_version),
        ("AssemblyFileVersion", &options.assembly_file_version),
    ];
    for (name, value) in assembly_fields {
        if let Some(value) = value {
            doc.attribute(name, value);
        }
    }

    if options.include_source_control_revision {
        let arguments: Vec<(&str, &str)> = [
            ("Revision", context.revision.as_deref()),
            ("Branch", context.branch()),
            ("Repository", context.repository_name.as_deref()),
            ("VersionTag", context.version_tag.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect();
        doc.named_attribute("SourceControlRevision", &arguments);
    }

    let has_package = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    if options.include_build_info || has_package(&options.package_name) || has_package(&options.package) {
        let mut arguments: Vec<(&str, &str)> = Vec::new();
        if options.include_build_info {
            arguments.push(("Date", timestamp.as_str()));
            arguments.push(("MachineName", env.machine_name.as_str()));
        }
        if let Some(package_name) = &options.package_name {
            arguments.push(("PackageName", package_name.as_str()));
        }
        if let Some(package) = &options.package {
            arguments.push(("Package", package.as_str()));
        }
        doc.named_attribute("BuildInfo", &arguments);
    }

    doc.blank();
    doc.blank();
    doc.text
}

/// Renders once and writes the encoded document to every path, truncating
/// existing files.
pub fn write_files(
    fs: &dyn Filesystem,
    paths: &[PathBuf],
    options: &GenerationOptions,
    context: &RepositoryContext,
    env: &RenderEnvironment,
) -> Result<()> {
    let bytes = options.encoding.encode(&render(options, context, env));
    for path in paths {
        write_file(fs, path, &bytes)?;
        info!("Generated {}", path.display());
    }
    Ok(())
}

fn write_file(fs: &dyn Filesystem, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut writer = fs
        .create(path)
        .context(format!("Failed to create {}", path.display()))?;
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .context(format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Prints the document to stdout line by line.
pub fn write_stdout(options: &GenerationOptions, context: &RepositoryContext, env: &RenderEnvironment) {
    for line in render(options, context, env).lines() {
        println!("{}", line);
    }
}
