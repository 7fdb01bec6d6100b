use clap::{CommandFactory, Parser};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::encoding::OutputEncoding;

#[derive(Parser, Debug)]
#[command(
    name = "update-assembly-info",
    about = "Generates an assembly metadata source file from options and the enclosing git repository",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/update-assembly-info/logs/update-assembly-info.log\n\nThe generated file contains:\n- Assembly attributes for configuration, company, product, copyright, trademark and versions\n- A SourceControlRevision attribute read directly from .git (no git binary needed)\n- A BuildInfo attribute with build date, machine and package\n\nWithout FILES the document is written to stdout."
)]
pub struct Cli {
    /// Files to generate
    #[arg(value_name = "FILES", help = "Files to generate (stdout when omitted)")]
    pub files: Vec<PathBuf>,

    /// Build configuration (Debug, Release...)
    #[arg(short, long, alias = "Build", help = "Build configuration (Debug, Release...)")]
    pub build: Option<String>,

    #[arg(long, alias = "Company", help = "Company name")]
    pub company: Option<String>,

    #[arg(long, alias = "Product", help = "Product name")]
    pub product: Option<String>,

    #[arg(long, alias = "Copyright", help = "Copyright notice")]
    pub copyright: Option<String>,

    #[arg(long, alias = "Trademark", help = "Trademark notice")]
    pub trademark: Option<String>,

    #[arg(long = "assembly-version", alias = "Version", help = "Assembly version")]
    pub assembly_version: Option<String>,

    #[arg(long = "file-version", alias = "FileVersion", help = "Assembly file version")]
    pub file_version: Option<String>,

    /// Full package identifier
    #[arg(long, alias = "Package", help = "Package id (MyPackageVariant-v1.2.0)")]
    pub package: Option<String>,

    #[arg(long = "package-name", alias = "PackageName", help = "Package name (MyPackageVariant)")]
    pub package_name: Option<String>,

    /// Namespace imports, repeatable
    #[arg(short = 'u', long = "using", value_name = "NAMESPACE", help = "Insert a using directive (repeatable)")]
    pub usings: Vec<String>,

    #[arg(
        long = "source-control-revision",
        visible_aliases = ["scr", "scv"],
        alias = "SourceControlRevision",
        help = "Include source control information from the local git repository"
    )]
    pub source_control_revision: bool,

    #[arg(
        long = "build-info",
        visible_alias = "bi",
        aliases = ["BuildInfo", "BI"],
        help = "Include build information (date, machine)"
    )]
    pub build_info: bool,

    #[arg(long, value_enum, help = "Output file encoding")]
    pub encoding: Option<OutputEncoding>,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the resolved repository context to stderr")]
    pub print_context: bool,
}

/// Rewrites long flags written in any letter case to their declared
/// spelling, and `/?` to `--help`, before clap sees them.
///
/// Declared spellings pass through untouched. A case-folded spelling shared
/// by two flags (`--VERSION` for `--version` and `--Version`) is left for
/// clap to reject. Nothing after `--` is rewritten.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = Cli::command();
    cmd.build();

    let mut declared = HashSet::new();
    let mut folded: HashMap<String, Option<String>> = HashMap::new();
    for arg in cmd.get_arguments() {
        let Some(long) = arg.get_long() else {
            continue;
        };
        let mut spellings = vec![long];
        spellings.extend(arg.get_all_aliases().unwrap_or_default());
        for spelling in spellings {
            declared.insert(spelling.to_string());
            folded
                .entry(spelling.to_lowercase())
                .and_modify(|target| {
                    if target.as_deref() != Some(long) {
                        *target = None;
                    }
                })
                .or_insert_with(|| Some(long.to_string()));
        }
    }

    let mut normalized = Vec::new();
    let mut positional_only = false;
    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || positional_only {
            normalized.push(arg);
            continue;
        }
        let rewritten = match arg.to_str() {
            Some("--") => {
                positional_only = true;
                None
            }
            Some("/?") => Some("--help".to_string()),
            Some(text) => text.strip_prefix("--").and_then(|flag| {
                let (name, value) = match flag.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (flag, None),
                };
                if declared.contains(name) {
                    return None;
                }
                let long = folded.get(&name.to_lowercase())?.as_deref()?;
                Some(match value {
                    Some(value) => format!("--{}={}", long, value),
                    None => format!("--{}", long),
                })
            }),
            None => None,
        };
        normalized.push(rewritten.map(OsString::from).unwrap_or(arg));
    }
    normalized
}
