use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use docsim_core::{AnalysisMethod, FileRef, MEDIA_DOCX, MEDIA_MSWORD, MEDIA_PDF, MEDIA_TEXT};
use log::LevelFilter;

use super::logging::LogDestination;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Simulated document upload and compliance-analysis workflow.
///
/// Registers the given files, runs the simulated uploads, then starts the
/// chosen analysis once every upload has completed.
#[derive(Parser, Debug)]
#[command(name = "docsim", version, about)]
pub struct Cli {
    /// Files to upload: a path on disk, or a `name:media/type:bytes` descriptor.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Analysis method to run once uploads complete.
    #[arg(long, default_value = "enhanced")]
    pub method: AnalysisMethod,

    /// RON configuration file (defaults to ./docsim.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Remove the named file once its upload is under way.
    #[arg(long)]
    pub remove: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up if the workflow has not finished after this many seconds.
    #[arg(long, default_value_t = 30)]
    pub deadline_secs: u64,
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Resolves a positional argument into file metadata. Contents are never read.
pub fn parse_file_arg(arg: &str) -> anyhow::Result<FileRef> {
    let path = Path::new(arg);
    if path.is_file() {
        let meta = fs::metadata(path).with_context(|| format!("reading metadata of {arg}"))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| arg.to_string());
        return Ok(FileRef::new(name, guess_media_type(path), meta.len()));
    }

    let mut parts = arg.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(bytes), Some(media_type), Some(name)) if !name.is_empty() => {
            let size = bytes
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid byte size in descriptor {arg:?}"))?;
            Ok(FileRef::new(name, media_type.trim(), size))
        }
        _ => bail!("{arg:?} is neither an existing file nor a name:media/type:bytes descriptor"),
    }
}

pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => MEDIA_PDF,
        Some("doc") => MEDIA_MSWORD,
        Some("docx") => MEDIA_DOCX,
        Some("txt") => MEDIA_TEXT,
        _ => UNKNOWN_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn descriptor_is_parsed() {
        let file = parse_file_arg("Access Control SOP.pdf:application/pdf:1258291").unwrap();
        assert_eq!(
            file,
            FileRef::new("Access Control SOP.pdf", MEDIA_PDF, 1_258_291)
        );
    }

    #[test]
    fn descriptor_name_may_contain_colons() {
        let file = parse_file_arg("ISO 27002:2022.docx:text/plain:10").unwrap();
        assert_eq!(file.name, "ISO 27002:2022.docx");
        assert_eq!(file.media_type, MEDIA_TEXT);
    }

    #[test]
    fn bad_descriptor_is_rejected() {
        assert!(parse_file_arg("missing.pdf").is_err());
        assert!(parse_file_arg("a.pdf:application/pdf:lots").is_err());
    }

    #[test]
    fn real_file_uses_metadata_and_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Policy.DOCX");
        fs::write(&path, vec![0u8; 321]).unwrap();

        let file = parse_file_arg(path.to_str().unwrap()).unwrap();
        assert_eq!(file, FileRef::new("Policy.DOCX", MEDIA_DOCX, 321));
    }

    #[test]
    fn cli_parses_method_and_files() {
        let cli = Cli::try_parse_from([
            "docsim",
            "--method",
            "semantic",
            "--remove",
            "b.pdf",
            "a.pdf:application/pdf:10",
            "b.pdf:application/pdf:10",
        ])
        .unwrap();
        assert_eq!(cli.method, AnalysisMethod::Semantic);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.remove.as_deref(), Some("b.pdf"));
        assert_eq!(cli.log, LogTarget::Terminal);
        assert!(Cli::try_parse_from(["docsim", "--method", "keyword", "a"]).is_err());
    }
}
