use crate::commands::split::SplitOptions;
use crate::split::LabelPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "outline-split")]
#[command(about = "Split PDFs into per-subsection files using their X.Y bookmarks")]
#[command(version)]
pub struct Cli {
    /// PDF files to split
    #[arg(required = true)]
    pub pdfs: Vec<PathBuf>,

    /// Base output directory (default: next to each input PDF)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write a JSON summary report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Only report what would be created
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Treat "1.2.3 Title" bookmarks as subsection 1.2 instead of ignoring them
    #[arg(long)]
    pub allow_nested_numbers: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            output_dir: self.output_dir.clone(),
            dry_run: self.dry_run,
            overwrite: self.overwrite,
            label_policy: if self.allow_nested_numbers {
                LabelPolicy::Lenient
            } else {
                LabelPolicy::Strict
            },
        }
    }
}
