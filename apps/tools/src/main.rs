use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    search::{filter_papers, result_lines},
    ArchiveClient,
};
use shared::protocol::{UploadForm, UploadReceipt};
use storage::PaperArchive;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "archive-tools", about = "Maintenance commands for the paper archive")]
struct Cli {
    #[arg(long, env = "ARCHIVES_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload one PDF through the admin form endpoint.
    Upload(UploadArgs),
    /// Print every paper the server lists.
    List,
    /// Run the terminal's search filter against the server's list.
    Search { query: String },
    /// Decode the papers in an upload directory without a server.
    Inspect {
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct UploadArgs {
    file: PathBuf,
    #[arg(long)]
    admin_name: String,
    #[arg(long = "class")]
    class_name: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    semester: String,
    #[arg(long)]
    year: String,
    #[arg(long)]
    exam_type: String,
    #[arg(long)]
    medium: String,
}

impl UploadArgs {
    fn form(&self) -> UploadForm {
        UploadForm {
            admin_name: self.admin_name.clone(),
            class_name: self.class_name.clone(),
            subject: self.subject.clone(),
            semester: self.semester.clone(),
            exam_year: self.year.clone(),
            exam_type: self.exam_type.clone(),
            medium: self.medium.clone(),
        }
    }
}

/// Logs the receipt and returns the line printed for it.
fn report_upload(receipt: &UploadReceipt) -> String {
    info!(
        stored_filename = %receipt.stored_filename,
        size_bytes = receipt.size_bytes,
        metadata_stamped = receipt.metadata_stamped,
        "paper uploaded"
    );
    if !receipt.metadata_stamped {
        warn!(
            stored_filename = %receipt.stored_filename,
            "server stored the file without writing PDF metadata"
        );
    }
    format!(
        "stored {} ({} bytes) at {}",
        receipt.stored_filename, receipt.size_bytes, receipt.url
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Upload(args) => {
            let client = ArchiveClient::new(&cli.server_url)?;
            let bytes = tokio::fs::read(&args.file)
                .await
                .with_context(|| format!("failed to read '{}'", args.file.display()))?;
            let filename = args
                .file
                .file_name()
                .and_then(|name| name.to_str())
                .context("upload path has no usable file name")?;
            debug!(filename, size_bytes = bytes.len(), server = %client.base_url(), "uploading paper");
            let receipt = client.upload_paper(&args.form(), filename, bytes).await?;
            println!("{}", report_upload(&receipt));
        }
        Command::List => {
            let client = ArchiveClient::new(&cli.server_url)?;
            let papers = client.list_papers().await?;
            info!(count = papers.len(), "fetched paper list");
            for paper in papers {
                println!("[{}] {}  {}", paper.year, paper.title(), paper.url);
            }
        }
        Command::Search { query } => {
            let client = ArchiveClient::new(&cli.server_url)?;
            let papers = client.list_papers().await?;
            let matches = filter_papers(&papers, &query);
            info!(query = %query, matches = matches.len(), total = papers.len(), "search finished");
            let resolve = |path: &str| {
                client_core::join_url(client.base_url(), path)
                    .map(String::from)
                    .unwrap_or_else(|_| path.to_string())
            };
            for line in result_lines(&matches, resolve) {
                println!("{}", line.plain_text());
            }
        }
        Command::Inspect { upload_dir } => {
            let archive = PaperArchive::new(&upload_dir).await?;
            let stored = archive.list_papers().await?;
            debug!(upload_dir = %upload_dir.display(), count = stored.len(), "decoded upload directory");
            for paper in &stored {
                println!(
                    "{}  uploader={}  original={}",
                    paper.stored_filename, paper.tags.uploader, paper.original_name
                );
            }
            println!("{} paper(s) in '{}'", stored.len(), upload_dir.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_flags_map_onto_form_fields() {
        let cli = Cli::try_parse_from([
            "archive-tools",
            "--server-url",
            "http://archive.local",
            "upload",
            "final.pdf",
            "--admin-name",
            "Ada",
            "--class",
            "BSc",
            "--subject",
            "Math",
            "--semester",
            "2",
            "--year",
            "2020",
            "--exam-type",
            "Final",
            "--medium",
            "English",
        ])
        .expect("parse");
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        let form = args.form();
        assert_eq!(form.class_name, "BSc");
        assert_eq!(form.exam_year, "2020");
        assert_eq!(form.to_tags().uploader, "Ada");
        assert_eq!(cli.server_url, "http://archive.local");
    }

    #[test]
    fn upload_report_names_stored_file_and_url() {
        let receipt = UploadReceipt {
            stored_filename: "[BSc]_paper.pdf".into(),
            url: "/uploads/%5BBSc%5D_paper.pdf".into(),
            size_bytes: 42,
            metadata_stamped: true,
        };
        assert_eq!(
            report_upload(&receipt),
            "stored [BSc]_paper.pdf (42 bytes) at /uploads/%5BBSc%5D_paper.pdf"
        );
    }
}
