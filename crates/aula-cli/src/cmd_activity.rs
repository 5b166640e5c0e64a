use clap::Subcommand;
use std::path::{Path, PathBuf};

use aula_client::{create_activity, get_activity, submit_file, ActivityType, NewActivity};
use aula_session::FilePart;

use crate::tab::Tab;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ActivityCmd {
    /// Create the activity for this placement
    Create {
        /// Activity title
        title: String,
        /// Activity description
        #[arg(long, default_value = "")]
        description: String,
        /// individual or group
        #[arg(long = "type", default_value = "individual")]
        activity_type: ActivityType,
        /// Maximum members per group (group activities only)
        #[arg(long)]
        max_group_size: Option<u32>,
        /// Deadline, ISO 8601 (e.g. 2025-12-31T23:59:00Z)
        #[arg(long)]
        deadline: Option<String>,
        /// Evaluator user id
        #[arg(long)]
        evaluator: Option<String>,
    },
    /// Show an activity record
    Get {
        /// Activity id (the placement's resource_link_id)
        id: String,
    },
    /// Upload a file as a submission
    Submit {
        /// Activity id
        id: String,
        /// File to upload
        file: PathBuf,
        /// MIME type (guessed from the extension if omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
}

// ── Dispatch ──

pub async fn run(cmd: ActivityCmd, tab: &Tab) -> anyhow::Result<()> {
    match cmd {
        ActivityCmd::Create {
            title,
            description,
            activity_type,
            max_group_size,
            deadline,
            evaluator,
        } => {
            let activity = NewActivity {
                title,
                description,
                activity_type,
                max_group_size,
                deadline,
                evaluator_id: evaluator,
            };
            let created = create_activity(&tab.client, &activity).await?;
            match (&created.activity_id, &created.message) {
                (Some(id), _) => println!("Created activity {id}"),
                (None, Some(msg)) => println!("{msg}"),
                (None, None) => println!("Created activity"),
            }
            Ok(())
        }
        ActivityCmd::Get { id } => {
            let record = get_activity(&tab.client, &id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        ActivityCmd::Submit {
            id,
            file,
            content_type,
        } => {
            let part = file_part(&file, content_type)?;
            let receipt = submit_file(&tab.client, &id, part).await?;
            println!(
                "Uploaded {} ({})",
                receipt.filename.as_deref().unwrap_or("file"),
                receipt.file_id.as_deref().unwrap_or("no id")
            );
            Ok(())
        }
    }
}

// ── Helpers ──

fn file_part(path: &Path, content_type: Option<String>) -> anyhow::Result<FilePart> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("{} has no file name", path.display()))?
        .to_string();
    let content_type = content_type.or_else(|| guess_content_type(path).map(str::to_string));
    Ok(FilePart {
        field: "file".to_string(),
        file_name,
        content_type,
        bytes,
    })
}

fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "odt" => "application/vnd.oasis.opendocument.text",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    };
    Some(mime)
}
