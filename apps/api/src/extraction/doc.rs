//! Legacy Word 97-2003 (`.doc`) support.
//!
//! The binary format is converted to `.docx` by a headless office install and
//! then read with the regular DOCX parser.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{docx, run_parser, ExtractError, ExtractorConfig};

const INPUT_NAME: &str = "manuscript.doc";
const OUTPUT_NAME: &str = "manuscript.docx";

pub async fn extract_text(bytes: &[u8], config: &ExtractorConfig) -> Result<String, ExtractError> {
    let workdir = tempfile::tempdir()
        .map_err(|e| ExtractError::ParseFailure(format!("failed to create work dir: {e}")))?;
    let input = workdir.path().join(INPUT_NAME);
    tokio::fs::write(&input, bytes)
        .await
        .map_err(|e| ExtractError::ParseFailure(format!("failed to stage DOC upload: {e}")))?;

    // Separate profile per conversion so concurrent requests don't fight over the lock file.
    let profile = format!(
        "-env:UserInstallation=file://{}",
        workdir.path().join("profile").display()
    );

    let mut command = Command::new(&config.doc_converter);
    command
        .arg(profile)
        .arg("--headless")
        .arg("--convert-to")
        .arg("docx")
        .arg("--outdir")
        .arg(workdir.path())
        .arg(&input)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    debug!("Converting DOC upload with {}", config.doc_converter);

    let output = tokio::time::timeout(config.convert_timeout, command.output())
        .await
        .map_err(|_| {
            ExtractError::ParseFailure(format!(
                "DOC conversion timed out after {}s",
                config.convert_timeout.as_secs()
            ))
        })?
        .map_err(|e| {
            ExtractError::ParseFailure(format!(
                "failed to launch DOC converter '{}': {e}",
                config.doc_converter
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::ParseFailure(format!(
            "DOC conversion failed ({}): {}",
            output.status,
            stderr.trim()
        )));
    }

    let converted = tokio::fs::read(workdir.path().join(OUTPUT_NAME))
        .await
        .map_err(|e| ExtractError::ParseFailure(format!("DOC converter produced no output: {e}")))?;

    run_parser(move || docx::extract_text(&converted)).await
}
