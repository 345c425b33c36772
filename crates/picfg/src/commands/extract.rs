//! `picfg extract`: run the workflow and write the files.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use picfg_core::{ExtractProgress, Extractor};

use crate::cli::{ExtractArgs, GlobalOpts};
use crate::config::{self, RunSettings};
use crate::error::CliError;
use crate::output::{self, OUTPUT_DIR_NAME};
use crate::prompt;

pub async fn handle(args: ExtractArgs, global: &GlobalOpts) -> Result<(), CliError> {
    print_banner();

    let settings = {
        let prompt = prompt::select(args.no_input);
        config::resolve(&args, global, prompt.as_ref())?
    };

    run(settings).await.map_err(|e| {
        error!(error = %e, "extraction failed");
        e.extraction_failed(&global.log_file)
    })
}

async fn run(settings: RunSettings) -> Result<(), CliError> {
    info!(url = %settings.extractor.url, "accessing Prime Infrastructure API");
    let extractor = Extractor::connect(&settings.extractor)?;

    let bar = ProgressBar::new_spinner().with_message("Listing configuration versions");
    bar.enable_steady_tick(Duration::from_millis(100));

    let results = extractor
        .extract_with_progress(|event| report(&bar, event))
        .await;
    bar.finish_and_clear();
    let results = results?;

    let destination = settings.destination.join(OUTPUT_DIR_NAME);
    eprintln!("Saving files to:");
    eprintln!("   {}", destination.display());

    output::prepare_directory(&destination).map_err(|e| CliError::io(&destination, e))?;
    let written =
        output::write_results(&destination, &results).map_err(|e| CliError::io(&destination, e))?;

    info!(
        files = written.len(),
        destination = %destination.display(),
        "configuration files written"
    );
    eprintln!("Finished");
    Ok(())
}

fn report(bar: &ProgressBar, event: ExtractProgress<'_>) {
    match event {
        ExtractProgress::Listed { total } => {
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} devices {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
            bar.set_message("");
        }
        ExtractProgress::Device { index, id, .. } => {
            bar.set_position(u64::try_from(index - 1).unwrap_or(u64::MAX));
            bar.set_message(format!("(version {id})"));
        }
        ExtractProgress::FileFailed {
            device_name,
            file_id,
        } => {
            bar.println(format!("   skipped file {file_id} of {device_name}, see log"));
        }
    }
}

fn print_banner() {
    eprintln!("Prime Infrastructure configuration extractor {}", env!("CARGO_PKG_VERSION"));
    eprintln!("Stores the running and startup configurations archived by Prime");
    eprintln!("Infrastructure as plain text files in a pi_cfg_files folder.");
    eprintln!();
}
