//! Purge command handlers

use crate::cli::commands::PurgeImagesOptions;
use crate::client::create_client;
use crate::config::CliConfig;
use crate::error::Result;
use crate::interactive::Prompter;
use crate::output::{
    json_output, print_error, print_info, print_success, print_warning, table_output,
};
use crate::progress::{complete_spinner_and_clear, complete_spinner_error, create_spinner};
use pvsadm_sdk::types::ImageReference;
use pvsadm_sdk::PurgeFilter;
use serde::Serialize;
use tracing::warn;

/// Outcome of `purge images`, printed as one document with `--json`
#[derive(Debug, Default, Serialize)]
pub struct PurgeReport {
    pub dry_run: bool,
    /// Images selected by the window and pattern
    pub candidates: Vec<ImageReference>,
    /// IDs of the images deleted
    pub deleted: Vec<String>,
    pub failed: Vec<PurgeFailure>,
}

#[derive(Debug, Serialize)]
pub struct PurgeFailure {
    pub id: String,
    pub name: String,
    pub error: String,
}

/// Handle `purge images`
pub async fn handle_purge_images(
    options: PurgeImagesOptions,
    config: &CliConfig,
    api_key: Option<&str>,
    json: bool,
) -> Result<()> {
    let report = purge_images(options, config, api_key, json).await?;
    if json {
        json_output(&report)?;
    }
    Ok(())
}

/// Select and delete images; human-readable output only when `json` is unset
pub async fn purge_images(
    options: PurgeImagesOptions,
    config: &CliConfig,
    api_key: Option<&str>,
    json: bool,
) -> Result<PurgeReport> {
    let selector = options.instance.selector()?;
    // Reject a bad pattern before any remote call
    let filter = PurgeFilter::new(options.before, options.since, &options.regexp)?;

    if options.before.is_zero() && options.since.is_zero() {
        print_warning("Neither --before nor --since is set, no image will be selected");
    }

    let client = create_client(config, api_key)?;
    let spinner = create_spinner("Fetching images...");
    let result = async {
        let images = client.power_images(&selector).await?;
        let candidates = images.select_purgeable(&filter).await?;
        Ok::<_, pvsadm_sdk::ApiError>((images, candidates))
    }
    .await;

    let (images, candidates) = match result {
        Ok(found) => {
            complete_spinner_and_clear(spinner);
            found
        }
        Err(e) => {
            complete_spinner_error(spinner, "Failed to list images");
            return Err(e.into());
        }
    };

    let mut report = PurgeReport {
        dry_run: options.dry_run,
        candidates,
        ..Default::default()
    };

    if report.candidates.is_empty() {
        if !json {
            print_info("No images matched the purge criteria");
        }
        return Ok(report);
    }

    if !json {
        table_output::display_images(&report.candidates);
    }

    if options.dry_run {
        if !json {
            print_info(&format!(
                "Dry run: {} image(s) would be deleted",
                report.candidates.len()
            ));
        }
        return Ok(report);
    }

    if !options.no_prompt {
        let prompt = format!(
            "Delete {} image(s) from PowerVS instance {}?",
            report.candidates.len(),
            images.instance().name
        );
        if !Prompter::new().confirm(&prompt)? {
            if !json {
                print_info("Purge cancelled");
            }
            return Ok(report);
        }
    }

    for image in &report.candidates {
        match images.delete(&image.image_id).await {
            Ok(()) => {
                if !json {
                    print_success(&format!(
                        "Deleted image {} [ID:{}]",
                        image.name, image.image_id
                    ));
                }
                report.deleted.push(image.image_id.clone());
            }
            Err(e) if options.ignore_errors => {
                warn!("Failed to delete image {}: {}", image.image_id, e);
                if !json {
                    print_error(&format!("Failed to delete image {}: {e}", image.name));
                }
                report.failed.push(PurgeFailure {
                    id: image.image_id.clone(),
                    name: image.name.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !json {
        if report.failed.is_empty() {
            print_success(&format!("Purged {} image(s)", report.deleted.len()));
        } else {
            print_warning(&format!(
                "{} of {} image(s) could not be deleted",
                report.failed.len(),
                report.candidates.len()
            ));
        }
    }

    Ok(report)
}
