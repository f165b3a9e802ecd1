//! Image command handlers

use crate::cli::commands::{ImportOptions, InstanceArgs};
use crate::client::create_client;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_info, print_success, table_output};
use crate::progress::{complete_spinner_and_clear, complete_spinner_error, create_spinner};
use pvsadm_sdk::types::ImageReference;
use pvsadm_sdk::{ImageImporter, ImportImageOptions};
use tracing::debug;

impl ImportOptions {
    /// Workflow options; the credential name falls back to configuration
    pub fn to_import_options(&self, config: &CliConfig) -> Result<ImportImageOptions> {
        Ok(ImportImageOptions {
            instance: self.instance.selector()?,
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            object_name: self.object_name.clone(),
            image_name: self.image_name.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            os_type: self.os_type,
            storage_type: self.storage_type,
            service_credential_name: self
                .service_credential_name
                .clone()
                .unwrap_or_else(|| config.image.service_credential_name.clone()),
        })
    }
}

/// Handle `image import`
pub async fn handle_import(
    options: ImportOptions,
    config: &CliConfig,
    api_key: Option<&str>,
    json: bool,
) -> Result<()> {
    let import = options.to_import_options(config)?;
    debug!(
        "Importing {} from bucket {} into PowerVS instance {}",
        import.object_name, import.bucket, import.instance
    );

    let client = create_client(config, api_key)?;
    let spinner = create_spinner(&format!(
        "Importing {} as {}...",
        import.object_name, import.image_name
    ));

    let image = match ImageImporter::new(&client).import(&import).await {
        Ok(image) => {
            complete_spinner_and_clear(spinner);
            image
        }
        Err(e) => {
            complete_spinner_error(spinner, "Image import failed");
            return Err(e.into());
        }
    };

    if json {
        return json_output(&image);
    }

    print_success(&format!(
        "Importing Image {} is currently in {} state",
        image.name, image.state
    ));
    table_output::display_image(&image);
    Ok(())
}

/// Handle `image ls`
pub async fn handle_ls(
    instance: InstanceArgs,
    config: &CliConfig,
    api_key: Option<&str>,
    json: bool,
) -> Result<()> {
    let (instance_name, images) = list_images(instance, config, api_key).await?;

    if json {
        return json_output(&images);
    }

    if images.is_empty() {
        print_info(&format!("No images found in PowerVS instance {instance_name}"));
        return Ok(());
    }

    table_output::display_images(&images);
    println!("\nTotal images: {}", images.len());
    Ok(())
}

/// Resolve the instance and list its images, returning the instance name
pub async fn list_images(
    instance: InstanceArgs,
    config: &CliConfig,
    api_key: Option<&str>,
) -> Result<(String, Vec<ImageReference>)> {
    let selector = instance.selector()?;
    let client = create_client(config, api_key)?;

    let spinner = create_spinner("Fetching images...");
    let result = async {
        let images = client.power_images(&selector).await?;
        let all = images.get_all().await?;
        Ok::<_, pvsadm_sdk::ApiError>((images.instance().name.clone(), all))
    }
    .await;

    match result {
        Ok(found) => {
            complete_spinner_and_clear(spinner);
            Ok(found)
        }
        Err(e) => {
            complete_spinner_error(spinner, "Failed to list images");
            Err(e.into())
        }
    }
}
