use crate::error::{CliError, Result};
use clap::Subcommand;
use pvsadm_common::utils::parse_duration;
use pvsadm_common::{OsType, StorageType};
use pvsadm_sdk::InstanceSelector;
use std::time::Duration;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// PowerVS image management
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },

    /// Purge PowerVS resources
    Purge {
        #[command(subcommand)]
        action: PurgeAction,
    },
}

/// Image subcommands
#[derive(Subcommand, Debug)]
pub enum ImageAction {
    /// Import the image into PowerVS instances
    #[command(long_about = "Import the image into PowerVS instances

Set the API key with IBMCLOUD_API_KEY or pass --api-key.

Examples:

# import using the default storage type (service credential is autogenerated)
pvsadm image import -n upstream-core-lon04 -b <BUCKET> --object-name rhel-83-10032020.ova.gz --image-name test-image -r <REGION>

# import with explicit HMAC keys
pvsadm image import -n upstream-core-lon04 -b <BUCKET> --accesskey <ACCESSKEY> --secretkey <SECRETKEY> --object-name rhel-83-10032020.ova.gz --image-name test-image -r <REGION>

# with a storage type and an OS type
pvsadm image import -n upstream-core-lon04 -b <BUCKET> -r <REGION> --storagetype tier1 --ostype sles --object-name sles-15.ova.gz --image-name test-image")]
    Import(ImportOptions),

    /// List the images of a PowerVS instance
    Ls {
        #[command(flatten)]
        instance: InstanceArgs,
    },
}

/// Purge subcommands
#[derive(Subcommand, Debug)]
pub enum PurgeAction {
    /// Purge PowerVS images matching a name pattern and age window
    Images(PurgeImagesOptions),
}

/// PowerVS instance selection, by id or by name
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InstanceArgs {
    /// Instance name of the PowerVS
    #[arg(short = 'n', long)]
    pub instance_name: Option<String>,

    /// Instance ID of the PowerVS instance
    #[arg(short = 'i', long)]
    pub instance_id: Option<String>,
}

impl InstanceArgs {
    pub fn selector(&self) -> Result<InstanceSelector> {
        InstanceSelector::from_flags(self.instance_id.clone(), self.instance_name.clone())
            .ok_or_else(|| {
                CliError::invalid_argument("--instance-id or --instance-name is required")
            })
    }
}

/// Options for `image import`
#[derive(clap::Args, Debug, Clone)]
pub struct ImportOptions {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Cloud Storage bucket name
    #[arg(short = 'b', long)]
    pub bucket: String,

    /// COS bucket location
    #[arg(short = 'r', long)]
    pub region: String,

    /// Cloud Storage image filename
    #[arg(short = 'o', long)]
    pub object_name: String,

    /// Name to give imported image
    #[arg(long)]
    pub image_name: String,

    /// Cloud Storage access key
    #[arg(long = "accesskey")]
    pub access_key: Option<String>,

    /// Cloud Storage secret key
    #[arg(long = "secretkey")]
    pub secret_key: Option<String>,

    /// Image OS Type, accepted values are [aix, ibmi, redhat, sles]
    #[arg(long = "ostype", default_value = "redhat")]
    pub os_type: OsType,

    /// Storage type, accepted values are [tier1, tier3]
    #[arg(long = "storagetype", default_value = "tier3")]
    pub storage_type: StorageType,

    /// Service Credential name to be auto generated [default: pvsadm-service-cred]
    #[arg(long)]
    pub service_credential_name: Option<String>,
}

/// Options for `purge images`
#[derive(clap::Args, Debug, Clone)]
pub struct PurgeImagesOptions {
    #[command(flatten)]
    pub instance: InstanceArgs,

    /// Purge images created before this long ago (e.g. 72h, 7d)
    #[arg(long, default_value = "0", value_parser = parse_duration)]
    pub before: Duration,

    /// Purge images created within this long ago (e.g. 1h30m)
    #[arg(long, default_value = "0", value_parser = parse_duration)]
    pub since: Duration,

    /// Regular expression the image name must match
    #[arg(long, default_value = "")]
    pub regexp: String,

    /// Only list the images that would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Delete without asking for confirmation
    #[arg(long)]
    pub no_prompt: bool,

    /// Keep going when a deletion fails
    #[arg(long)]
    pub ignore_errors: bool,
}
