//! Argument parsing and end-to-end command tests for pvsadm

use clap::Parser;
use pvsadm_cli::cli::handlers::{image, purge};
use pvsadm_cli::cli::{Args, Commands, ImageAction, PurgeAction, PurgeImagesOptions};
use pvsadm_cli::output::table_output;
use pvsadm_cli::config::CliConfig;
use pvsadm_cli::CliError;
use pvsadm_common::{OsType, StorageType};
use pvsadm_sdk::InstanceSelector;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PVS_CRN: &str = "crn:v1:bluemix:public:power-iaas:lon04:a/acc:pvs-guid::";

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("pvsadm").chain(args.iter().copied()))
}

#[test]
fn test_import_defaults() {
    let args = parse(&[
        "image",
        "import",
        "-n",
        "upstream-core-lon04",
        "-b",
        "images",
        "-r",
        "us-south",
        "--object-name",
        "rhel-83-10032020.ova.gz",
        "--image-name",
        "test-image",
    ])
    .unwrap();

    let Commands::Image {
        action: ImageAction::Import(options),
    } = args.command
    else {
        panic!("expected image import");
    };

    assert_eq!(options.os_type, OsType::Redhat);
    assert_eq!(options.storage_type, StorageType::Tier3);
    assert!(options.access_key.is_none());

    let import = options.to_import_options(&CliConfig::default()).unwrap();
    assert_eq!(
        import.instance,
        InstanceSelector::Name("upstream-core-lon04".into())
    );
    assert_eq!(import.service_credential_name, "pvsadm-service-cred");
}

#[test]
fn test_import_types_are_case_insensitive() {
    let args = parse(&[
        "image", "import", "-i", "guid", "-b", "b", "-r", "us-east", "-o", "o", "--image-name",
        "x", "--ostype", "AIX", "--storagetype", "Tier1",
    ])
    .unwrap();

    let Commands::Image {
        action: ImageAction::Import(options),
    } = args.command
    else {
        panic!("expected image import");
    };
    assert_eq!(options.os_type, OsType::Aix);
    assert_eq!(options.storage_type, StorageType::Tier1);
}

#[test]
fn test_invalid_os_type_rejected() {
    let err = parse(&[
        "image", "import", "-i", "guid", "-b", "b", "-r", "r", "-o", "o", "--image-name", "x",
        "--ostype", "windows",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("allowable values are [aix, ibmi, redhat, sles]"));
}

#[test]
fn test_invalid_storage_type_rejected() {
    let err = parse(&[
        "image", "import", "-i", "guid", "-b", "b", "-r", "r", "-o", "o", "--image-name", "x",
        "--storagetype", "tier2",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("[tier1, tier3]"));
}

#[test]
fn test_import_requires_bucket() {
    let err = parse(&[
        "image", "import", "-i", "guid", "-r", "r", "-o", "o", "--image-name", "x",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_instance_id_and_name_are_exclusive() {
    let err = parse(&["image", "ls", "-i", "guid", "-n", "name"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

    let err = parse(&["image", "ls"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_purge_images_flags() {
    let args = parse(&[
        "purge",
        "images",
        "-n",
        "ci-instance",
        "--before",
        "72h",
        "--regexp",
        "^rhel-",
        "--dry-run",
        "--ignore-errors",
    ])
    .unwrap();

    let Commands::Purge {
        action: PurgeAction::Images(options),
    } = args.command
    else {
        panic!("expected purge images");
    };
    assert_eq!(options.before, Duration::from_secs(72 * 3600));
    assert_eq!(options.since, Duration::ZERO);
    assert_eq!(options.regexp, "^rhel-");
    assert!(options.dry_run);
    assert!(!options.no_prompt);
    assert!(options.ignore_errors);
}

#[test]
fn test_purge_rejects_bad_duration() {
    let err = parse(&["purge", "images", "-i", "guid", "--since", "3w"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = parse(&["image", "ls", "-i", "guid", "--json", "--api-key", "k", "-vv"]).unwrap();
    assert!(args.json);
    assert_eq!(args.api_key.as_deref(), Some("k"));
    assert!(args.verbosity.log_level().is_some());
}

// ===== End-to-end against a mock IBM Cloud =====

struct Harness {
    server: MockServer,
    _dir: TempDir,
    config: PathBuf,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/resource_instances"))
        .and(query_param("resource_id", "abd259f0-9990-11e8-acc8-b9f54a8f1661"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{
                "id": PVS_CRN,
                "guid": "pvs-guid",
                "crn": PVS_CRN,
                "name": "ci-instance",
                "region_id": "lon04"
            }]
        })))
        .mount(&server)
        .await;

    let old = (chrono::Utc::now() - chrono::Duration::days(5)).to_rfc3339();
    let new = (chrono::Utc::now() - chrono::Duration::minutes(30)).to_rfc3339();
    Mock::given(method("GET"))
        .and(path("/pcloud/v1/cloud-instances/pvs-guid/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [
                {"imageID": "old-ci", "name": "ci-rhel", "state": "active", "creationDate": old},
                {"imageID": "new-ci", "name": "ci-sles", "state": "active", "creationDate": new},
                {"imageID": "golden", "name": "golden-aix", "state": "active", "creationDate": old}
            ]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[api]\niam_url = \"{uri}\"\nresource_controller_url = \"{uri}\"\ncos_url = \"{uri}\"\npower_url = \"{uri}\"\ntimeout_secs = 10\n",
            uri = server.uri()
        ),
    )
    .unwrap();

    Harness {
        server,
        _dir: dir,
        config,
    }
}

impl Harness {
    fn args(&self, args: &[&str]) -> Args {
        let config = self.config.to_str().unwrap();
        let mut full = vec!["--config", config, "--api-key", "test-key"];
        full.extend_from_slice(args);
        parse(&full).unwrap()
    }

    fn load_config(&self) -> CliConfig {
        CliConfig::load(Some(&self.config)).unwrap()
    }

    fn purge_options(&self, args: &[&str]) -> PurgeImagesOptions {
        let mut full = vec!["purge", "images"];
        full.extend_from_slice(args);
        match self.args(&full).command {
            Commands::Purge {
                action: PurgeAction::Images(options),
            } => options,
            _ => panic!("expected purge images"),
        }
    }

    async fn mount_delete(&self, id: &str, status: u16, times: u64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/pcloud/v1/cloud-instances/pvs-guid/images/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn test_image_ls_json() {
    let h = harness().await;
    h.args(&["image", "ls", "-n", "ci-instance", "--json"])
        .run()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_image_ls_lists_instance_images() {
    let h = harness().await;
    let Commands::Image {
        action: ImageAction::Ls { instance },
    } = h.args(&["image", "ls", "-n", "ci-instance"]).command
    else {
        panic!("expected image ls");
    };

    let config = h.load_config();
    let (instance_name, images) = image::list_images(instance, &config, Some("test-key"))
        .await
        .unwrap();
    assert_eq!(instance_name, "ci-instance");

    let ids: Vec<_> = images.iter().map(|i| i.image_id.as_str()).collect();
    assert_eq!(ids, ["old-ci", "new-ci", "golden"]);

    let value = serde_json::to_value(&images).unwrap();
    assert_eq!(value[0]["imageID"], "old-ci");
    assert_eq!(value[2]["name"], "golden-aix");

    let table = table_output::render_images(&images);
    assert!(table.contains("ci-sles"));
    assert!(table.contains("golden-aix"));
}

#[tokio::test]
async fn test_image_ls_unknown_instance() {
    let h = harness().await;
    let err = h
        .args(&["image", "ls", "-n", "missing"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CliError::Api(pvsadm_sdk::ApiError::InstanceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_purge_dry_run_deletes_nothing() {
    let h = harness().await;
    h.mount_delete("old-ci", 200, 0).await;

    h.args(&[
        "purge", "images", "-i", "pvs-guid", "--before", "72h", "--regexp", "^ci-", "--dry-run",
    ])
    .run()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_purge_deletes_matching_images() {
    let h = harness().await;
    h.mount_delete("old-ci", 200, 1).await;
    h.mount_delete("new-ci", 200, 0).await;
    h.mount_delete("golden", 200, 0).await;

    h.args(&[
        "purge", "images", "-i", "pvs-guid", "--before", "72h", "--regexp", "^ci-", "--no-prompt",
    ])
    .run()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_purge_since_window() {
    let h = harness().await;
    h.mount_delete("new-ci", 200, 1).await;
    h.mount_delete("old-ci", 200, 0).await;

    h.args(&[
        "purge", "images", "-i", "pvs-guid", "--since", "1h", "--regexp", "ci", "--no-prompt",
    ])
    .run()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_purge_delete_failure_aborts() {
    let h = harness().await;
    h.mount_delete("old-ci", 500, 1).await;
    h.mount_delete("golden", 200, 0).await;

    let err = h
        .args(&[
            "purge", "images", "-i", "pvs-guid", "--before", "72h", "--no-prompt",
        ])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Api(_)));
}

#[tokio::test]
async fn test_purge_ignore_errors_continues() {
    let h = harness().await;
    h.mount_delete("old-ci", 500, 1).await;
    h.mount_delete("golden", 200, 1).await;

    h.args(&[
        "purge",
        "images",
        "-i",
        "pvs-guid",
        "--before",
        "72h",
        "--no-prompt",
        "--ignore-errors",
    ])
    .run()
    .await
    .unwrap();
}

#[tokio::test]
async fn test_purge_invalid_regexp_fails_before_any_call() {
    let h = harness().await;
    let err = h
        .args(&[
            "purge", "images", "-i", "pvs-guid", "--before", "1h", "--regexp", "ci-(",
        ])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CliError::Api(pvsadm_sdk::ApiError::InvalidPattern { .. })
    ));

    let requests = h.server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_purge_json_report() {
    let h = harness().await;
    h.mount_delete("old-ci", 200, 1).await;
    h.mount_delete("new-ci", 200, 0).await;

    let options = h.purge_options(&[
        "-i", "pvs-guid", "--before", "72h", "--regexp", "^ci-", "--no-prompt",
    ]);
    let report = purge::purge_images(options, &h.load_config(), Some("test-key"), true)
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["dry_run"], false);
    assert_eq!(value["candidates"][0]["imageID"], "old-ci");
    assert_eq!(value["deleted"], json!(["old-ci"]));
    assert_eq!(value["failed"], json!([]));
}

#[tokio::test]
async fn test_purge_json_report_records_failures() {
    let h = harness().await;
    h.mount_delete("old-ci", 500, 1).await;
    h.mount_delete("golden", 200, 1).await;

    let options = h.purge_options(&[
        "-i",
        "pvs-guid",
        "--before",
        "72h",
        "--no-prompt",
        "--ignore-errors",
    ]);
    let report = purge::purge_images(options, &h.load_config(), Some("test-key"), true)
        .await
        .unwrap();

    assert_eq!(report.deleted, ["golden"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, "old-ci");
    assert_eq!(report.failed[0].name, "ci-rhel");
    assert!(!report.failed[0].error.is_empty());
}

#[tokio::test]
async fn test_purge_json_dry_run_report() {
    let h = harness().await;
    h.mount_delete("old-ci", 200, 0).await;

    let options = h.purge_options(&[
        "-i", "pvs-guid", "--before", "72h", "--regexp", "^ci-", "--dry-run",
    ]);
    let report = purge::purge_images(options, &h.load_config(), Some("test-key"), true)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.candidates.len(), 1);
    assert!(report.deleted.is_empty());
}
