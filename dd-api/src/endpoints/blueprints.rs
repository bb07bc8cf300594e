//! Blueprint deployment endpoints.

use std::collections::HashMap;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use dd_core::error::{ClientError, ClientResult};
use dd_models::Blueprint;

use crate::client::DeploymentClient;
use crate::response::{map_response, ApiResult};

/// Multipart part name carrying the artifact.
const FILE_PART: &str = "file";

fn blueprint_path(container_id: &str) -> [&str; 3] {
    ["containers", container_id, "blueprint"]
}

/// Build the upload form: the artifact as a binary `file` part, then one
/// text part per metadata entry in key order.
async fn blueprint_form(file: &Path, metadata: &HashMap<String, String>) -> ClientResult<Form> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "blueprint".to_string());

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| ClientError::Configuration(format!("invalid mime type: {e}")))?;

    let mut entries: Vec<_> = metadata.iter().collect();
    entries.sort();

    let mut form = Form::new().part(FILE_PART, part);
    for (key, value) in entries {
        form = form.text(key.clone(), value.clone());
    }
    Ok(form)
}

impl DeploymentClient {
    /// Upload `blueprint` into a container and start its deployment.
    ///
    /// `metadata` entries are sent as multipart text fields. With `register`
    /// set, the service is asked to register the application as well.
    /// Expects 202.
    pub async fn deploy_blueprint(
        &self,
        container_id: &str,
        blueprint: &Path,
        metadata: &HashMap<String, String>,
        register: bool,
    ) -> ClientResult<ApiResult<Blueprint>> {
        let form = blueprint_form(blueprint, metadata).await?;
        let params: &[(&str, &str)] = if register {
            &[("register_app", "true")]
        } else {
            &[]
        };
        let response = self
            .post_multipart(&blueprint_path(container_id), params, form)
            .await?;
        map_response(response, StatusCode::ACCEPTED)
    }

    /// Remove the blueprint deployed in a container. Expects 202.
    pub async fn undeploy_blueprint(&self, container_id: &str) -> ClientResult<ApiResult<Blueprint>> {
        let response = self.delete(&blueprint_path(container_id), &[]).await?;
        map_response(response, StatusCode::ACCEPTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_path() {
        assert_eq!(blueprint_path("c1"), ["containers", "c1", "blueprint"]);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_io_error() {
        let err = blueprint_form(Path::new("/nonexistent/app.tar.gz"), &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[tokio::test]
    async fn test_form_builds_for_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.tar.gz");
        std::fs::write(&path, b"archive-bytes").unwrap();
        let metadata = HashMap::from([("stage".to_string(), "qa".to_string())]);
        assert!(blueprint_form(&path, &metadata).await.is_ok());
    }
}
