use reqwest::StatusCode;

use crate::resource::{RemoteResourceHandle, ResourceKind};
use crate::template::{ApiResponse, RequestTemplate};
use crate::{HarnessError, HarnessResult};

/// Deletes the resource at `path`. Anything but 200 is a [`HarnessError::Cleanup`].
pub async fn delete_resource(template: &RequestTemplate, path: &str) -> HarnessResult<()> {
    let response = template.delete(path).send().await?;
    check_cleanup(path, response)?;

    tracing::debug!(path, "resource deleted");
    Ok(())
}

/// Archives the list at `path`. The service has no list delete.
pub async fn archive_list(template: &RequestTemplate, path: &str) -> HarnessResult<()> {
    let response = template
        .put(format!("{}/closed", path))
        .query_param("value", true)
        .send()
        .await?;
    check_cleanup(path, response)?;

    tracing::debug!(path, "list archived");
    Ok(())
}

/// Removes `handle` the only way its kind allows.
pub async fn remove_resource(
    template: &RequestTemplate,
    handle: &RemoteResourceHandle,
) -> HarnessResult<()> {
    match handle.kind {
        ResourceKind::List => archive_list(template, &handle.path()).await,
        _ => delete_resource(template, &handle.path()).await,
    }
}

fn check_cleanup(path: &str, response: ApiResponse) -> HarnessResult<()> {
    if response.status() != StatusCode::OK {
        tracing::error!(path, status = response.status().as_u16(), "cleanup failed");
        return Err(HarnessError::Cleanup {
            path: path.to_string(),
            status: response.status().as_u16(),
            body: response.text().to_string(),
        });
    }
    Ok(())
}
