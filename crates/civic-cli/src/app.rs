//! Command execution.

use crate::cli::Command;
use crate::di::AppModule;
use civic_core::{CivicResult, PageRequest};
use civic_service::{CreateServiceRequest, UpdateStatusRequest};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Runs CLI commands against a wired [`AppModule`].
pub struct App {
    module: Arc<AppModule>,
}

impl App {
    /// Creates an application over `module`.
    pub fn new(module: Arc<AppModule>) -> Self {
        Self { module }
    }

    /// The wired components.
    pub fn module(&self) -> &AppModule {
        &self.module
    }

    /// Executes one command, returning its JSON output.
    pub async fn execute(&self, command: Command) -> CivicResult<Value> {
        let service = self.module.service_request_service();

        match command {
            Command::Create {
                title,
                description,
                category,
                neighborhood,
                latitude,
                longitude,
                photos,
            } => {
                let request = CreateServiceRequest {
                    title,
                    description,
                    category,
                    neighborhood,
                    latitude,
                    longitude,
                    photo_urls: (!photos.is_empty()).then_some(photos),
                };
                to_json(&service.create_request(request).await?)
            }
            Command::Get { id } => to_json(&service.get_request(id).await?),
            Command::List { skip, limit } => {
                to_json(&service.list_requests(PageRequest::new(skip, limit)).await?)
            }
            Command::UpdateStatus { id, status } => to_json(
                &service
                    .update_request_status(id, UpdateStatusRequest { status })
                    .await?,
            ),
            Command::ClearCache => to_json(&self.module.admin_service().clear_cache().await),
            Command::CacheStatus => to_json(&self.module.admin_service().cache_status()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> CivicResult<Value> {
    Ok(serde_json::to_value(value)?)
}
