use std::future::Future;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::models::{Local, LocalCreateDto, LocalUpdateDto};
use crate::types::LocalId;

/// Branch persistence as seen by the branches view.
///
/// [`LocalService`] is the backend-backed implementation.
pub trait LocalRepository: Send + Sync + 'static {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Local>, ApiError>> + Send;

    fn create(
        &self,
        dto: LocalCreateDto,
    ) -> impl Future<Output = Result<Local, ApiError>> + Send;

    fn update(
        &self,
        id: LocalId,
        dto: LocalUpdateDto,
    ) -> impl Future<Output = Result<Local, ApiError>> + Send;

    /// Flip the branch between active and inactive.
    fn toggle_active(&self, id: LocalId) -> impl Future<Output = Result<Local, ApiError>> + Send;
}

/// `/locales` endpoints of the backend.
#[derive(Clone)]
pub struct LocalService {
    client: Arc<ApiClient>,
}

impl LocalService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All branches. A response without `data` is an empty list.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_all(&self) -> Result<Vec<Local>, ApiError> {
        let response: ApiResponse<Vec<Local>> = self.client.get("/locales").await?;
        Ok(response.into_data()?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_by_id(&self, id: LocalId) -> Result<Local, ApiError> {
        let response: ApiResponse<Local> = self.client.get(&format!("/locales/{id}")).await?;
        response.into_required()
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn create(&self, dto: &LocalCreateDto) -> Result<Local, ApiError> {
        let response: ApiResponse<Local> = self.client.post("/locales", dto).await?;
        tracing::debug!("branch created");
        response.into_required()
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn update(&self, id: LocalId, dto: &LocalUpdateDto) -> Result<Local, ApiError> {
        let response: ApiResponse<Local> =
            self.client.put(&format!("/locales/{id}"), dto).await?;
        response.into_required()
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn toggle_active(&self, id: LocalId) -> Result<Local, ApiError> {
        let response: ApiResponse<Local> = self
            .client
            .patch(&format!("/locales/{id}/toggle-active"))
            .await?;
        response.into_required()
    }

    /// Soft delete; the backend keeps the row.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, id: LocalId) -> Result<(), ApiError> {
        self.client.delete(&format!("/locales/{id}")).await
    }
}

impl LocalRepository for LocalService {
    async fn get_all(&self) -> Result<Vec<Local>, ApiError> {
        LocalService::get_all(self).await
    }

    async fn create(&self, dto: LocalCreateDto) -> Result<Local, ApiError> {
        LocalService::create(self, &dto).await
    }

    async fn update(&self, id: LocalId, dto: LocalUpdateDto) -> Result<Local, ApiError> {
        LocalService::update(self, id, &dto).await
    }

    async fn toggle_active(&self, id: LocalId) -> Result<Local, ApiError> {
        LocalService::toggle_active(self, id).await
    }
}
