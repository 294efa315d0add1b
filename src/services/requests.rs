//! Item request service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateRequest, ItemRequest, RequestDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new item request
    pub async fn create_request(
        &self,
        requester_id: i64,
        request: CreateRequest,
    ) -> AppResult<ItemRequest> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.users.get_by_id(requester_id).await?;
        self.repository
            .requests
            .create(requester_id, &request.description)
            .await
    }

    /// Own requests with their answers, newest first
    pub async fn get_own_requests(&self, requester_id: i64) -> AppResult<Vec<RequestDetails>> {
        self.repository.users.get_by_id(requester_id).await?;
        let requests = self
            .repository
            .requests
            .find_by_requester(requester_id)
            .await?;
        self.with_answers(requests).await
    }

    /// Other users' requests, newest first
    pub async fn get_other_requests(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        self.repository.users.get_by_id(requester_id).await?;
        self.repository
            .requests
            .find_by_other_requesters(requester_id)
            .await
    }

    /// Request by ID with its answers
    pub async fn get_request(&self, request_id: i64) -> AppResult<RequestDetails> {
        let request = self.repository.requests.get_by_id(request_id).await?;
        let items = self.repository.requests.find_answers(request_id).await?;
        Ok(RequestDetails { request, items })
    }

    async fn with_answers(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<RequestDetails>> {
        let mut result = Vec::with_capacity(requests.len());
        for request in requests {
            let items = self.repository.requests.find_answers(request.id).await?;
            result.push(RequestDetails { request, items });
        }
        Ok(result)
    }
}
