// Generic CRUD service over one REST resource

use crate::envelope::{unwrap_data, Paginated};
use crate::error::ApiResult;
use crate::http::{HttpClient, QueryParams};
use crate::models::{BookingRequest, BookingResponse};
use crate::multipart::{MultipartForm, UploadFile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, instrument};

// Describes one backend resource
pub trait Resource: Send + Sync + 'static {
    type Entity: DeserializeOwned + Clone + Send + Sync + 'static;

    // Endpoint path, also the first part of every cache key
    const PATH: &'static str;
    // Singular name used in error messages ("User not found")
    const LABEL: &'static str;
    // Plural used in list error messages
    const PLURAL: &'static str;
    // Name shown in toasts
    const DISPLAY_NAME: &'static str;
}

// Resources that can be reserved through `POST /{path}/{id}/book`
pub trait Bookable: Resource {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub owner_id: Option<u64>,
    pub extra: Vec<(String, String)>,
}

impl ListParams {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_owner(mut self, owner_id: u64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra.push((key.into(), value.to_string()));
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(owner_id) = self.owner_id {
            query.push(("owner_id".to_string(), owner_id.to_string()));
        }
        query.extend(self.extra.iter().cloned());
        query
    }

    // Parameter parts appended to a list cache key
    pub fn key_parts(&self) -> Vec<String> {
        self.to_query()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}

pub struct ResourceService<R> {
    http: HttpClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }

    fn item_path(id: u64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    fn label() -> String {
        R::LABEL.to_lowercase()
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn get_all(&self, params: &ListParams) -> ApiResult<Paginated<R::Entity>> {
        let body = self.http.get(R::PATH, params.to_query()).await?;
        let page = Paginated::from_body(body, &format!("Failed to fetch {}", R::PLURAL))?;
        debug!(count = page.len(), total = page.meta.total, "fetched page");
        Ok(page)
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn get_by_id(&self, id: u64) -> ApiResult<R::Entity> {
        let body = self.http.get(&Self::item_path(id), Vec::new()).await?;
        unwrap_data(body, &format!("{} not found", R::LABEL))
    }

    // JSON body, or multipart when files are attached
    #[instrument(skip(self, data, files), fields(resource = R::PATH, files = files.len()))]
    pub async fn create<D>(&self, data: &D, files: &[UploadFile]) -> ApiResult<R::Entity>
    where
        D: Serialize + Sync + ?Sized,
    {
        let body = if files.is_empty() {
            self.http.post(R::PATH, data).await?
        } else {
            let form = MultipartForm::from_payload(data, files)?;
            self.http.post_multipart(R::PATH, form).await?
        };
        unwrap_data(body, &format!("Failed to create {}", Self::label()))
    }

    // PUT with a JSON body; with files, a multipart POST carrying `_method=PUT`
    #[instrument(skip(self, data, files), fields(resource = R::PATH, files = files.len()))]
    pub async fn update<D>(&self, id: u64, data: &D, files: &[UploadFile]) -> ApiResult<R::Entity>
    where
        D: Serialize + Sync + ?Sized,
    {
        let path = Self::item_path(id);
        let body = if files.is_empty() {
            self.http.put(&path, data).await?
        } else {
            let form = MultipartForm::from_payload(data, files)?.with_method_override("PUT");
            self.http.post_multipart(&path, form).await?
        };
        unwrap_data(body, &format!("Failed to update {}", Self::label()))
    }

    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.http.delete(&Self::item_path(id)).await?;
        Ok(())
    }
}

impl<R: Bookable> ResourceService<R> {
    #[instrument(skip(self, request), fields(resource = R::PATH))]
    pub async fn book(&self, id: u64, request: &BookingRequest) -> ApiResult<BookingResponse> {
        let path = format!("{}/book", Self::item_path(id));
        let body = self.http.post(&path, request).await?;
        unwrap_data(body, &format!("Failed to book {}", Self::label()))
    }
}
