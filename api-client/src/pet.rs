//! Pet-store resource model and client.

use crate::client::{ApiClient, PartValue};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::path::PathParams;
use crate::response::ApiResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const PET_PATH: &str = "/pet";
const PET_BY_ID_PATH: &str = "/pet/{petId}";
const PET_BY_STATUS_PATH: &str = "/pet/findByStatus";
const PET_BY_TAGS_PATH: &str = "/pet/findByTags";
const PET_UPLOAD_IMAGE_PATH: &str = "/pet/{petId}/uploadImage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Pet {
    pub fn new<S: Into<String>>(id: i64, name: S) -> Self {
        Self {
            id: Some(id),
            category: None,
            name: name.into(),
            photo_urls: Vec::new(),
            tags: Vec::new(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: PetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category<S: Into<String>>(mut self, id: i64, name: S) -> Self {
        self.category = Some(Category {
            id,
            name: name.into(),
        });
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, id: i64, name: S) -> Self {
        self.tags.push(Tag {
            id,
            name: name.into(),
        });
        self
    }

    pub fn with_photo_url<S: Into<String>>(mut self, url: S) -> Self {
        self.photo_urls.push(url.into());
        self
    }
}

/// Client for the `/pet` resource
#[derive(Debug, Clone)]
pub struct PetApiClient {
    api: ApiClient,
    sample_image: Option<PathBuf>,
}

impl PetApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
            sample_image: config.sample_image.clone(),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn create_pet(&self, pet: &Pet) -> Result<ApiResponse> {
        self.api.post(PET_PATH, pet).await
    }

    pub async fn get_pet(&self, id: i64) -> Result<ApiResponse> {
        self.api.get_with(PET_BY_ID_PATH, &pet_id(id)).await
    }

    pub async fn update_pet(&self, pet: &Pet) -> Result<ApiResponse> {
        self.api.put(PET_PATH, pet).await
    }

    pub async fn update_pet_with_form(
        &self,
        id: i64,
        name: &str,
        status: &str,
    ) -> Result<ApiResponse> {
        self.api
            .post_form(
                PET_BY_ID_PATH,
                &[("name", name), ("status", status)],
                &pet_id(id),
            )
            .await
    }

    pub async fn delete_pet(&self, id: i64) -> Result<ApiResponse> {
        self.api.delete_with(PET_BY_ID_PATH, &pet_id(id)).await
    }

    pub async fn delete_pet_without_auth(&self, id: i64) -> Result<ApiResponse> {
        self.api
            .delete_unauthenticated(PET_BY_ID_PATH, &pet_id(id))
            .await
    }

    pub async fn find_by_status(&self, status: &str) -> Result<ApiResponse> {
        let path = format!("{PET_BY_STATUS_PATH}?status={}", urlencoding::encode(status));
        self.api.get(&path).await
    }

    /// `tags` is a comma-separated list
    pub async fn find_by_tags(&self, tags: &str) -> Result<ApiResponse> {
        let path = format!("{PET_BY_TAGS_PATH}?tags={}", urlencoding::encode(tags));
        self.api.get(&path).await
    }

    /// Upload an image for a pet.
    ///
    /// When `image` is missing or unreadable the configured sample image is
    /// sent instead; without one the multipart placeholder rules apply.
    pub async fn upload_image(
        &self,
        id: i64,
        image: Option<&Path>,
        metadata: Option<&str>,
    ) -> Result<ApiResponse> {
        let file = self.choose_image(image).await;
        let fields = vec![
            ("additionalMetadata".to_string(), PartValue::from(metadata)),
            ("file".to_string(), file.map_or(PartValue::Null, PartValue::File)),
        ];

        self.api
            .post_multipart(PET_UPLOAD_IMAGE_PATH, fields, &pet_id(id))
            .await
    }

    async fn choose_image(&self, image: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = image {
            if is_readable_file(path).await {
                return Some(path.to_path_buf());
            }
        }

        match &self.sample_image {
            Some(sample) => {
                tracing::info!(sample = %sample.display(), "falling back to sample image");
                Some(sample.clone())
            }
            None => image.map(Path::to_path_buf),
        }
    }
}

fn pet_id(id: i64) -> PathParams {
    PathParams::single("petId", id)
}

async fn is_readable_file(path: &Path) -> bool {
    tokio::fs::File::open(path).await.is_ok()
        && tokio::fs::metadata(path)
            .await
            .is_ok_and(|metadata| metadata.is_file())
}
