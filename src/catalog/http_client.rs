use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::app::{Result, YomuError};
use crate::catalog::{AuthSession, CatalogClient};
use crate::config::ApiConfig;
use crate::domain::{Chapter, Title};

/// Page size for chapter list requests; the API caps feed requests at 500.
const CHAPTER_LIST_LIMIT: u32 = 500;

pub struct HttpCatalog {
    client: Client,
    base_url: Url,
    covers_url: Url,
    language: String,
    auth: Option<AuthSession>,
}

impl HttpCatalog {
    pub fn new(config: &ApiConfig, auth: Option<AuthSession>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("yomu/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            covers_url: Url::parse(&config.covers_url)?,
            language: config.language.clone(),
            auth,
        })
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let mut request = self.client.get(url).query(query);

        if let Some(auth) = &self.auth {
            request = request.bearer_auth(auth.bearer_token());
        }

        Ok(request.send().await?)
    }

    fn title_from(&self, data: MangaData) -> Title {
        let name =
            pick_localized(&data.attributes.title, &self.language).unwrap_or_default();
        let description = pick_localized(&data.attributes.description, &self.language);

        let cover_url = data
            .relationships
            .iter()
            .find(|r| r.kind == "cover_art")
            .and_then(|r| r.attributes.as_ref())
            .and_then(|a| a.file_name.as_deref())
            .and_then(|file| {
                self.covers_url
                    .join(&format!("/covers/{}/{}", data.id, file))
                    .ok()
            })
            .map(|u| u.to_string());

        Title {
            id: data.id,
            name,
            description,
            cover_url,
            status: data.attributes.status,
            year: data.attributes.year,
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn search_titles(&self, query: &str, limit: u32) -> Result<Vec<Title>> {
        let response = self
            .send(
                "/manga",
                &[
                    ("title", query.to_string()),
                    ("limit", limit.to_string()),
                    ("includes[]", "cover_art".to_string()),
                ],
            )
            .await?
            .error_for_status()?;

        let body: CollectionResponse<MangaData> = response.json().await?;
        Ok(body.data.into_iter().map(|d| self.title_from(d)).collect())
    }

    async fn popular_titles(&self, limit: u32) -> Result<Vec<Title>> {
        let response = self
            .send(
                "/manga",
                &[
                    ("order[rating]", "desc".to_string()),
                    ("limit", limit.to_string()),
                    ("includes[]", "cover_art".to_string()),
                ],
            )
            .await?
            .error_for_status()?;

        let body: CollectionResponse<MangaData> = response.json().await?;
        Ok(body.data.into_iter().map(|d| self.title_from(d)).collect())
    }

    async fn get_title(&self, title_id: &str) -> Result<Title> {
        let response = self
            .send(
                &format!("/manga/{}", title_id),
                &[("includes[]", "cover_art".to_string())],
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(YomuError::TitleNotFound(title_id.to_string()));
        }

        let body: EntityResponse<MangaData> = response.error_for_status()?.json().await?;
        Ok(self.title_from(body.data))
    }

    async fn get_chapter(&self, chapter_id: &str) -> Result<Chapter> {
        let response = self.send(&format!("/chapter/{}", chapter_id), &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(YomuError::ChapterUnavailable(chapter_id.to_string()));
        }

        let body: EntityResponse<ChapterData> = response.error_for_status()?.json().await?;
        Ok(chapter_from(body.data))
    }

    async fn get_chapter_pages(&self, chapter_id: &str) -> Result<Vec<String>> {
        let response = self
            .send(&format!("/at-home/server/{}", chapter_id), &[])
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(YomuError::ChapterUnavailable(chapter_id.to_string()));
        }

        let body: AtHomeResponse = response.error_for_status()?.json().await?;
        Ok(page_urls(&body))
    }

    async fn get_chapter_list(&self, title_id: &str) -> Result<Vec<Chapter>> {
        let response = self
            .send(
                &format!("/manga/{}/feed", title_id),
                &[
                    ("translatedLanguage[]", self.language.clone()),
                    ("order[chapter]", "asc".to_string()),
                    ("limit", CHAPTER_LIST_LIMIT.to_string()),
                ],
            )
            .await?
            .error_for_status()?;

        let body: CollectionResponse<ChapterData> = response.json().await?;
        Ok(body.data.into_iter().map(chapter_from).collect())
    }
}

fn chapter_from(data: ChapterData) -> Chapter {
    let title_id = data
        .relationships
        .iter()
        .find(|r| r.kind == "manga")
        .map(|r| r.id.clone());

    Chapter {
        id: data.id,
        title_id,
        volume: data.attributes.volume,
        number: data.attributes.chapter,
        name: data
            .attributes
            .title
            .map(|t| html_escape::decode_html_entities(&t).to_string()),
        pages: data.attributes.pages,
        translated_language: data.attributes.translated_language,
        published_at: data.attributes.publish_at,
    }
}

fn page_urls(body: &AtHomeResponse) -> Vec<String> {
    let base = body.base_url.trim_end_matches('/');
    body.chapter
        .data
        .iter()
        .map(|file| format!("{}/data/{}/{}", base, body.chapter.hash, file))
        .collect()
}

/// Resolve a localized string map: requested language first, then English,
/// then whatever the catalog has.
fn pick_localized(map: &BTreeMap<String, String>, language: &str) -> Option<String> {
    map.get(language)
        .or_else(|| map.get("en"))
        .or_else(|| map.values().next())
        .map(|s| html_escape::decode_html_entities(s).to_string())
}

// Raw API shapes. Everything public leaves this module as a domain type.

#[derive(Debug, Deserialize)]
struct CollectionResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct EntityResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct MangaData {
    id: String,
    attributes: MangaAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Deserialize)]
struct MangaAttributes {
    #[serde(default)]
    title: BTreeMap<String, String>,
    #[serde(default)]
    description: BTreeMap<String, String>,
    status: Option<String>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    attributes: Option<RelationshipAttributes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipAttributes {
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterData {
    id: String,
    attributes: ChapterAttributes,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterAttributes {
    volume: Option<String>,
    chapter: Option<String>,
    title: Option<String>,
    #[serde(default)]
    pages: u32,
    translated_language: Option<String>,
    publish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtHomeResponse {
    base_url: String,
    chapter: AtHomeChapter,
}

#[derive(Debug, Deserialize)]
struct AtHomeChapter {
    hash: String,
    #[serde(default)]
    data: Vec<String>,
}
