//! DTOs for decoding Google Books `volumes` responses.
//!
//! Only the fields the reading tracker shows are decoded; everything else in
//! `volumeInfo` is ignored.

use serde::Deserialize;

use crate::domain::{CatalogVolume, ExternalVolumeId};

#[derive(Debug, Deserialize)]
pub(super) struct VolumeListDto {
    #[serde(default)]
    pub(super) items: Vec<VolumeDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VolumeDto {
    pub(super) id: String,
    #[serde(rename = "volumeInfo", default)]
    pub(super) volume_info: VolumeInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeInfoDto {
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) authors: Vec<String>,
    pub(super) description: Option<String>,
    pub(super) publisher: Option<String>,
    pub(super) published_date: Option<String>,
    pub(super) page_count: Option<i32>,
    pub(super) image_links: Option<ImageLinksDto>,
    #[serde(default)]
    pub(super) industry_identifiers: Vec<IndustryIdentifierDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageLinksDto {
    pub(super) thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IndustryIdentifierDto {
    pub(super) identifier: String,
}

impl VolumeListDto {
    /// Map every item, skipping volumes without a usable id or title.
    pub(super) fn into_domain_volumes(self) -> Vec<CatalogVolume> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.clone();
                match item.into_domain_volume() {
                    Ok(volume) => Some(volume),
                    Err(reason) => {
                        tracing::debug!(volume_id = %id, %reason, "skipping catalog volume");
                        None
                    }
                }
            })
            .collect()
    }
}

impl VolumeDto {
    pub(super) fn into_domain_volume(self) -> Result<CatalogVolume, String> {
        let volume_id = ExternalVolumeId::new(self.id).map_err(|err| err.to_string())?;
        let info = self.volume_info;
        let title = info
            .title
            .map(|title| title.trim().to_owned())
            .filter(|title| !title.is_empty())
            .ok_or_else(|| format!("volume {} has no title", volume_id.as_str()))?;

        Ok(CatalogVolume {
            volume_id,
            title,
            authors: info.authors,
            description: info.description,
            thumbnail: info
                .image_links
                .and_then(|links| links.thumbnail)
                .map(|url| secure_thumbnail(&url)),
            page_count: info.page_count,
            publisher: info.publisher,
            published_date: info.published_date,
            isbn: info
                .industry_identifiers
                .into_iter()
                .next()
                .map(|id| id.identifier),
        })
    }
}

/// Thumbnails are served over plain HTTP by default; browsers block mixed content.
fn secure_thumbnail(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_owned(),
    }
}
