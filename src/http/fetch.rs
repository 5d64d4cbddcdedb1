use once_cell::sync::Lazy;
use reqwest::IntoUrl;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// A global instance of the reqwest Client, shared by every request the
/// crate makes.
static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Performs a GET request and deserializes the JSON response body.
pub async fn fetch_json<T: DeserializeOwned>(url: impl IntoUrl) -> crate::Result<T> {
    let url = url.into_url()?;
    let response = CLIENT.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(Error::Download {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(response.json::<T>().await?)
}

/// Performs a GET request and returns the raw response body as text.
///
/// Used for non-JSON endpoints such as maven-metadata.xml.
pub async fn fetch_text(url: impl IntoUrl) -> crate::Result<String> {
    let url = url.into_url()?;
    let response = CLIENT.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(Error::Download {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(response.text().await?)
}
