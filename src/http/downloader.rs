use std::path::Path;

use futures_util::StreamExt;
use log::debug;
use reqwest::IntoUrl;
use tokio::{
    fs::{create_dir_all, File},
    io::AsyncWriteExt,
};

use crate::error::Error;
use crate::minecraft::progress::ProgressState;

/// Downloads a file from the given URL and writes it to `destination`,
/// streaming the body chunk by chunk.
///
/// Progress is reported through the threaded [`ProgressState`]: the total
/// size (when the server announces one) via `set_max` and the running byte
/// count via `set_progress`. Parent directories are created as needed.
pub async fn download(
    url: impl IntoUrl,
    destination: impl AsRef<Path>,
    progress: &mut ProgressState<'_>,
) -> crate::Result<()> {
    let url = url.into_url()?;
    let response = reqwest::get(url.clone()).await?;
    if !response.status().is_success() {
        return Err(Error::Download {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    if let Some(parent) = destination.as_ref().parent() {
        if !parent.is_dir() {
            create_dir_all(parent).await?;
        }
    }

    debug!("downloading {} -> {}", url, destination.as_ref().display());
    progress.set_max(total_size as usize);

    let mut file = File::create(&destination).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        downloaded += chunk.len() as u64;
        file.write_all(&chunk).await?;
        progress.set_progress(downloaded as usize);
    }

    Ok(())
}
