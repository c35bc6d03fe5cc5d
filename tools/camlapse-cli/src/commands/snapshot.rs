//! Save a single still image.

use std::path::PathBuf;

use camlapse_common::clock::EpochSecs;
use camlapse_timelapse_core::CameraService;

use super::Context;

pub async fn run(
    ctx: &Context,
    camera: String,
    path: PathBuf,
    time: Option<EpochSecs>,
    width: Option<u32>,
) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let client = ctx.client()?;
    let camera = ctx.camera(&client, &session, &camera).await?;
    let width = width.unwrap_or(ctx.config.timelapse.image_width);

    let image = client
        .fetch_image(&session, &camera.uuid, time, width)
        .await?
        .ok_or_else(|| anyhow::anyhow!("{camera} returned no image"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &image)?;
    println!("Saved {} bytes to {}", image.len(), path.display());
    Ok(())
}
