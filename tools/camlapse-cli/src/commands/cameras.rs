//! List cameras.

use camlapse_timelapse_core::CameraService;

use super::Context;

pub async fn run(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let cameras = ctx.client()?.list_cameras(&session).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cameras)?);
        return Ok(());
    }

    if cameras.is_empty() {
        println!("No cameras visible to this account.");
        return Ok(());
    }

    for (label, group) in [("Owned", &cameras.owned), ("Subscribed", &cameras.subscribed)] {
        if group.is_empty() {
            continue;
        }
        println!("{label}:");
        for camera in group {
            println!("  {:<36}  {}", camera.uuid, camera.title);
        }
    }
    Ok(())
}
