//! List a camera's events.

use camlapse_common::clock::{format_epoch, EpochSecs};
use camlapse_timelapse_core::{filter_events, CameraService, EventFilter};

use super::Context;

pub async fn run(
    ctx: &Context,
    camera: String,
    start: Option<EpochSecs>,
    end: Option<EpochSecs>,
    motion_only: bool,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let client = ctx.client()?;
    let camera = ctx.camera(&client, &session, &camera).await?;

    let mut events = client
        .list_events(&session, &camera.uuid, start, end)
        .await?;
    if motion_only {
        let filter = EventFilter {
            start_time: start,
            end_time: end,
            ..EventFilter::default()
        };
        events = filter_events(&events, &filter);
    } else {
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
    if let Some(limit) = limit {
        events.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    println!("{camera}: {} events", events.len());
    for event in &events {
        println!(
            "  {:<26} {:<9} {:<12} {}",
            format_epoch(event.time),
            format!("{:?}", event.kind).to_lowercase(),
            event.id,
            event.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
