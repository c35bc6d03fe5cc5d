//! Check encoder availability and session state.

use camlapse_encoder::{Encoder, FfmpegEncoder};

use super::Context;

pub async fn run(ctx: &Context, write_config: bool) -> anyhow::Result<()> {
    println!("camlapse System Check");
    println!("{}", "=".repeat(50));

    let encoder = FfmpegEncoder::from_config(&ctx.config.encoder);
    let encoder_ok = encoder.is_available().await;
    if encoder_ok {
        println!("[OK] Encoder: {}", encoder.name());
    } else {
        println!("[MISSING] Encoder: {}", encoder.name());
        println!("     Install it: {}", encoder.install_hint());
    }

    let provider = ctx.session_provider();
    match provider.load_cached()? {
        Some(session) => println!(
            "[OK] Session: {} cookies cached in {}",
            session.cookies().len(),
            provider.cache_path().display()
        ),
        None => println!(
            "[WARN] Session: none cached at {} (run `camlapse login`)",
            provider.cache_path().display()
        ),
    }

    if ctx.config_path.exists() {
        println!("[OK] Config: {}", ctx.config_path.display());
    } else {
        println!("[INFO] Config: defaults ({} not found)", ctx.config_path.display());
    }
    if write_config {
        ctx.config.save_to(&ctx.config_path)?;
        println!("     Wrote {}", ctx.config_path.display());
    }

    println!();
    if encoder_ok {
        println!("Ready to build time-lapses.");
    } else {
        println!("The encoder is missing. See above for a fix.");
    }

    Ok(())
}
