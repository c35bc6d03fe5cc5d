//! Session login and logout.

use super::Context;

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let provider = ctx.session_provider();
    // An explicit login always replaces the cached token.
    provider.clear()?;
    let session = ctx.session().await?;

    println!(
        "Logged in ({} cookies cached in {})",
        session.cookies().len(),
        provider.cache_path().display()
    );
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    let provider = ctx.session_provider();
    if provider.clear()? {
        println!("Removed {}", provider.cache_path().display());
    } else {
        println!("No cached session at {}", provider.cache_path().display());
    }
    Ok(())
}
