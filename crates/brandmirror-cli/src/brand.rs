//! Brand registration commands.

use brandmirror_core::BrandData;
use clap::Subcommand;

/// Sub-commands available under `brand`.
#[derive(Debug, Subcommand)]
pub enum BrandCommands {
    /// Register a brand, or update it if the slug already exists
    Add {
        /// URL-safe identifier used by every other command; derived from the name when omitted
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Free-text description of who the brand sells to
        #[arg(long)]
        target_audience: Option<String>,
    },
    /// List active brands
    List,
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: BrandCommands) -> anyhow::Result<()> {
    match command {
        BrandCommands::Add {
            slug,
            name,
            industry,
            location,
            target_audience,
        } => {
            let data = BrandData {
                name,
                industry,
                location,
                target_audience,
            };
            let slug = resolve_slug(slug, &data)?;
            let row = brandmirror_db::upsert_brand(pool, &slug, &data).await?;
            tracing::info!(brand_id = row.id, slug = %row.slug, "brand saved");
            println!("saved brand '{}' (id {})", row.slug, row.id);
        }
        BrandCommands::List => {
            let brands = brandmirror_db::list_active_brands(pool).await?;
            if brands.is_empty() {
                println!("no brands registered; run `brand add` first");
                return Ok(());
            }

            println!("{:<6}{:<24}{:<28}INDUSTRY", "ID", "SLUG", "NAME");
            for brand in &brands {
                println!(
                    "{:<6}{:<24}{:<28}{}",
                    brand.id,
                    brand.slug,
                    brand.name,
                    brand.industry.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

/// An explicit `--slug` wins; otherwise the slug is derived from the name.
pub(crate) fn resolve_slug(explicit: Option<String>, brand: &BrandData) -> anyhow::Result<String> {
    let slug = match explicit {
        Some(slug) => slug.trim().to_string(),
        None => brand.slug(),
    };
    if slug.is_empty() {
        anyhow::bail!("cannot derive a slug from '{}'; pass --slug", brand.name);
    }
    Ok(slug)
}
