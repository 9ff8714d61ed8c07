use std::path::Path;

use autoscore_core::{CanonicalNames, CatalogPath};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{log_scope_stats, open_scope, runtime};

pub(crate) fn run_brand(db_path: Option<&Path>, slug: &str) -> Result<(), CliError> {
    let scope = open_scope(db_path)?;
    let brand = runtime()?.block_on(scope.resolve_brand(slug));
    match brand {
        Some(brand) => log::info!(
            "{} -> {}",
            slug,
            brand.if_supports_color(Stdout, |t| t.green()),
        ),
        None => log::info!("{}: no brand", slug.if_supports_color(Stdout, |t| t.dimmed())),
    }
    log_scope_stats(&scope);
    Ok(())
}

pub(crate) fn run_context(db_path: Option<&Path>, slug: &str) -> Result<(), CliError> {
    let scope = open_scope(db_path)?;
    let Some(ctx) = runtime()?.block_on(scope.resolve_context(slug)) else {
        log::info!("{}: not found", slug.if_supports_color(Stdout, |t| t.dimmed()));
        return Ok(());
    };

    log::info!("{}", ctx.original_slug.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Brand:   {}", ctx.real_brand);
    log::info!("  Family:  {}", ctx.real_family);
    log::info!("  Year:    {}", ctx.model_year);
    log::info!("  Model:   {}", ctx.real_model);
    log_scope_stats(&scope);
    Ok(())
}

pub(crate) fn run_path(db_path: Option<&Path>, segments: &[String]) -> Result<(), CliError> {
    let path = CatalogPath::from_segments(segments).ok_or_else(|| {
        CliError::invalid_argument("expected <brand> <family> [year] [model] [powertrain]")
    })?;
    let scope = open_scope(db_path)?;
    let Some(names) = runtime()?.block_on(scope.resolve_path(&path)) else {
        log::info!(
            "{}: not found",
            segments.join("/").if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    };

    log::info!("{}", segments.join("/").if_supports_color(Stdout, |t| t.bold()));
    print_names(&names);
    log_scope_stats(&scope);
    Ok(())
}

fn print_names(names: &CanonicalNames) {
    let fields = [
        ("Brand", &names.brand),
        ("Family", &names.family),
        ("Model", &names.model),
        ("Powertrain", &names.powertrain),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            log::info!("  {:<11} {}", format!("{label}:"), value);
        }
    }
}

pub(crate) fn run_families(db_path: Option<&Path>, brand_slug: &str) -> Result<(), CliError> {
    let scope = open_scope(db_path)?;
    let families = runtime()?.block_on(scope.families_for_brand(brand_slug));
    if families.is_empty() {
        log::info!("No families for '{brand_slug}'");
        return Ok(());
    }

    for family in &families {
        log::info!(
            "  {:<24} {:>5} review(s)",
            family.family,
            family.review_count.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    log_scope_stats(&scope);
    Ok(())
}
