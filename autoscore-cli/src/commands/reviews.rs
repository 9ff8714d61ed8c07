use std::path::Path;

use autoscore_core::{ReviewRecord, ReviewSummary};
use autoscore_lib::DuelPair;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{log_scope_stats, open_scope, runtime};

pub(crate) fn run_reviews(db_path: Option<&Path>, slugs: &[String]) -> Result<(), CliError> {
    let scope = open_scope(db_path)?;
    let buckets = runtime()?.block_on(scope.reviews_batch(slugs));

    for (slug, reviews) in &buckets {
        print_bucket(slug, reviews);
    }
    log_scope_stats(&scope);
    Ok(())
}

pub(crate) fn run_duel(db_path: Option<&Path>, segment: &str) -> Result<(), CliError> {
    let pair = DuelPair::parse(segment)
        .ok_or_else(|| CliError::invalid_argument(format!("'{segment}' is not of the form a-vs-b")))?;
    let scope = open_scope(db_path)?;
    let duel = runtime()?.block_on(scope.duel(&pair));

    print_bucket(pair.left(), &duel.left);
    print_bucket(pair.right(), &duel.right);

    let left = ReviewSummary::from_reviews(&duel.left).best_score;
    let right = ReviewSummary::from_reviews(&duel.right).best_score;
    if let (Some(l), Some(r)) = (left, right) {
        let leader = if l >= r { pair.left() } else { pair.right() };
        log::info!("Best score: {}", leader.if_supports_color(Stdout, |t| t.green()));
    }
    log_scope_stats(&scope);
    Ok(())
}

fn print_bucket(slug: &str, reviews: &[ReviewRecord]) {
    let summary = ReviewSummary::from_reviews(reviews);
    if summary.count == 0 {
        log::info!(
            "{} {}",
            slug.if_supports_color(Stdout, |t| t.bold()),
            "(no reviews)".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    log::info!(
        "{} ({} review(s){})",
        slug.if_supports_color(Stdout, |t| t.bold()),
        summary.count,
        match (summary.best_score, summary.mean_score) {
            (Some(best), Some(mean)) => format!(", best {best:.1}, mean {mean:.1}"),
            _ => String::new(),
        },
    );
    for review in reviews {
        let date = review
            .test_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        let score = review
            .score
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "  {}  {:>4}  {} {} {} {} {}",
            date,
            score.if_supports_color(Stdout, |t| t.cyan()),
            review.brand,
            review.family,
            review.model_year,
            review.model,
            review.trim.as_deref().unwrap_or(""),
        );
    }
}
