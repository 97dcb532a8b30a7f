//! Commonly used code.

/// Overlap test between two 1-based inclusive genomic regions.
///
/// Degenerate regions (`start > end`) never overlap anything; the junction
/// band arithmetic relies on this for introns shorter than the band width.
pub fn regions_overlap(r1_start: i32, r1_end: i32, r2_start: i32, r2_end: i32) -> bool {
    std::cmp::max(r1_start, r2_start) <= std::cmp::min(r1_end, r2_end)
}

/// Whether `chromosome` names the mitochondrial genome.
pub fn is_mitochondrial(chromosome: &str) -> bool {
    matches!(
        chromosome.strip_prefix("chr").unwrap_or(chromosome),
        "MT" | "M"
    )
}

/// The version of the `gerenuk` package.
#[cfg(not(test))]
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// This allows us to override the version to `0.0.0` in tests.
pub fn version() -> &'static str {
    #[cfg(test)]
    return "0.0.0";
    #[cfg(not(test))]
    return VERSION;
}
