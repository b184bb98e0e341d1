use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::Quote;

/// All quotes ordered by vote count, highest first. The sort is stable, so
/// quotes with equal votes keep their original (insertion) order across
/// repeated calls.
pub fn ranked(quotes: &[Quote]) -> Vec<Quote> {
    let mut out = quotes.to_vec();
    out.sort_by(|a, b| b.votes.cmp(&a.votes));
    out
}

/// Case-insensitive substring match against quote text. An empty query
/// deliberately returns an empty result set rather than the full
/// collection, matching the clear-on-empty behavior of the search view.
pub fn search(quotes: &[Quote], query: &str) -> Vec<Quote> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    quotes
        .iter()
        .filter(|quote| quote.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Two quotes drawn uniformly without replacement, fewer if the collection
/// holds fewer than two. Session vote history is deliberately ignored here;
/// filtering already-voted quotes is the display layer's job.
pub fn quiz_pair<R: Rng + ?Sized>(quotes: &[Quote], rng: &mut R) -> Vec<Quote> {
    quotes.choose_multiple(rng, 2).cloned().collect()
}

/// One uniformly random quote, if any exist.
pub fn random_quote<R: Rng + ?Sized>(quotes: &[Quote], rng: &mut R) -> Option<Quote> {
    quotes.choose(rng).cloned()
}
