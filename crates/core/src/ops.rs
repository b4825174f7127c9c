//! Bucket operations built on [`ObjectStore`]
//!
//! Listing walks pages lazily and hands each key to the caller as it
//! arrives. A filtered delete runs [`collect_matching`] to completion before
//! [`delete_keys`] submits anything, in batches no larger than the store
//! accepts.

use std::collections::HashSet;

use futures::{Stream, TryStreamExt, stream};

use crate::error::{Error, Result};
use crate::filter::KeyFilter;
use crate::traits::{DeleteOutcome, ObjectPage, ObjectStore};

/// Lazily fetch every page under `prefix`
///
/// Each call starts a fresh traversal from the first page. The stream ends
/// when the store returns a page without a continuation token.
pub fn pages<'a>(
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    prefix: &'a str,
) -> impl Stream<Item = Result<ObjectPage>> + 'a {
    stream::try_unfold(Some(None::<String>), move |state| async move {
        let Some(token) = state else {
            return Ok(None);
        };
        let page = store.list_page(bucket, prefix, token).await?;
        tracing::debug!(
            bucket,
            prefix,
            keys = page.keys.len(),
            more = page.continuation_token.is_some(),
            "fetched page"
        );
        let next = page.continuation_token.clone().map(Some);
        Ok::<_, Error>(Some((page, next)))
    })
}

/// Visit every key under `prefix` that passes `filter`, in provider order
///
/// Returns the number of keys visited.
pub async fn for_each_key<F>(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    filter: Option<&KeyFilter>,
    mut visit: F,
) -> Result<usize>
where
    F: FnMut(&str),
{
    let mut visited = 0;
    let mut listing = Box::pin(pages(store, bucket, prefix));
    while let Some(page) = listing.try_next().await? {
        for key in page
            .keys
            .iter()
            .filter(|k| filter.is_none_or(|f| f.matches(k)))
        {
            visit(key);
            visited += 1;
        }
    }
    Ok(visited)
}

/// Collect every key under `prefix` matching `filter`
pub async fn collect_matching(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    filter: &KeyFilter,
) -> Result<Vec<String>> {
    let mut matched = Vec::new();
    for_each_key(store, bucket, prefix, Some(filter), |key| {
        matched.push(key.to_string())
    })
    .await?;
    Ok(matched)
}

/// Delete `keys` in sequential batches of at most `store.max_delete_batch()`
///
/// An empty slice issues no request. Only keys from the submitted batch are
/// counted as deleted. If a batch fails after earlier batches were answered,
/// the error is wrapped in [`Error::PartialDelete`] carrying everything those
/// batches reported, confirmed and failed keys alike.
pub async fn delete_keys(
    store: &dyn ObjectStore,
    bucket: &str,
    keys: &[String],
) -> Result<DeleteOutcome> {
    let mut outcome = DeleteOutcome::default();
    if keys.is_empty() {
        return Ok(outcome);
    }

    let batch_size = store.max_delete_batch().max(1);
    for (index, chunk) in keys.chunks(batch_size).enumerate() {
        tracing::debug!(bucket, batch = index, size = chunk.len(), "submitting delete batch");
        match store.delete_batch(bucket, chunk).await {
            Ok(mut batch) => {
                // Confirmed keys outside the submitted chunk are dropped.
                let submitted: HashSet<&str> = chunk.iter().map(String::as_str).collect();
                batch.deleted.retain(|k| submitted.contains(k.as_str()));
                for failure in &batch.failed {
                    tracing::debug!(
                        key = %failure.key,
                        code = failure.code.as_deref().unwrap_or("unknown"),
                        "provider did not delete object"
                    );
                }
                outcome.merge(batch);
            }
            Err(e) if index == 0 => return Err(e),
            Err(e) => {
                return Err(Error::PartialDelete {
                    outcome,
                    source: Box::new(e),
                });
            }
        }
    }
    Ok(outcome)
}
