/// Keep at most `limit` items; `None` keeps everything.
#[must_use]
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok()) {
        items.truncate(limit);
    }
    items
}
