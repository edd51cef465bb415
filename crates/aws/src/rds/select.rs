use super::option::OrderableOption;
use crate::error::AwsProviderError;

/// Keep only options whose storage type equals `storage_type` exactly.
pub fn retain_storage_type(
    mut options: Vec<OrderableOption>,
    storage_type: Option<&str>,
) -> Vec<OrderableOption> {
    if let Some(wanted) = storage_type {
        options.retain(|o| o.storage_type.as_deref() == Some(wanted));
    }
    options
}

/// Pick exactly one option out of `candidates`.
///
/// The first entry of `preferred` that appears anywhere among the candidates
/// wins. If several candidates share that class, the last one received is
/// used. Without a preference hit, a lone candidate is accepted and anything
/// more is ambiguous.
pub fn select_option(
    mut candidates: Vec<OrderableOption>,
    preferred: &[String],
) -> Result<OrderableOption, AwsProviderError> {
    if candidates.is_empty() {
        return Err(AwsProviderError::NoMatchingOptions);
    }

    let preferred_index = preferred.iter().find_map(|class| {
        candidates
            .iter()
            .rposition(|c| c.db_instance_class == *class)
    });
    if let Some(index) = preferred_index {
        return Ok(candidates.swap_remove(index));
    }

    if candidates.len() == 1 {
        return candidates.pop().ok_or(AwsProviderError::NoMatchingOptions);
    }

    Err(AwsProviderError::AmbiguousOptions(
        candidates.into_iter().map(|c| c.db_instance_class).collect(),
    ))
}
