//! Structural validation of an uploaded table's header row.

/// Report the required columns missing from `columns`.
///
/// Returns at most one message, naming `label` and the missing columns in
/// the order they are listed in `required`. An empty result means every
/// required column is present.
pub fn validate<S: AsRef<str>>(columns: &[S], required: &[&str], label: &str) -> Vec<String> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|req| !columns.iter().any(|c| c.as_ref() == *req))
        .collect();

    if missing.is_empty() {
        Vec::new()
    } else {
        vec![format!("{} is missing columns: {}", label, missing.join(", "))]
    }
}
