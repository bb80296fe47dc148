//! Display-name assembly shared by user, post, and comment records.

/// Joins name parts into a display name.
///
/// Trims each part, drops empty ones, and joins the rest with single
/// spaces. Returns `None` when every part is empty or missing.
pub(crate) fn assemble_name<'a, I>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!joined.is_empty()).then_some(joined)
}
