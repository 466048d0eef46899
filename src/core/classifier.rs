use crate::domain::model::{TrackedLanguage, TrackedLanguages};

/// Languages whose name occurs in `title`, compared case-insensitively.
///
/// A title may match several languages ("JavaScript" also contains "Java")
/// and the posting counts toward each of them.
pub fn classify<'a>(title: &str, languages: &'a TrackedLanguages) -> Vec<&'a TrackedLanguage> {
    let title = title.to_lowercase();
    languages
        .iter_lowered()
        .filter(|(_, needle)| title.contains(needle))
        .map(|(language, _)| language)
        .collect()
}
