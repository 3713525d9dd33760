use std::path::PathBuf;

use log::trace;

/// Finds the picture for a place among the files in the images directory.
///
/// Images are named after the place title, and several naming schemes have
/// been used over time, so a fixed list of candidates is tried in order. When
/// none exists the page simply shows no image.
#[derive(Clone, Debug)]
pub struct ImageResolver {
    dir: PathBuf,
    url_prefix: String,
}

impl ImageResolver {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str) -> ImageResolver {
        ImageResolver {
            dir: dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_owned(),
        }
    }

    pub fn resolve(&self, title: &str) -> Option<String> {
        let found = candidates(title)
            .into_iter()
            .find(|file| self.dir.join(file).is_file())?;
        trace!("Resolved image for {:?}: {}", title, found);
        Some(format!("{}/{}", self.url_prefix, found.replace(' ', "%20")))
    }
}

/// Strip everything but ASCII letters, digits and whitespace.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_owned()
}

/// The name the backend stores an upload under: whitespace becomes `_` and
/// only ASCII letters, digits, `_`, `.` and `-` survive.
pub fn upload_name(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_owned()
}

/// The file names tried for a title, most likely first.
pub fn candidates(title: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    let mut push = |stem: &str, exts: &[&str]| {
        for ext in exts {
            let file = format!("{}.{}", stem, ext);
            if !files.contains(&file) {
                files.push(file);
            }
        }
    };

    let clean = sanitize_title(title);
    if !clean.is_empty() {
        push(&clean, &["png", "jpg", "jpeg"]);
    }

    let uploaded = upload_name(title);
    if !uploaded.is_empty() {
        push(&uploaded, &["png", "jpg", "jpeg", "gif"]);
    }

    if is_path_safe(title) {
        push(title, &["png", "jpg"]);
    }

    files
}

fn is_path_safe(title: &str) -> bool {
    !title.is_empty()
        && !title.starts_with('.')
        && title
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
}
