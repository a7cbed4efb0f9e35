//! Image tag composition
//!
//! Turns a registry URL, an image name and a list of tag names into
//! fully-qualified image references: `[<registry>/]<image>:<tag>`.

/// Tag used when none is given
pub const DEFAULT_TAG: &str = "latest";

/// Composes one fully-qualified tag per tag name, keeping their order
///
/// An empty `tag_names` behaves as `["latest"]`.
pub fn compose_tags<S: AsRef<str>>(
    registry_url: &str,
    image_name: &str,
    tag_names: &[S],
) -> Vec<String> {
    if tag_names.is_empty() {
        return vec![compose_tag(registry_url, image_name, DEFAULT_TAG)];
    }

    tag_names
        .iter()
        .map(|tag| compose_tag(registry_url, image_name, tag.as_ref()))
        .collect()
}

/// Composes a single fully-qualified tag
///
/// An empty tag name becomes `latest`. A non-empty registry URL is joined to
/// the image name with exactly one `/`.
pub fn compose_tag(registry_url: &str, image_name: &str, tag_name: &str) -> String {
    let tag = if tag_name.is_empty() {
        DEFAULT_TAG
    } else {
        tag_name
    };

    if registry_url.is_empty() {
        format!("{}:{}", image_name, tag)
    } else if registry_url.ends_with('/') {
        format!("{}{}:{}", registry_url, image_name, tag)
    } else {
        format!("{}/{}:{}", registry_url, image_name, tag)
    }
}
