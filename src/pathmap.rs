/// Rewrites catalog-stored locations into paths the SCP host understands.
/// The catalog records where the library's own machine mounted the share;
/// the file server exposes the same tree under a different root.
pub struct PathMapping {
    pub find: String,
    pub replace_with: String,
}

/// Replaces the first literal occurrence of the configured prefix. A path
/// that does not contain the prefix passes through unchanged; some library
/// entries already carry server-side paths.
pub fn translate(path: &str, mapping: &PathMapping) -> String {
    path.replacen(&mapping.find, &mapping.replace_with, 1)
}

/// Final path segment, used as the attachment filename. Catalog locations
/// may use either separator depending on which machine wrote them.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> PathMapping {
        PathMapping {
            find: "M:/Music".to_string(),
            replace_with: "/mnt/music".to_string(),
        }
    }

    #[test]
    fn replaces_prefix_once() {
        assert_eq!(
            translate("M:/Music/Artist/Album/01 Song.m4a", &mapping()),
            "/mnt/music/Artist/Album/01 Song.m4a"
        );
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        assert_eq!(
            translate("M:/Music/M:/Music/a.m4a", &mapping()),
            "/mnt/music/M:/Music/a.m4a"
        );
    }

    #[test]
    fn path_without_prefix_passes_through() {
        let path = "/srv/other/b.flac";
        assert_eq!(translate(path, &mapping()), path);
    }

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(file_name("/mnt/music/Album/My Song.m4a"), "My Song.m4a");
        assert_eq!(file_name("M:\\Music\\Album\\My Song.m4a"), "My Song.m4a");
        assert_eq!(file_name("bare.m4a"), "bare.m4a");
    }
}
