//! # Skip List Module
//!
//! Operator-configured path fragments that protect files from deletion.
//! A removal candidate with any file path containing a fragment (ignoring
//! case) is never deleted, whatever its score.

/// Case-insensitive substrings that veto deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    fragments: Vec<String>,
}

impl SkipList {
    /// Blank entries are dropped; they would otherwise match every path.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .filter(|f| !f.trim().is_empty())
                .collect(),
        }
    }

    /// The first fragment found in any of `files`
    pub fn matching_fragment<S: AsRef<str>>(&self, files: &[S]) -> Option<&str> {
        files.iter().find_map(|file| {
            let file = file.as_ref().to_lowercase();
            self.fragments
                .iter()
                .find(|fragment| file.contains(fragment.as_str()))
                .map(String::as_str)
        })
    }

    /// True when deletion of a candidate with these files must not happen
    pub fn vetoes<S: AsRef<str>>(&self, files: &[S]) -> bool {
        self.matching_fragment(files).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_never_vetoes() {
        let list = SkipList::default();
        assert!(!list.vetoes(&["/movies/Heat.mkv"]));
    }

    #[test]
    fn match_ignores_case() {
        let list = SkipList::new(["/Archive/"]);
        assert!(list.vetoes(&["/mnt/ARCHIVE/Heat.mkv"]));
        assert!(!list.vetoes(&["/mnt/archives-old/Heat.mkv"]));
    }

    #[test]
    fn any_part_of_a_multipart_item_vetoes() {
        let list = SkipList::new(["keep-forever"]);
        let files = ["/movies/Film.cd1.avi", "/movies/keep-forever/Film.cd2.avi"];
        assert!(list.vetoes(&files));
        assert_eq!(list.matching_fragment(&files), Some("keep-forever"));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let list = SkipList::new(["", "   "]);
        assert!(list.is_empty());
        assert!(!list.vetoes(&["/movies/Heat.mkv"]));
    }

    #[test]
    fn candidate_without_files_is_not_vetoed() {
        let list = SkipList::new(["anything"]);
        let files: [&str; 0] = [];
        assert!(!list.vetoes(&files));
    }
}
