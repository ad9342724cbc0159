use crate::models::{Movie, SavedMovie};

/// The user's saved movies, in the order they were added.
///
/// Membership is keyed by [`Movie::id`] only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    movies: Vec<SavedMovie>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from stored entries, dropping duplicate ids
    pub fn from_saved(saved: Vec<SavedMovie>) -> Self {
        let mut selection = Self::new();
        for entry in saved {
            if !selection.contains(entry.id()) {
                selection.movies.push(entry);
            }
        }
        selection
    }

    /// Removes the movie if a member has the same id, otherwise adds it.
    ///
    /// Returns `true` when the movie is selected afterwards.
    pub fn toggle(&mut self, movie: Movie) -> bool {
        if self.remove(&movie.id) {
            false
        } else {
            self.movies.push(SavedMovie::new(movie));
            true
        }
    }

    /// Removes the member with `id`, returning whether one was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.movies.len();
        self.movies.retain(|saved| saved.id() != id);
        self.movies.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|saved| saved.id() == id)
    }

    pub fn movies(&self) -> &[SavedMovie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            year: 2016,
            genre: "Drama".to_string(),
            reason: "Fits.".to_string(),
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = Selection::new();
        let a = movie("a-2016-0", "A");

        assert!(selection.toggle(a.clone()));
        assert!(selection.contains("a-2016-0"));

        assert!(!selection.toggle(a));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_remove_by_id_leaves_other_members() {
        let mut selection = Selection::new();
        selection.toggle(movie("a-2016-0", "A"));
        selection.toggle(movie("b-2016-1", "B"));

        assert!(selection.remove("a-2016-0"));

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.movies()[0].movie.title, "B");
        assert!(!selection.remove("a-2016-0"));
    }

    #[test]
    fn test_toggle_matches_by_id_not_fields() {
        let mut selection = Selection::new();
        selection.toggle(movie("a-2016-0", "A"));

        // Same id with different fields still counts as the same member
        assert!(!selection.toggle(movie("a-2016-0", "Renamed")));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut selection = Selection::new();
        selection.toggle(movie("c", "C"));
        selection.toggle(movie("a", "A"));
        selection.toggle(movie("b", "B"));

        let ids: Vec<&str> = selection.movies().iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_from_saved_drops_duplicate_ids() {
        let saved = vec![
            SavedMovie::new(movie("a", "A")),
            SavedMovie::new(movie("a", "A again")),
            SavedMovie::new(movie("b", "B")),
        ];

        let selection = Selection::from_saved(saved);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.movies()[0].movie.title, "A");
    }
}
