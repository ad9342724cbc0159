/// Derives the id of a recommendation from its title, year and position in the batch.
///
/// The id is `title-year-ordinal`, lowercased, with every whitespace run collapsed
/// into a single hyphen. Deterministic and cheap; uniqueness only holds within one batch.
pub fn assign_id(title: &str, year: i32, ordinal: usize) -> String {
    let raw = format!("{}-{}-{}", title, year, ordinal).to_lowercase();

    let mut id = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.push(c);
            in_whitespace = false;
        }
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_id_is_deterministic() {
        assert_eq!(assign_id("Inception", 2010, 0), assign_id("Inception", 2010, 0));
        assert_eq!(assign_id("Inception", 2010, 0), "inception-2010-0");
    }

    #[test]
    fn test_assign_id_depends_on_ordinal() {
        assert_ne!(assign_id("Inception", 2010, 0), assign_id("Inception", 2010, 1));
    }

    #[test]
    fn test_assign_id_collapses_whitespace_runs() {
        assert_eq!(
            assign_id("The  Secret Life\tof Walter Mitty", 2013, 2),
            "the-secret-life-of-walter-mitty-2013-2"
        );
    }

    #[test]
    fn test_assign_id_degenerate_title() {
        assert_eq!(assign_id("   ", 1999, 0), "--1999-0");
        assert_eq!(assign_id("?!", 1999, 1), "?!-1999-1");
    }
}
