use serde::Serialize;

/// Number of stars on the display scale
pub const MAX_STARS: u8 = 5;

/// A rating string normalized onto a 5-star display scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarRating {
    /// Leading number parsed out of the rating string
    pub raw: f64,
    /// Value on the 5-unit scale, before rounding
    pub out_of_five: f64,
}

impl StarRating {
    /// Parses a free-form rating such as "8.6/10" or "4.2".
    ///
    /// Values above 5 are read as out-of-10 and halved. Returns `None` when
    /// the string does not start with a number (e.g. "N/A").
    pub fn from_rating_str(rating: &str) -> Option<Self> {
        let raw = parse_leading_decimal(rating)?;
        let out_of_five = if raw > f64::from(MAX_STARS) { raw / 2.0 } else { raw };

        Some(Self { raw, out_of_five })
    }

    /// Filled stars, rounded to the nearest whole unit
    pub fn filled(&self) -> u8 {
        self.out_of_five.round().clamp(0.0, f64::from(MAX_STARS)) as u8
    }

    pub fn max(&self) -> u8 {
        MAX_STARS
    }
}

/// Extracts the leading decimal number from a string, ignoring leading whitespace
fn parse_leading_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    trimmed[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_ten_is_halved() {
        let rating = StarRating::from_rating_str("8.6/10").unwrap();
        assert_eq!(rating.raw, 8.6);
        assert!((rating.out_of_five - 4.3).abs() < f64::EPSILON);
        assert_eq!(rating.filled(), 4);
        assert_eq!(rating.max(), 5);
    }

    #[test]
    fn test_five_point_scale_is_kept() {
        let rating = StarRating::from_rating_str("4.2").unwrap();
        assert_eq!(rating.out_of_five, 4.2);
        assert_eq!(rating.filled(), 4);
    }

    #[test]
    fn test_unparseable_rating_has_no_stars() {
        assert_eq!(StarRating::from_rating_str("N/A"), None);
        assert_eq!(StarRating::from_rating_str(""), None);
        assert_eq!(StarRating::from_rating_str("."), None);
    }

    #[test]
    fn test_rounding_to_nearest_star() {
        assert_eq!(StarRating::from_rating_str("7/10").unwrap().filled(), 4);
        assert_eq!(StarRating::from_rating_str("9.2").unwrap().filled(), 5);
        assert_eq!(StarRating::from_rating_str("2.4").unwrap().filled(), 2);
        assert_eq!(StarRating::from_rating_str("5").unwrap().filled(), 5);
    }

    #[test]
    fn test_leading_number_with_whitespace_and_suffix() {
        assert_eq!(parse_leading_decimal("  7.5 out of 10"), Some(7.5));
        assert_eq!(parse_leading_decimal("8."), Some(8.0));
        assert_eq!(parse_leading_decimal(".5"), Some(0.5));
        assert_eq!(parse_leading_decimal("-"), None);
    }

    #[test]
    fn test_hundred_point_scale_is_clamped() {
        let rating = StarRating::from_rating_str("87/100").unwrap();
        assert_eq!(rating.out_of_five, 43.5);
        assert_eq!(rating.filled(), 5);
    }
}
