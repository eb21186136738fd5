use chrono::{DateTime, Utc};

use crate::models::Review;

/// Long-form date, e.g. `January 5, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Mean rating rounded to one decimal; 0 when there are no reviews.
///
/// Display only. The book's `avg_rating` from the backend is authoritative.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(total) / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Cuts `text` to `max_chars` characters and appends `...` if it was longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::{BookRef, ReviewAuthor};
    use chrono::TimeZone;

    fn rated(rating: u8) -> Review {
        Review {
            id: format!("r{rating}"),
            book: Some(BookRef::Id("b1".into())),
            user: Some(ReviewAuthor {
                id: "u1".into(),
                name: "Ana".into(),
            }),
            rating,
            comment: "ok".into(),
            created_at: None,
        }
    }

    #[test]
    fn formats_long_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        assert_eq!(format_date(&date), "January 5, 2024");
    }

    #[test]
    fn average_of_ratings() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[rated(4), rated(5)]), 4.5);
        assert_eq!(average_rating(&[rated(1), rated(2), rated(2)]), 1.7);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("Les Misérables", 8), "Les Misé...");
    }
}
