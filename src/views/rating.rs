//! Star rating display.

pub const STAR_COUNT: usize = 5;

/// Fill of each star in percent: `clamp((rating - i) * 100, 0, 100)`.
pub fn star_fills(rating: f64) -> [u8; STAR_COUNT] {
    let mut fills = [0u8; STAR_COUNT];
    for (i, fill) in fills.iter_mut().enumerate() {
        *fill = ((rating - i as f64) * 100.0).clamp(0.0, 100.0).round() as u8;
    }
    fills
}

/// Numeric label, only shown for a positive rating.
pub fn rating_label(rating: f64) -> Option<String> {
    (rating > 0.0).then(|| format!("{:.1}", rating))
}

/// Text rendering for terminals: full, half and empty stars plus the label.
pub fn render_stars(rating: f64) -> String {
    let mut out: String = star_fills(rating)
        .iter()
        .map(|fill| match fill {
            75..=100 => '★',
            25..=74 => '⯪',
            _ => '☆',
        })
        .collect();
    if let Some(label) = rating_label(rating) {
        out.push(' ');
        out.push_str(&label);
    }
    out
}
