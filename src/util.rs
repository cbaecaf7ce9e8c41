use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_currency(value: f64) -> String {
    let value = value.max(0.0);
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${value:.0}")
    }
}

pub fn initials(first_name: &str, last_name: &str) -> String {
    let mut glyph = String::new();
    if let Some(first) = first_name.trim().chars().next() {
        glyph.extend(first.to_uppercase());
    }
    if let Some(last) = last_name.trim().chars().next() {
        glyph.extend(last.to_uppercase());
    }
    if glyph.is_empty() {
        glyph.push('?');
    }
    glyph
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn stable_fraction(id: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    (hasher.finish() % 10_000) as f32 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_picks_unit_by_magnitude() {
        assert_eq!(format_currency(940.0), "$940");
        assert_eq!(format_currency(53_400.0), "$53.4K");
        assert_eq!(format_currency(2_500_000.0), "$2.5M");
    }

    #[test]
    fn initials_fall_back_when_names_are_blank() {
        assert_eq!(initials("Ada", "Lovelace"), "AL");
        assert_eq!(initials("", "Lovelace"), "L");
        assert_eq!(initials("  ", ""), "?");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x, y) = stable_pair("contact-42");
        assert_eq!(stable_pair("contact-42"), (x, y));
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
        assert_ne!(stable_pair("contact-42"), stable_pair("contact-43"));
    }
}
