use std::collections::HashMap;
use std::sync::LazyLock;

/// Normalize a source field name to a canonical key.
///
/// Steps:
/// 1. Lowercase
/// 2. Replace spaces, hyphens, slashes and dots with underscores
/// 3. Split camelCase boundaries ("skatePark" -> "skate_park")
/// 4. Collapse multiple underscores
/// 5. Look up in alias map
pub fn normalize_field_key(raw: &str) -> String {
    resolve_field_key(raw).0
}

/// Canonical key for a source field plus its rank among the source names
/// sharing that key. Lower ranks win when a record carries several.
///
/// Fields listed in the precedence table rank by position there ("uid"
/// before "id", "classification" before "size"). Elsewhere the canonical
/// spelling outranks its aliases.
pub fn resolve_field_key(raw: &str) -> (String, usize) {
    let cleaned = clean_key(raw);
    let canonical = ALIASES
        .get(cleaned.as_str())
        .map(|c| c.to_string())
        .unwrap_or_else(|| cleaned.clone());

    let rank = match PRECEDENCE.get(canonical.as_str()) {
        Some(order) => order
            .iter()
            .position(|k| *k == cleaned)
            .unwrap_or(order.len()),
        None if cleaned == canonical => 0,
        None => 1,
    };
    (canonical, rank)
}

fn clean_key(raw: &str) -> String {
    let trimmed = raw.trim();

    // Split camelCase before lowercasing so the boundary is still visible
    let mut split = String::with_capacity(trimmed.len() + 4);
    let mut prev_lower = false;
    for c in trimmed.chars() {
        if c.is_uppercase() && prev_lower {
            split.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        split.push(c);
    }

    let lower = split.to_lowercase();

    let mut normalized = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            'a'..='z' | '0'..='9' => normalized.push(c),
            _ => normalized.push('_'),
        }
    }

    // Collapse multiple underscores and trim
    let mut result = String::with_capacity(normalized.len());
    let mut prev_underscore = true;
    for c in normalized.chars() {
        if c == '_' {
            if !prev_underscore {
                result.push('_');
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }
    result
}

static PRECEDENCE: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert(
            "id",
            &["uid", "id", "playground_id", "object_id", "objectid", "fid"],
        );
        m.insert(
            "classification",
            &["classification", "size_classification", "size", "rating"],
        );
        m.insert("lat", &["lat", "latitude", "y"]);
        m.insert("lng", &["lng", "longitude", "lon", "long", "x"]);
        m.insert("geometry", &["geometry", "geom", "geo"]);
        m
    });

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Identity
    m.insert("uid", "id");
    m.insert("playground_id", "id");
    m.insert("fid", "id");
    m.insert("object_id", "id");
    m.insert("objectid", "id");

    // Name
    m.insert("playground_name", "name");
    m.insert("title", "name");

    // Position
    m.insert("latitude", "lat");
    m.insert("y", "lat");
    m.insert("longitude", "lng");
    m.insert("lon", "lng");
    m.insert("long", "lng");
    m.insert("x", "lng");
    m.insert("geom", "geometry");
    m.insert("geo", "geometry");

    // Classification
    m.insert("size", "classification");
    m.insert("rating", "classification");
    m.insert("size_classification", "classification");

    // Facets
    m.insert("playground_type", "type");
    m.insert("council", "lga");
    m.insert("local_government_area", "lga");
    m.insert("shade_type", "shade");
    m.insert("fence", "fencing");
    m.insert("fence_type", "fencing");
    m.insert("car_parking", "parking");
    m.insert("seats", "seating");
    m.insert("flooring", "floor");
    m.insert("ground_cover", "floor");
    m.insert("flyingfox", "flying_fox");

    // Keywords
    m.insert("keyword", "keywords");
    m.insert("tags", "keywords");

    // Facilities
    m.insert("toilets", "toilet");
    m.insert("barbeque", "bbq");
    m.insert("barbecue", "bbq");
    m.insert("bbqs", "bbq");
    m.insert("drinking_fountain", "bubbler");
    m.insert("water_bubbler", "bubbler");
    m.insert("accessibility", "accessible");
    m.insert("accessible_features", "accessible");
    m.insert("basketball_court", "basketball");
    m.insert("skatepark", "skate_park");
    m.insert("scoot_track", "scooter_track");
    m.insert("bike_track", "scooter_track");
    m.insert("pumptrack", "pump_track");
    m.insert("sand_pit", "sandpit");
    m.insert("waterplay", "water_play");
    m.insert("splash_pad", "water_play");

    // Equipment
    m.insert("baby_swings", "baby_swing");
    m.insert("belt_swings", "belt_swing");
    m.insert("basket_swings", "basket_swing");
    m.insert("dual_swings", "dual_swing");
    m.insert("hammocks", "hammock");
    m.insert("double_slides", "double_slide");
    m.insert("triple_slides", "triple_slide");
    m.insert("straight_slides", "straight_slide");
    m.insert("tube_slides", "tube_slide");
    m.insert("spiral_slides", "spiral_slide");
    m.insert("metal_ladders", "metal_ladder");
    m.insert("rope_ladders", "rope_ladder");
    m.insert("monkeybars", "monkey_bars");
    m.insert("spinning_poles", "spinning_pole");
    m.insert("spinning_buckets", "spinning_bucket");
    m.insert("merry_go_rounds", "merry_go_round");
    m.insert("merrygoround", "merry_go_round");
    m.insert("balance_beams", "balance_beam");
    m.insert("spring_rockers", "spring_rocker");
    m.insert("seesaws", "seesaw");
    m.insert("see_saw", "seesaw");
    m.insert("bridges", "bridge");
    m.insert("tunnels", "tunnel");
    m.insert("trampolines", "trampoline");
    m.insert("firemans_poles", "firemans_pole");
    m.insert("fireman_pole", "firemans_pole");
    m.insert("hamster_roller_wheel", "hamster_wheel");
    m.insert("hamster_wheels", "hamster_wheel");

    // Media
    m.insert("image", "photo");
    m.insert("photo_url", "photo");
    m.insert("url", "link");
    m.insert("website", "link");
    m.insert("comment", "comments");
    m.insert("notes", "comments");
    m.insert("last_visit", "last_visit_date");
    m.insert("last_verified", "last_visit_date");
    m.insert("verified_by", "verified");

    m
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_key() {
        assert_eq!(normalize_field_key("suburb"), "suburb");
    }

    #[test]
    fn test_capitalized_key() {
        assert_eq!(normalize_field_key("Classification"), "classification");
        assert_eq!(normalize_field_key("Toilet"), "toilet");
    }

    #[test]
    fn test_spaced_key() {
        assert_eq!(normalize_field_key("Baby Swing"), "baby_swing");
        assert_eq!(normalize_field_key("Skate Park"), "skate_park");
        assert_eq!(normalize_field_key("  Water-Play "), "water_play");
    }

    #[test]
    fn test_camel_case_key() {
        assert_eq!(normalize_field_key("skatePark"), "skate_park");
        assert_eq!(normalize_field_key("merryGoRound"), "merry_go_round");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_field_key("uid"), "id");
        assert_eq!(normalize_field_key("Size"), "classification");
        assert_eq!(normalize_field_key("Longitude"), "lng");
        assert_eq!(normalize_field_key("geom"), "geometry");
        assert_eq!(normalize_field_key("Playground Type"), "type");
    }

    #[test]
    fn test_precedence_ranks() {
        assert_eq!(resolve_field_key("UID"), ("id".to_string(), 0));
        assert_eq!(resolve_field_key("id"), ("id".to_string(), 1));
        assert!(resolve_field_key("Size").1 > resolve_field_key("Classification").1);
        assert!(resolve_field_key("y").1 > resolve_field_key("lat").1);
        assert!(resolve_field_key("toilets").1 > resolve_field_key("toilet").1);
    }

    #[test]
    fn test_unknown_key_passthrough() {
        assert_eq!(normalize_field_key("Opening Hours"), "opening_hours");
    }
}
