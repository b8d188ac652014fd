use std::sync::LazyLock;

use regex_lite::Regex;

use crate::shape::{ShapeKind, ShapeSpec};

const LEADING_VERBS: &[&str] = &[
    "draw", "create", "make", "generate", "sketch", "render", "build", "show",
];

// Longer names first so "hendecagon" is not taken for "decagon".
const POLYGON_NAMES: &[(&str, u32)] = &[
    ("triangle", 3),
    ("pentagon", 5),
    ("hexagon", 6),
    ("heptagon", 7),
    ("octagon", 8),
    ("nonagon", 9),
    ("hendecagon", 11),
    ("dodecagon", 12),
    ("decagon", 10),
];

const DEFAULT_POLYGON_SIDES: u32 = 6;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| regex(r"\d+(?:\.\d+)?"));
static NUMERIC_GON: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(\d+)\s*[- ]?gon\b"));
static N_EQUALS: LazyLock<Regex> = LazyLock::new(|| regex(r"\bn\s*=\s*(\d+)\b"));
static BY_PAIR: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(\d+(?:\.\d+)?)\s*(?:x|by)\s*(\d+(?:\.\d+)?)"));
static RADIUS: LazyLock<Regex> = LazyLock::new(|| regex(r"\bradius\s*=?\s*(\d+(?:\.\d+)?)\b"));
static SIDE: LazyLock<Regex> = LazyLock::new(|| regex(r"\bside\s*=?\s*(\d+(?:\.\d+)?)\b"));
static SIDE_COUNT: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(\d+)\s*sides?\b"));

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

/// Lowercase, turn `,;:` into spaces and drop any leading imperative verbs.
pub fn normalize_prompt(prompt: &str) -> String {
    let lowered = prompt.trim().to_lowercase().replace([',', ';', ':'], " ");
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let mut tokens = words.as_slice();
    while let Some((first, rest)) = tokens.split_first() {
        if !LEADING_VERBS.contains(first) {
            break;
        }
        tokens = rest;
    }
    tokens.join(" ")
}

/// Deterministic, pattern-based prompt parsing.
///
/// Never fails: anything that doesn't name a shape becomes a square.
/// Explicit markers (`n=`, `A by B`, `radius`, `side`) win over numbers
/// picked up positionally.
pub fn parse_prompt(prompt: &str) -> ShapeSpec {
    let text = normalize_prompt(prompt);
    let (kind, mut n_sides) = detect_family(&text);
    let numbers: Vec<f64> = NUMBER
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    let mut spec = ShapeSpec::new(kind);

    if let Some(n) = capture_int(&N_EQUALS, &text) {
        n_sides = Some(n);
    }
    if let Some(caps) = BY_PAIR.captures(&text) {
        spec.width = caps[1].parse().ok();
        spec.height = caps[2].parse().ok();
    }
    spec.radius = capture_float(&RADIUS, &text);
    spec.side = capture_float(&SIDE, &text);

    let first = numbers.first().copied();
    match kind {
        ShapeKind::Square | ShapeKind::Triangle => {
            spec.side = spec.side.or(first);
        }
        ShapeKind::Circle => {
            spec.radius = spec.radius.or(first);
        }
        ShapeKind::Rectangle => {
            if spec.width.is_none() && spec.height.is_none() && numbers.len() >= 2 {
                spec.width = Some(numbers[0]);
                spec.height = Some(numbers[1]);
            }
        }
        ShapeKind::RegularPolygon => {
            if n_sides.is_none() {
                n_sides = Some(capture_int(&SIDE_COUNT, &text).unwrap_or(DEFAULT_POLYGON_SIDES));
            }
            spec.radius = spec.radius.or(first);
        }
    }

    spec.n_sides = n_sides;
    spec
}

fn detect_family(text: &str) -> (ShapeKind, Option<u32>) {
    if text.contains("circle") || text.contains("round") {
        return (ShapeKind::Circle, None);
    }

    for kind in [ShapeKind::Square, ShapeKind::Rectangle, ShapeKind::Triangle] {
        if text.contains(kind.as_str()) {
            return (kind, None);
        }
    }

    if let Some(&(_, n)) = POLYGON_NAMES.iter().find(|(name, _)| text.contains(name)) {
        return (ShapeKind::RegularPolygon, Some(n));
    }

    if let Some(n) = capture_int(&NUMERIC_GON, text) {
        return (ShapeKind::RegularPolygon, Some(n));
    }

    if text.contains("polygon") {
        return (ShapeKind::RegularPolygon, None);
    }

    (ShapeKind::Square, None)
}

/// The captured digit run as a count. A run too long for `u32` saturates, so
/// a match still counts as a match and the renderer rejects the count.
fn capture_int(re: &Regex, text: &str) -> Option<u32> {
    let digits = re.captures(text)?.get(1)?.as_str();
    Some(digits.parse().unwrap_or(u32::MAX))
}

fn capture_float(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spec(
        kind: ShapeKind,
        side: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
        radius: Option<f64>,
        n_sides: Option<u32>,
    ) -> ShapeSpec {
        ShapeSpec {
            shape: kind.as_str().to_string(),
            side,
            width,
            height,
            radius,
            n_sides,
        }
    }

    #[test]
    fn normalize_strips_verbs_and_punctuation() {
        assert_eq!(normalize_prompt("  Draw, MAKE a Circle; radius:4 "), "a circle radius 4");
        assert_eq!(normalize_prompt("draw draw"), "");
        assert_eq!(normalize_prompt("a drawn square"), "a drawn square");
    }

    #[test]
    fn rectangle_by_pair() {
        assert_eq!(
            parse_prompt("Draw a rectangle 8 by 3"),
            spec(ShapeKind::Rectangle, None, Some(8.0), Some(3.0), None, None)
        );
        assert_eq!(
            parse_prompt("rectangle 2.5x4"),
            spec(ShapeKind::Rectangle, None, Some(2.5), Some(4.0), None, None)
        );
    }

    #[test]
    fn circle_radius() {
        assert_eq!(
            parse_prompt("Make a circle radius 4"),
            spec(ShapeKind::Circle, None, None, None, Some(4.0), None)
        );
        assert_eq!(
            parse_prompt("something round of 2.5"),
            spec(ShapeKind::Circle, None, None, None, Some(2.5), None)
        );
    }

    #[test]
    fn named_polygons() {
        assert_eq!(
            parse_prompt("Create a hexagon radius 2"),
            spec(ShapeKind::RegularPolygon, None, None, None, Some(2.0), Some(6))
        );
        assert_eq!(parse_prompt("pentagon").n_sides, Some(5));
        assert_eq!(parse_prompt("a dodecagon").n_sides, Some(12));
        assert_eq!(parse_prompt("a hendecagon").n_sides, Some(11));
        assert_eq!(parse_prompt("a decagon").n_sides, Some(10));
    }

    #[test]
    fn numeric_gon() {
        assert_eq!(
            parse_prompt("Create a 7-gon radius 3"),
            spec(ShapeKind::RegularPolygon, None, None, None, Some(3.0), Some(7))
        );
        assert_eq!(parse_prompt("a 9 gon").n_sides, Some(9));
        assert_eq!(parse_prompt("a 10gon").n_sides, Some(10));
    }

    #[test]
    fn triangle_is_a_family_not_a_polygon() {
        assert_eq!(
            parse_prompt("sketch a triangle 5"),
            spec(ShapeKind::Triangle, Some(5.0), None, None, None, None)
        );
    }

    #[test]
    fn ambiguity_precedence() {
        assert_eq!(parse_prompt("circle polygon").shape, "circle");

        let hex = parse_prompt("hexagon 7-gon");
        assert_eq!(hex.shape, "regular_polygon");
        assert_eq!(hex.n_sides, Some(6));

        let gon = parse_prompt("polygon 7 gon 3");
        assert_eq!(
            gon,
            spec(ShapeKind::RegularPolygon, None, None, None, Some(7.0), Some(7))
        );
        assert_eq!(parse_prompt("square circle").shape, "circle");
        assert_eq!(parse_prompt("rectangle square").shape, "square");
    }

    #[test]
    fn explicit_markers_beat_pool() {
        assert_eq!(
            parse_prompt("polygon n=8 radius=1.5"),
            spec(ShapeKind::RegularPolygon, None, None, None, Some(1.5), Some(8))
        );
        assert_eq!(parse_prompt("hexagon n = 9").n_sides, Some(9));
        assert_eq!(parse_prompt("square 10 side 2").side, Some(2.0));
    }

    #[test]
    fn polygon_side_count_phrase() {
        assert_eq!(
            parse_prompt("a polygon with 5 sides radius 2"),
            spec(ShapeKind::RegularPolygon, None, None, None, Some(2.0), Some(5))
        );
        assert_eq!(parse_prompt("polygon").n_sides, Some(6));
        assert_eq!(parse_prompt("polygon").radius, None);
    }

    #[test]
    fn rectangle_with_one_number_keeps_defaults() {
        assert_eq!(
            parse_prompt("rectangle 5"),
            spec(ShapeKind::Rectangle, None, None, None, None, None)
        );
    }

    #[test]
    fn fallback_is_a_square() {
        assert_eq!(
            parse_prompt(""),
            spec(ShapeKind::Square, None, None, None, None, None)
        );
        assert_eq!(parse_prompt("something 3").side, Some(3.0));
    }

    #[test]
    fn oversized_side_counts_saturate() {
        let parsed = parse_prompt("a 99999999999-gon radius 2");
        assert_eq!(parsed.shape, "regular_polygon");
        assert_eq!(parsed.n_sides, Some(u32::MAX));
        assert_eq!(parsed.radius, Some(2.0));

        assert_eq!(parse_prompt("polygon n=4294967296").n_sides, Some(u32::MAX));
        assert_eq!(parse_prompt("polygon with 123456789012 sides").n_sides, Some(u32::MAX));
        assert_eq!(parse_prompt("polygon n=4294967295").n_sides, Some(u32::MAX));
    }

    #[test]
    fn only_ascii_digits_are_numbers() {
        let parsed = parse_prompt("rectangle \u{668} by \u{663}");
        assert_eq!(parsed.shape, "rectangle");
        assert_eq!((parsed.width, parsed.height), (None, None));

        let parsed = parse_prompt("rectangle 8 by 3");
        assert_eq!((parsed.width, parsed.height), (Some(8.0), Some(3.0)));
    }

    proptest! {
        #[test]
        fn parse_is_total(input in ".*") {
            let parsed = parse_prompt(&input);
            prop_assert!(ShapeKind::from_name(&parsed.shape).is_some());
        }

        #[test]
        fn parse_handles_shape_like_noise(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "draw", "circle", "polygon", "7-gon", "hexagon", "by", "x", "radius",
                    "n=", "side", "sides", "3", "0", "12.5", ",", "rectangle", "square",
                ]),
                0..12,
            )
        ) {
            let parsed = parse_prompt(&words.join(" "));
            prop_assert!(ShapeKind::from_name(&parsed.shape).is_some());
        }
    }
}
