//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants:
//! - Element sequences survive every encoding unchanged
//! - Re-encoding decoded elements is byte-identical
//! - Coordinate conversions invert and compose
//! - Classifiers never panic on arbitrary input
//!
//! These tests complement unit tests by exploring the input space automatically.

use docpart_core::classify::{is_bulleted_text, split_list_items, TextClassifier};
use docpart_core::cleaners::clean_bullets;
use docpart_core::serializer::{
    elements_from_base64_gzipped_json, elements_from_json, elements_from_ndjson,
    elements_to_base64_gzipped_json, elements_to_json, elements_to_ndjson,
};
use docpart_core::{CoordinateSystem, Element, ElementMetadata, ElementType, Orientation};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn element_type() -> impl Strategy<Value = ElementType> {
    prop_oneof![
        Just(ElementType::Title),
        Just(ElementType::NarrativeText),
        Just(ElementType::ListItem),
        Just(ElementType::Text),
        Just(ElementType::Address),
        Just(ElementType::EmailAddress),
        Just(ElementType::Table),
        any::<bool>().prop_map(|checked| ElementType::CheckBox { checked }),
        Just(ElementType::Image),
        Just(ElementType::FigureCaption),
        Just(ElementType::Header),
        Just(ElementType::Footer),
        Just(ElementType::Formula),
        Just(ElementType::PageBreak),
    ]
}

fn coordinate_system() -> impl Strategy<Value = CoordinateSystem> {
    prop_oneof![
        Just(CoordinateSystem::relative()),
        (1.0f64..5000.0, 1.0f64..5000.0).prop_map(|(w, h)| CoordinateSystem::pixel_space(w, h)),
        (1.0f64..5000.0, 1.0f64..5000.0).prop_map(|(w, h)| CoordinateSystem::point_space(w, h)),
        (1.0f64..5000.0, 1.0f64..5000.0, any::<bool>()).prop_map(|(w, h, screen)| {
            let orientation = if screen {
                Orientation::Screen
            } else {
                Orientation::Cartesian
            };
            CoordinateSystem::new(w, h, orientation)
        }),
    ]
}

fn metadata() -> impl Strategy<Value = ElementMetadata> {
    (
        proptest::option::of(1usize..1000),
        proptest::option::of("[a-z]{1,12}\\.html"),
        proptest::option::of(0usize..6),
        proptest::option::of(0.0f64..1.0),
        proptest::option::of((
            proptest::collection::vec((-1.0e6f64..1.0e6, -1.0e6f64..1.0e6), 4),
            coordinate_system(),
        )),
        proptest::collection::vec(("[a-z ]{1,10}", "https://[a-z]{1,8}\\.com"), 0..3),
    )
        .prop_map(|(page, filename, depth, prob, coordinates, links)| {
            let mut metadata = ElementMetadata {
                page_number: page,
                filename,
                category_depth: depth,
                detection_class_prob: prob,
                ..Default::default()
            };
            if let Some((points, system)) = coordinates {
                metadata = metadata
                    .with_coordinates(Some(points), Some(system))
                    .expect("points and system are both present");
            }
            for (position, (text, url)) in links.into_iter().enumerate() {
                metadata.link_texts.push(text);
                metadata.link_urls.push(url);
                metadata.link_start_indexes.push(position as i64);
            }
            metadata
        })
}

fn element() -> impl Strategy<Value = Element> {
    (element_type(), "\\PC{0,80}", metadata()).prop_map(|(element_type, text, metadata)| {
        Element::new(element_type, text).with_metadata(metadata)
    })
}

fn assert_close(actual: (f64, f64), expected: (f64, f64), scale: f64) -> Result<(), TestCaseError> {
    let tolerance = 1e-9 * scale.max(1.0);
    prop_assert!(
        (actual.0 - expected.0).abs() <= tolerance && (actual.1 - expected.1).abs() <= tolerance,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
    Ok(())
}

// ============================================================================
// Serialization Properties
// ============================================================================

/// Property: JSON encoding round-trips and re-encodes byte-identically
#[test]
fn proptest_json_round_trip() {
    proptest!(|(elements in proptest::collection::vec(element(), 0..8))| {
        let json = elements_to_json(&elements).expect("finite metadata always encodes");
        let decoded = elements_from_json(&json).expect("own output must decode");
        prop_assert_eq!(&decoded, &elements);

        let reencoded = elements_to_json(&decoded).expect("decoded elements encode");
        prop_assert_eq!(reencoded, json, "re-encoding must be byte-identical");
    });
}

/// Property: NDJSON encoding round-trips
#[test]
fn proptest_ndjson_round_trip() {
    proptest!(|(elements in proptest::collection::vec(element(), 0..8))| {
        let ndjson = elements_to_ndjson(&elements).expect("encode");
        let decoded = elements_from_ndjson(&ndjson).expect("decode");
        prop_assert_eq!(decoded, elements);
    });
}

/// Property: the compact transport form round-trips
#[test]
fn proptest_compact_round_trip() {
    proptest!(|(elements in proptest::collection::vec(element(), 0..5))| {
        let payload = elements_to_base64_gzipped_json(&elements).expect("encode");
        let decoded = elements_from_base64_gzipped_json(&payload).expect("decode");
        prop_assert_eq!(decoded, elements);
    });
}

/// Property: decoded ids match the encoded ids
#[test]
fn proptest_ids_survive_round_trip() {
    proptest!(|(elements in proptest::collection::vec(element(), 1..5))| {
        let decoded = elements_from_json(&elements_to_json(&elements).expect("encode")).expect("decode");
        for (original, restored) in elements.iter().zip(&decoded) {
            prop_assert_eq!(original.id(), restored.id());
        }
    });
}

// ============================================================================
// Coordinate Properties
// ============================================================================

/// Property: to_relative then from_relative is the identity
#[test]
fn proptest_relative_inverse() {
    proptest!(|(system in coordinate_system(), fx in 0.0f64..1.0, fy in 0.0f64..1.0)| {
        let (x, y) = (fx * system.width(), fy * system.height());
        let (rx, ry) = system.convert_to_relative(x, y);
        let back = system.convert_from_relative(rx, ry);
        assert_close(back, (x, y), system.width().max(system.height()))?;
    });
}

/// Property: converting A -> B -> A returns the starting point
#[test]
fn proptest_conversion_inverse() {
    proptest!(|(a in coordinate_system(), b in coordinate_system(), fx in 0.0f64..1.0, fy in 0.0f64..1.0)| {
        let (x, y) = (fx * a.width(), fy * a.height());
        let (bx, by) = a.convert_coordinates_to_new_system(&b, x, y);
        let back = b.convert_coordinates_to_new_system(&a, bx, by);
        let scale = a.width().max(a.height()).max(b.width()).max(b.height());
        assert_close(back, (x, y), scale)?;
    });
}

/// Property: A -> B -> C equals A -> C
#[test]
fn proptest_conversion_transitive() {
    proptest!(|(a in coordinate_system(), b in coordinate_system(), c in coordinate_system(), fx in 0.0f64..1.0, fy in 0.0f64..1.0)| {
        let (x, y) = (fx * a.width(), fy * a.height());
        let (bx, by) = a.convert_coordinates_to_new_system(&b, x, y);
        let via_b = b.convert_coordinates_to_new_system(&c, bx, by);
        let direct = a.convert_coordinates_to_new_system(&c, x, y);
        assert_close(via_b, direct, c.width().max(c.height()))?;
    });
}

/// Property: screen to cartesian of the same size flips y to height - y
#[test]
fn proptest_screen_cartesian_flip() {
    proptest!(|(w in 1.0f64..5000.0, h in 1.0f64..5000.0, fx in 0.0f64..1.0, fy in 0.0f64..1.0)| {
        let screen = CoordinateSystem::new(w, h, Orientation::Screen);
        let cartesian = CoordinateSystem::new(w, h, Orientation::Cartesian);
        let (x, y) = (fx * w, fy * h);
        let flipped = screen.convert_coordinates_to_new_system(&cartesian, x, y);
        assert_close(flipped, (x, h - y), w.max(h))?;
    });
}

// ============================================================================
// Classifier Properties
// ============================================================================

/// Property: classifiers are total over arbitrary text
#[test]
fn proptest_classifiers_no_panic() {
    proptest!(|(text in "\\PC{0,200}")| {
        let classifier = TextClassifier::default();
        let _ = classifier.is_possible_narrative_text(&text, 0.3);
        let _ = classifier.is_possible_title(&text, 5);
        let _ = split_list_items(&text);
    });
}

/// Property: cleaning a bulleted line removes its glyph
#[test]
fn proptest_clean_bullets_removes_glyph() {
    proptest!(|(glyph in prop::sample::select(vec!['●', '•', '◦', '▪', '‣']), body in "[A-Za-z][A-Za-z ]{0,40}")| {
        let line = format!("{glyph} {body}");
        if is_bulleted_text(&line) {
            let cleaned = clean_bullets(&line);
            prop_assert!(!cleaned.starts_with(glyph));
            prop_assert_eq!(cleaned, body.trim());
        }
    });
}
