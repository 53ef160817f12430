//! Integration tests for step matching and selection.

use anyhow::anyhow;
use xmlquill::document::node::{Element, XmlContent, XmlNode};
use xmlquill::query::{matches, select, Path, SelectError, Step};

/// results {
///   room(type="single") { rate(price="234.00", qualifier="aarp"), rate(price="250.00") }
///   room(type="2 queen") { rate(price="350.00", qualifier="silver") }
/// }
fn hotel_results() -> XmlNode {
    XmlNode::new("results")
        .with_text("\n  ")
        .with_child(
            XmlNode::new("room")
                .with_attribute("type", "single")
                .with_child(
                    XmlNode::new("rate")
                        .with_attribute("price", "234.00")
                        .with_attribute("qualifier", "aarp"),
                )
                .with_text("between rates")
                .with_child(XmlNode::new("rate").with_attribute("price", "250.00")),
        )
        .with_child(XmlContent::Comment("sold out soon".to_string()))
        .with_child(
            XmlNode::new("room").with_attribute("type", "2 queen").with_child(
                XmlNode::new("rate")
                    .with_attribute("price", "350.00")
                    .with_attribute("qualifier", "silver"),
            ),
        )
}

fn prices(nodes: &[&XmlNode]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.attribute("price").map(str::to_string))
        .collect()
}

fn has_rate_under(limit: f64) -> Step {
    Step::try_predicate(format!("has-rate-under-{}", limit), move |room: &XmlNode| {
        for rate in room.child_elements() {
            if let Some(price) = rate.attribute("price") {
                let price: f64 = price.parse()?;
                if price < limit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    })
}

#[test]
fn test_single_room_rates() {
    let tree = hotel_results();
    let path = Path::new(vec![
        Step::conjunction(vec![Step::name("room"), Step::attribute("type", "single")]),
        Step::name("rate"),
    ]);

    let rates = select(&tree, &path).unwrap();
    assert_eq!(prices(&rates), vec!["234.00", "250.00"]);
    assert_eq!(rates[0].attribute("qualifier"), Some("aarp"));
    assert_eq!(rates[1].attribute("qualifier"), None);
}

#[test]
fn test_rooms_with_cheap_rates_is_empty() {
    let tree = hotel_results();
    let path = Path::new(vec![Step::name("room"), has_rate_under(100.0)]);
    assert!(select(&tree, &path).unwrap().is_empty());
}

#[test]
fn test_predicate_sees_subtree() {
    let tree = hotel_results();
    let path = Path::new(vec![has_rate_under(300.0)]);
    let rooms = select(&tree, &path).unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].attribute("type"), Some("single"));
}

#[test]
fn test_name_test_law() {
    let tree = hotel_results();
    for child in tree.child_elements() {
        for name in ["room", "rate", "results"] {
            assert_eq!(
                matches(child, &Step::name(name)).unwrap(),
                child.name() == name
            );
        }
    }
}

#[test]
fn test_extra_attributes_never_cause_mismatch() {
    let step = Step::attribute("price", "250.00");
    let plain = XmlNode::new("rate").with_attribute("price", "250.00");
    let extra = plain.clone().with_attribute("currency", "USD");
    assert!(matches(&plain, &step).unwrap());
    assert!(matches(&extra, &step).unwrap());
}

#[test]
fn test_conjunction_laws() {
    let tree = hotel_results();
    let single = Step::attribute("type", "single");
    let wrapped = Step::Conjunction(vec![single.clone()]);
    let empty: Step = Step::Conjunction(vec![]);

    for child in tree.child_elements() {
        assert!(matches(child, &empty).unwrap());
        assert_eq!(
            matches(child, &wrapped).unwrap(),
            matches(child, &single).unwrap()
        );
    }
}

#[test]
fn test_single_step_selects_matching_element_children_only() {
    let tree = hotel_results();
    let all: Step = Step::Conjunction(vec![]);
    let rooms = select(&tree, &Path::new(vec![all])).unwrap();

    let expected: Vec<&XmlNode> = tree.child_elements().collect();
    assert_eq!(rooms, expected);
    assert_eq!(rooms.len(), 2);
    assert!(rooms.iter().all(|n| n.name() == "room"));
}

#[test]
fn test_flattening_law() {
    let tree = hotel_results();
    let first = Step::name("room");
    let second = Step::name("rate");

    let mut expected = Vec::new();
    for room in select(&tree, &Path::new(vec![first.clone()])).unwrap() {
        expected.extend(select(room, &Path::new(vec![second.clone()])).unwrap());
    }

    let combined = select(&tree, &Path::new(vec![first, second])).unwrap();
    assert_eq!(combined, expected);
    assert_eq!(prices(&combined), vec!["234.00", "250.00", "350.00"]);
}

#[test]
fn test_selection_is_idempotent() {
    let tree = hotel_results();
    let path = Path::new(vec![Step::name("room"), Step::name("rate")]);
    let first = select(&tree, &path).unwrap();
    let second = select(&tree, &path).unwrap();
    assert_eq!(first, second);
    assert!(first
        .iter()
        .zip(second.iter())
        .all(|(a, b)| std::ptr::eq(*a, *b)));
}

#[test]
fn test_path_longer_than_tree_is_empty() {
    let tree = hotel_results();
    let path = Path::new(vec![
        Step::name("room"),
        Step::name("rate"),
        Step::name("discount"),
        Step::name("code"),
    ]);
    assert_eq!(select(&tree, &path).unwrap(), Vec::<&XmlNode>::new());
}

#[test]
fn test_empty_path_is_malformed() {
    let tree = hotel_results();
    let result = select(&tree, &Path::new(vec![]));
    assert!(matches!(result, Err(SelectError::MalformedPath)));
}

#[test]
fn test_predicate_failure_aborts_selection() {
    let tree = hotel_results();
    // Fails on the second room only; the first room's rates must not leak out.
    let path = Path::new(vec![
        Step::try_predicate("picky", |room: &XmlNode| match room.attribute("type") {
            Some("single") => Ok(true),
            other => Err(anyhow!("unsupported room type {:?}", other)),
        }),
        Step::name("rate"),
    ]);

    match select(&tree, &path) {
        Err(SelectError::PredicateFailure {
            predicate, element, ..
        }) => {
            assert_eq!(predicate, "picky");
            assert!(element.contains("2 queen"));
        }
        other => panic!("Expected predicate failure, got {:?}", other),
    }
}

#[test]
fn test_unparseable_price_surfaces_as_failure() {
    let tree = XmlNode::new("results").with_child(
        XmlNode::new("room").with_child(XmlNode::new("rate").with_attribute("price", "n/a")),
    );
    let result = select(&tree, &Path::new(vec![has_rate_under(100.0)]));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("has-rate-under-100"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_path_reused_across_trees_and_threads() {
    let trees = vec![hotel_results(), hotel_results()];
    let path = Path::new(vec![Step::name("room"), Step::name("rate")]);
    let path = &path;

    std::thread::scope(|scope| {
        let handles: Vec<_> = trees
            .iter()
            .map(|tree| scope.spawn(move || select(tree, path).map(|found| prices(&found))))
            .collect();
        for handle in handles {
            assert_eq!(
                handle.join().unwrap().unwrap(),
                vec!["234.00", "250.00", "350.00"]
            );
        }
    });
}
