use checklist_spec::{
    Direction, Progress, RatingScale, SelectionEntry, StableKey, find_entry, next_unrated,
    parse_multilingual, parse_plain, resolve_selection, step,
};

const TEMPLATE: &str = "#Basics\n(Self, Partner)\n* Kissing\n* Cuddling\n\n#Fluids\n(General)\n* Blood\n";

#[test]
fn entries_follow_category_field_item_order() {
    let template = parse_plain(TEMPLATE);
    let entries = resolve_selection(&template, &RatingScale::builtin(), None);
    let cells: Vec<_> = entries
        .iter()
        .map(|entry| (entry.category.as_str(), entry.field.as_str(), entry.item.as_str()))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("Basics", "Self", "Kissing"),
            ("Basics", "Self", "Cuddling"),
            ("Basics", "Partner", "Kissing"),
            ("Basics", "Partner", "Cuddling"),
            ("Fluids", "General", "Blood"),
        ]
    );
    assert!(entries[..4].iter().all(|entry| entry.show_field));
    assert!(!entries[4].show_field);
    assert_eq!(entries.len(), template.cell_count());
}

#[test]
fn resolving_twice_preserves_every_rating() {
    let template = parse_plain(TEMPLATE);
    let scale = RatingScale::builtin();
    let mut entries = resolve_selection(&template, &scale, None);
    let levels = ["Favorite", "Like", "Okay", "Maybe", "No"];
    for (entry, level) in entries.iter_mut().zip(levels.iter().cycle()) {
        entry.rating = (*level).to_string();
    }

    let again = resolve_selection(&template, &scale, Some(&entries));
    assert_eq!(again, entries);
}

#[test]
fn ratings_follow_items_when_template_changes_shape() {
    let scale = RatingScale::builtin();
    let before = parse_plain(TEMPLATE);
    let mut entries = resolve_selection(&before, &scale, None);
    let idx = find_entry(&entries, "Basics", "Cuddling", "Partner").expect("entry");
    entries[idx].rating = "Like".into();
    entries[idx].comment = Some("gently".into());

    let after = parse_plain(
        "#Intro\n(General)\n* Talking\n\n#Basics\n(Self, Partner)\n* Holding hands\n* Cuddling\n",
    );
    let resolved = resolve_selection(&after, &scale, Some(&entries));
    let moved = find_entry(&resolved, "Basics", "Cuddling", "Partner").expect("entry");
    assert_ne!(moved, idx);
    assert_eq!(resolved[moved].rating, "Like");
    assert_eq!(resolved[moved].comment.as_deref(), Some("gently"));
    let others = resolved
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != moved)
        .all(|(_, entry)| entry.rating == "Not Entered" && entry.comment.is_none());
    assert!(others);
}

#[test]
fn colliding_plain_keys_keep_their_own_ratings() {
    let template = parse_plain("#Gear\n(General)\n* Level 1\n* Level 2\n* Level 3\n");
    let scale = RatingScale::builtin();
    let mut entries = resolve_selection(&template, &scale, None);
    assert_eq!(entries[0].stable, entries[1].stable);
    entries[0].rating = "Like".into();
    entries[1].rating = "No".into();
    entries[2].comment = Some("later".into());

    let again = resolve_selection(&template, &scale, Some(&entries));
    let ratings: Vec<_> = again.iter().map(|entry| entry.rating.as_str()).collect();
    assert_eq!(ratings, vec!["Like", "No", "Not Entered"]);
    assert_eq!(again[2].comment.as_deref(), Some("later"));
    assert_eq!(again, entries);
}

#[test]
fn colliding_plain_keys_follow_names_when_items_move() {
    let scale = RatingScale::builtin();
    let before = parse_plain("#Gear\n(General)\n* Level 1\n* Level 2\n");
    let mut entries = resolve_selection(&before, &scale, None);
    entries[0].rating = "Like".into();
    entries[1].rating = "No".into();

    let after = parse_plain("#Gear\n(General)\n* Level 2\n* Level 1\n");
    let resolved = resolve_selection(&after, &scale, Some(&entries));
    assert_eq!(resolved[0].item, "Level 2");
    assert_eq!(resolved[0].rating, "No");
    assert_eq!(resolved[1].rating, "Like");

    let renamed = parse_plain("#Gear\n(General)\n* Level 3\n* Level 4\n");
    let resolved = resolve_selection(&renamed, &scale, Some(&entries));
    let ratings: Vec<_> = resolved.iter().map(|entry| entry.rating.as_str()).collect();
    assert_eq!(ratings, vec!["Like", "No"]);
}

#[test]
fn unknown_previous_rating_falls_back_to_default() {
    let template = parse_plain(TEMPLATE);
    let scale = RatingScale::builtin();
    let mut entries = resolve_selection(&template, &scale, None);
    entries[0].rating = "Retired level".into();
    let resolved = resolve_selection(&template, &scale, Some(&entries));
    assert_eq!(resolved[0].rating, "Not Entered");
}

#[test]
fn entries_without_stable_keys_match_by_display_name() {
    let template = parse_multilingual(TEMPLATE);
    let scale = RatingScale::builtin();
    let imported: Vec<SelectionEntry> = serde_json::from_str(
        r#"[
            { "category": "Fluids", "item": "Blood", "field": "General", "rating": "No" },
            { "category": "Basics", "item": "Kissing", "field": "Partner", "rating": "Favorite", "comment": "yes please" }
        ]"#,
    )
    .expect("deserialize");

    let resolved = resolve_selection(&template, &scale, Some(&imported));
    assert_eq!(resolved[4].rating, "No");
    assert_eq!(resolved[2].rating, "Favorite");
    assert_eq!(resolved[2].comment.as_deref(), Some("yes please"));
    assert_eq!(
        resolved[2].stable,
        Some(StableKey::new("Basics", "0", "1"))
    );
    assert_eq!(resolved[0].rating, "Not Entered");
}

#[test]
fn stable_key_takes_precedence_over_display_name() {
    let template = parse_multilingual(TEMPLATE);
    let scale = RatingScale::builtin();
    let mut entries = resolve_selection(&template, &scale, None);
    entries[0].rating = "Okay".into();
    // Same names as entry 0 but pointing at another cell's key.
    entries[1].category = entries[0].category.clone();
    entries[1].item = entries[0].item.clone();
    entries[1].rating = "No".into();

    let resolved = resolve_selection(&template, &scale, Some(&entries));
    assert_eq!(resolved[0].rating, "Okay");
    assert_eq!(resolved[1].rating, "No");
}

#[test]
fn progress_and_navigation() {
    let template = parse_plain(TEMPLATE);
    let scale = RatingScale::builtin();
    let mut entries = resolve_selection(&template, &scale, None);
    assert_eq!(Progress::of(&entries, &scale), Progress { rated: 0, total: 5 });

    entries[0].rating = "Like".into();
    entries[2].rating = "No".into();
    let progress = Progress::of(&entries, &scale);
    assert_eq!(progress.rated, 2);
    assert!(!progress.is_complete());

    assert_eq!(next_unrated(&entries, &scale, None), Some(1));
    assert_eq!(next_unrated(&entries, &scale, Some(1)), Some(3));
    assert_eq!(next_unrated(&entries, &scale, Some(4)), None);

    assert_eq!(step(entries.len(), 0, Direction::Previous), None);
    assert_eq!(step(entries.len(), 0, Direction::Next), Some(1));
    assert_eq!(step(entries.len(), 4, Direction::Next), None);
    assert_eq!(step(entries.len(), 4, Direction::Previous), Some(3));
}
