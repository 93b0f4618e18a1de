use checklist_spec::{
    Dialect, DisplayValue, RatingLevel, RatingScale, TemplateError, WarningKind, parse,
    parse_plain, parse_report, parse_strict, resolve_selection,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "basic" => include_str!("../tests/fixtures/basic.txt"),
        "crlf" => include_str!("../tests/fixtures/crlf.txt"),
        "bom" => include_str!("../tests/fixtures/bom.txt"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn basic_fixture_keeps_complete_categories_in_order() {
    let template = parse_plain(fixture("basic"));
    let keys: Vec<_> = template.categories.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Basics", "Fluids"]);

    let basics = template.get("Basics").expect("basics");
    assert_eq!(
        basics.fields,
        vec![DisplayValue::from("Self"), DisplayValue::from("Partner")]
    );
    assert_eq!(basics.items.len(), 2);
    assert_eq!(
        basics.items[0].description_text(None).as_deref(),
        Some("Taking or giving up control")
    );
    assert_eq!(basics.items[1].description, None);

    let fluids = template.get("Fluids").expect("fluids");
    assert_eq!(fluids.items[1].name, DisplayValue::from("Watersports"));
    assert_eq!(
        fluids.items[1].description,
        Some(DisplayValue::from("Urine play"))
    );
}

#[test]
fn crlf_line_endings_are_accepted() {
    let template = parse_plain(fixture("crlf"));
    let bondage = template.get("Bondage").expect("bondage");
    assert_eq!(bondage.fields[1], DisplayValue::from("Receiving"));
    assert_eq!(bondage.items[1].name, DisplayValue::from("Cuffs"));
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    let text = fixture("bom");
    assert!(text.starts_with('\u{feff}'));
    let report = parse_report(text, Dialect::Plain);
    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    let basics = report.template.get("Basics").expect("basics");
    assert_eq!(
        basics.items[0].description_text(None).as_deref(),
        Some("With a BOM")
    );
    assert_eq!(parse(text, Dialect::Multilingual).len(), 1);
}

#[test]
fn byte_order_mark_is_only_skipped_at_the_start() {
    let report = parse_report(
        "#Cat\n(A)\n* X\n\u{feff}#Other\n(B)\n* Y\n",
        Dialect::Plain,
    );
    assert_eq!(report.template.len(), 1);
    assert!(!report.is_clean());
    assert_eq!(report.warnings[0].line, 4);
}

#[test]
fn category_without_items_is_discarded() {
    let template = parse_plain("#Empty\n(General)\n");
    assert!(template.is_empty());
    assert_eq!(template.ensure_non_empty(), Err(TemplateError::Empty));
}

#[test]
fn category_without_fields_is_discarded() {
    let report = parse_report("#NoFields\n* Foo\n#Kept\n(General)\n* Bar\n", Dialect::Plain);
    assert!(!report.is_clean());
    assert_eq!(report.template.len(), 1);
    assert!(report.template.get("Kept").is_some());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].line, 1);
    assert_eq!(
        report.warnings[0].kind,
        WarningKind::DiscardedCategory {
            name: "NoFields".into(),
            fields: 0,
            items: 1,
        }
    );
}

#[test]
fn last_fields_line_wins() {
    let template = parse_plain("#Cat\n(A, B)\n* X\n(C)\n");
    let category = template.get("Cat").expect("category");
    assert_eq!(category.fields, vec![DisplayValue::from("C")]);
}

#[test]
fn description_attaches_to_most_recent_item() {
    let template = parse_plain("#Cat\n(A)\n* X\n* Y\n? first\n? second\n");
    let category = template.get("Cat").expect("category");
    assert_eq!(category.items[0].description, None);
    assert_eq!(
        category.items[1].description,
        Some(DisplayValue::from("second"))
    );
}

#[test]
fn description_before_any_item_is_ignored() {
    let report = parse_report("#Cat\n(A)\n? orphan\n* X\n", Dialect::Plain);
    let category = report.template.get("Cat").expect("category");
    assert_eq!(category.items[0].description, None);
    assert_eq!(report.warnings[0].line, 3);
    assert_eq!(report.warnings[0].kind, WarningKind::OutOfContext);
}

#[test]
fn lines_outside_a_category_are_ignored() {
    let template = parse_plain("(A, B)\n* Loose\n#Cat\n(C)\n* X\n");
    assert_eq!(template.len(), 1);
    assert_eq!(template.get("Cat").expect("category").items.len(), 1);
}

#[test]
fn plain_dialect_overwrites_repeated_names_in_place() {
    let template = parse_plain("#A\n(x)\n* 1\n#B\n(x)\n* b\n#A\n(y)\n* 2\n");
    let keys: Vec<_> = template.categories.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["A", "B"]);
    let a = template.get("A").expect("category a");
    assert_eq!(a.fields, vec![DisplayValue::from("y")]);
    assert_eq!(a.items[0].name, DisplayValue::from("2"));
}

#[test]
fn plain_dialect_ignores_overlay_lines() {
    let report = parse_report("#Cat\n+ [DE] #Katze\n(A)\n* X\n", Dialect::Plain);
    let category = report.template.get("Cat").expect("category");
    assert_eq!(category.name, DisplayValue::from("Cat"));
    assert_eq!(report.warnings[0].kind, WarningKind::UnknownLine);
}

#[test]
fn strict_mode_reports_dropped_lines() {
    let err = parse_strict(fixture("basic"), Dialect::Plain).expect_err("strict failure");
    match err {
        TemplateError::Strict { count, first } => {
            assert_eq!(count, 2);
            assert!(first.starts_with("line 13:"), "unexpected: {first}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(parse_strict(fixture("crlf"), Dialect::Plain).is_ok());
}

#[test]
fn parse_dispatches_on_dialect() {
    let text = "#Cat\n+ [DE] #Katze\n(A)\n* X\n";
    let plain = parse(text, Dialect::Plain);
    let multilingual = parse(text, Dialect::Multilingual);
    assert_eq!(plain.dialect, Dialect::Plain);
    assert!(!plain.get("Cat").expect("plain").name.has_translations());
    assert!(multilingual.get("Cat").expect("ml").name.has_translations());
}

#[test]
fn end_to_end_two_level_scale() {
    let template = parse_plain("#Basics\n(General)\n* Foo\n? A description\n* Bar\n");
    let scale = RatingScale::new(vec![
        RatingLevel::new("No", "#920000"),
        RatingLevel::new("Yes", "#23FD22"),
    ])
    .expect("scale");

    let entries = resolve_selection(&template, &scale, None);
    assert_eq!(entries.len(), 2);
    assert_eq!(
        (entries[0].item.as_str(), entries[0].field.as_str()),
        ("Foo", "General")
    );
    assert_eq!(
        (entries[1].item.as_str(), entries[1].field.as_str()),
        ("Bar", "General")
    );
    assert!(entries.iter().all(|entry| entry.rating == "No"));
    assert!(entries.iter().all(|entry| !entry.show_field));
    assert!(entries.iter().all(|entry| entry.comment.is_none()));
}
