use std::collections::BTreeSet;

use crate::model::{Category, DisplayValue, Template};

/// Renders a template back to its line format.
///
/// Names are written in the base language; with `include_translations` every
/// stored translation is re-emitted as a `+ [XX]` overlay line right after the
/// construct it belongs to. Categories are separated by a blank line.
pub fn serialize(template: &Template, include_translations: bool) -> String {
    template
        .categories
        .values()
        .map(|category| serialize_category(category, include_translations))
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_category(category: &Category, include_translations: bool) -> String {
    let mut out = String::new();

    push_line(&mut out, &format!("#{}", category.name.default_text()));
    if include_translations {
        push_overlays(&mut out, &category.name, "#");
    }

    push_line(&mut out, &format!("({})", join_fields(&category.fields, None)));
    if include_translations {
        for lang in field_langs(&category.fields) {
            push_line(
                &mut out,
                &format!(
                    "+ [{}] ({})",
                    lang.to_ascii_uppercase(),
                    join_fields(&category.fields, Some(lang))
                ),
            );
        }
    }

    for item in &category.items {
        push_line(&mut out, &format!("* {}", item.name.default_text()));
        if include_translations {
            push_overlays(&mut out, &item.name, "* ");
        }

        let Some(description) = &item.description else {
            continue;
        };
        let has_text = !description.default_text().is_empty();
        if has_text || (include_translations && description.has_translations()) {
            push_line(&mut out, &format!("? {}", description.default_text()));
            if include_translations {
                push_overlays(&mut out, description, "? ");
            }
        }
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_overlays(out: &mut String, value: &DisplayValue, prefix: &str) {
    for (lang, text) in value.translations() {
        push_line(
            out,
            &format!("+ [{}] {prefix}{text}", lang.to_ascii_uppercase()),
        );
    }
}

fn field_langs(fields: &[DisplayValue]) -> BTreeSet<&str> {
    fields
        .iter()
        .flat_map(|field| field.translations().map(|(lang, _)| lang))
        .collect()
}

fn join_fields(fields: &[DisplayValue], lang: Option<&str>) -> String {
    fields
        .iter()
        .map(|field| {
            lang.and_then(|lang| field.translation(lang))
                .unwrap_or(field.default_text())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
