use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use pagepress_engine::{
    MetadataOutcome, MetadataProcessor, MetadataSettings, Page, PageMetadata, PropertyNames,
    PropertyValue, TextRun,
};
use pretty_assertions::assert_eq;

fn processor(mapping: &[(&str, &str)]) -> MetadataProcessor {
    MetadataProcessor::new(MetadataSettings {
        category_map: mapping
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect::<BTreeMap<_, _>>(),
        draft_status: "Draft".to_string(),
        properties: PropertyNames::default(),
    })
}

fn page() -> Page {
    Page::new(
        "0f3c9a",
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
    )
    .with_property(
        "Name",
        PropertyValue::Title {
            value: vec![TextRun::plain("Hello "), TextRun::plain("World").bold()],
        },
    )
}

fn categories(names: &[&str]) -> PropertyValue {
    PropertyValue::MultiSelect {
        value: names.iter().map(|n| n.to_string()).collect(),
    }
}

fn proceed(outcome: MetadataOutcome) -> PageMetadata {
    match outcome {
        MetadataOutcome::Proceed(metadata) => metadata,
        MetadataOutcome::Skip { category } => panic!("unexpected skip on {category}"),
    }
}

#[test]
fn unmapped_category_skips_page() {
    let page = page().with_property("Categories", categories(&["Tech", "Life"]));
    let outcome = processor(&[("Tech", "tech")]).derive(&page);
    assert_eq!(
        outcome,
        MetadataOutcome::Skip {
            category: "Life".to_string()
        }
    );
}

#[test]
fn first_category_sets_directory_and_names_are_kept() {
    let page = page().with_property("Categories", categories(&["Life", "Tech"]));
    let metadata = proceed(processor(&[("Tech", "tech"), ("Life", "life")]).derive(&page));
    assert_eq!(metadata.category_dir.as_deref(), Some("life"));
    assert_eq!(metadata.categories, vec!["Life", "Tech"]);
}

#[test]
fn single_select_category_takes_precedence() {
    let page = page()
        .with_property(
            "Category",
            PropertyValue::Select {
                value: Some("Tech".to_string()),
            },
        )
        .with_property("Categories", categories(&["Unmapped"]));
    let metadata = proceed(processor(&[("Tech", "tech")]).derive(&page));
    assert_eq!(metadata.category_dir.as_deref(), Some("tech"));
    assert_eq!(metadata.categories, vec!["Tech"]);
}

#[test]
fn no_category_property_means_no_category() {
    let metadata = proceed(processor(&[]).derive(&page()));
    assert_eq!(metadata.category_dir, None);
    assert!(metadata.categories.is_empty());
}

#[test]
fn extracts_page_fields() {
    let mut page = page()
        .with_property("Tags", categories(&["rust", "cli"]))
        .with_property(
            "Status",
            PropertyValue::Status {
                value: Some("Draft".to_string()),
            },
        )
        .with_property(
            "Description",
            PropertyValue::RichText {
                value: vec![TextRun::plain("About things")],
            },
        )
        .with_property(
            "Meta Title",
            PropertyValue::RichText {
                value: vec![TextRun::plain("SEO title")],
            },
        )
        .with_property(
            "Slug",
            PropertyValue::RichText {
                value: vec![TextRun::plain("hello")],
            },
        )
        .with_property("Toc", PropertyValue::Checkbox { value: true })
        .with_property("Comments", PropertyValue::Checkbox { value: false })
        .with_property("Weight", PropertyValue::Number { value: Some(3.0) });
    page.created_by = Some("Ada".to_string());
    page.cover = Some("https://files/cover.jpg".to_string());

    let metadata = proceed(processor(&[]).derive(&page));
    assert_eq!(metadata.title, "Hello World");
    assert_eq!(metadata.created, page.created_time);
    assert_eq!(metadata.modified, page.last_edited_time);
    assert_eq!(metadata.author.as_deref(), Some("Ada"));
    assert_eq!(metadata.cover.as_deref(), Some("https://files/cover.jpg"));
    assert_eq!(metadata.description.as_deref(), Some("About things"));
    assert_eq!(metadata.meta_title.as_deref(), Some("SEO title"));
    assert_eq!(metadata.slug.as_deref(), Some("hello"));
    assert!(metadata.draft);
    assert_eq!(metadata.toc, Some(true));
    assert_eq!(metadata.comments, Some(false));
    assert_eq!(metadata.weight, 3);
    assert_eq!(metadata.tags, vec!["rust", "cli"]);
}

#[test]
fn non_draft_status() {
    let page = page().with_property(
        "Status",
        PropertyValue::Status {
            value: Some("Published".to_string()),
        },
    );
    assert!(!proceed(processor(&[]).derive(&page)).draft);
}

#[test]
fn mistyped_properties_are_treated_as_absent() {
    let page = page()
        .with_property("Tags", PropertyValue::Checkbox { value: true })
        .with_property("Toc", PropertyValue::RichText { value: vec![] })
        .with_property("Description", PropertyValue::Number { value: Some(1.0) })
        .with_property("Weight", PropertyValue::Select { value: None })
        .with_property("Categories", PropertyValue::Unsupported);

    let metadata = proceed(processor(&[]).derive(&page));
    assert!(metadata.tags.is_empty());
    assert_eq!(metadata.toc, None);
    assert_eq!(metadata.description, None);
    assert_eq!(metadata.weight, 0);
    assert_eq!(metadata.category_dir, None);
}

#[test]
fn property_names_are_configurable() {
    let processor = MetadataProcessor::new(MetadataSettings {
        category_map: BTreeMap::from([("Notes".to_string(), "notes".to_string())]),
        draft_status: "WIP".to_string(),
        properties: PropertyNames {
            title: "Title".to_string(),
            categories: "Sections".to_string(),
            status: "State".to_string(),
            ..PropertyNames::default()
        },
    });
    let page = Page::new("p1", Utc::now(), Utc::now())
        .with_property(
            "Title",
            PropertyValue::Title {
                value: vec![TextRun::plain("Renamed")],
            },
        )
        .with_property("Sections", categories(&["Notes"]))
        .with_property(
            "State",
            PropertyValue::Select {
                value: Some("WIP".to_string()),
            },
        );

    let metadata = proceed(processor.derive(&page));
    assert_eq!(metadata.title, "Renamed");
    assert_eq!(metadata.category_dir.as_deref(), Some("notes"));
    assert!(metadata.draft);
}

#[test]
fn page_properties_deserialize_from_json() {
    let page: Page = serde_json::from_str(
        r#"{
            "id": "abc",
            "created_time": "2024-01-01T00:00:00Z",
            "last_edited_time": "2024-01-02T00:00:00Z",
            "properties": {
                "Name": {"type": "title", "value": [{"content": "From JSON"}]},
                "Categories": {"type": "multi_select", "value": ["Tech"]},
                "Rollup": {"type": "rollup", "value": 3}
            }
        }"#,
    )
    .unwrap();
    assert_eq!(page.property("Rollup"), Some(&PropertyValue::Unsupported));

    let metadata = proceed(processor(&[("Tech", "tech")]).derive(&page));
    assert_eq!(metadata.title, "From JSON");
    assert_eq!(metadata.category_dir.as_deref(), Some("tech"));
}
