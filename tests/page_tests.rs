use menu_anchor::{
    localize_pages, LocalizeError, MatcherConfig, NormBox, PageBundle, PageInput, PageRecord,
    PageSize, RawCatalogEntry, RawToken, ValidationError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::{Path, PathBuf};

mod common;
use common::PageBuilder;

fn entry(name: &str, price: Option<f64>) -> RawCatalogEntry {
    RawCatalogEntry {
        name: Some(name.to_string()),
        price,
    }
}

fn page(id: &str, tokens: Vec<RawToken>, catalog: Vec<RawCatalogEntry>) -> PageInput {
    PageInput {
        id: id.to_string(),
        image_url: format!("https://menus.example/{id}.jpg"),
        width: Some(1000.0),
        height: Some(1000.0),
        tokens,
        catalog,
        ..Default::default()
    }
}

fn coffee_page(id: &str) -> PageInput {
    page(
        id,
        vec![RawToken::new("KAHVE", (100.0, 100.0), (160.0, 120.0))],
        vec![entry("KAHVE", Some(45.0)), entry("ÇAY", None)],
    )
}

#[test]
fn test_record_json_shape() {
    let mut builder = PageBuilder::new().size(1000.0, 1000.0);
    builder.add_word("KAHVE", 100.0, 100.0);
    builder.add_item("KAHVE", Some(45.0));
    builder.add_item("ÇAY", None);

    let record = builder
        .localize(&MatcherConfig::default())
        .into_record("https://menus.example/1.jpg");
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "image_url": "https://menus.example/1.jpg",
            "items": [
                {"name": "KAHVE", "price": 45.0, "bbox": [100, 100, 120, 160]},
                {"name": "ÇAY", "price": null, "bbox": null}
            ]
        })
    );

    let back: PageRecord = serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_hit_counts() {
    let result = coffee_page("p1").localize(&MatcherConfig::default()).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.hits(), 1);
    assert_eq!(result.misses(), 1);
    assert_eq!(result.hit_rate(), 0.5);
}

#[test]
fn test_true_size_needs_both_dimensions() {
    let mut input = coffee_page("p1");
    assert_eq!(input.true_size(), Ok(Some(PageSize::new(1000.0, 1000.0))));

    input.height = None;
    assert_eq!(
        input.true_size(),
        Err(ValidationError::PartialPageSize {
            width: Some(1000.0),
            height: None
        })
    );

    input.width = None;
    assert_eq!(input.true_size(), Ok(None));
}

#[test]
fn test_single_dimension_rejects_the_page() {
    let mut input = coffee_page("p1");
    input.width = Some(2000.0);
    input.height = None;
    assert!(matches!(
        input.localize(&MatcherConfig::default()),
        Err(LocalizeError::Validation(ValidationError::PartialPageSize { .. }))
    ));
}

#[test]
fn test_pages_keep_input_order() {
    let pages = vec![coffee_page("c"), coffee_page("a"), coffee_page("b")];
    let results = localize_pages(&pages, &MatcherConfig::default());

    let ids: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    for record in results.values() {
        let record = record.as_ref().unwrap();
        assert_eq!(record.items[0].bbox, Some(NormBox([100, 100, 120, 160])));
        assert_eq!(record.items[1].bbox, None);
    }
}

#[test]
fn test_bad_page_does_not_stop_the_batch() {
    let mut broken = coffee_page("broken");
    broken.catalog.push(RawCatalogEntry {
        name: None,
        price: Some(10.0),
    });
    let pages = vec![coffee_page("ok"), broken];
    let results = localize_pages(&pages, &MatcherConfig::default());

    assert!(results["ok"].is_ok());
    assert!(matches!(
        results["broken"],
        Err(LocalizeError::Validation(ValidationError::MissingName { index: 2 }))
    ));
}

#[test]
fn test_duplicate_page_id_keeps_later_page() {
    let first = coffee_page("dup");
    let mut second = coffee_page("dup");
    second.image_url = "https://menus.example/dup-v2.jpg".to_string();

    let results = localize_pages(&[first, second, coffee_page("other")], &MatcherConfig::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results.get_index_of("dup"), Some(0));
    assert_eq!(
        results["dup"].as_ref().unwrap().image_url,
        "https://menus.example/dup-v2.jpg"
    );
}

#[test]
fn test_bundle_wire_format() {
    let json = r#"{
        "pages": [
            {
                "id": "menu-1",
                "image_url": "https://menus.example/menu-1.jpg",
                "width": 1000,
                "height": 1000,
                "tokens": [
                    {"text": "KAHVE", "topLeft": [100, 100], "bottomRight": [160, 120]}
                ],
                "catalog": [{"name": "KAHVE", "price": 45}]
            },
            {
                "id": "menu-2",
                "image_path": "menu-2.png",
                "tokens": [],
                "catalog": []
            }
        ]
    }"#;
    let bundle: PageBundle = serde_json::from_str(json).unwrap();
    assert_eq!(bundle.pages.len(), 2);
    assert_eq!(
        bundle.pages[0].true_size(),
        Ok(Some(PageSize::new(1000.0, 1000.0)))
    );
    assert_eq!(bundle.pages[1].image_url, "");
    assert_eq!(
        bundle.pages[1].image_path.as_deref(),
        Some(std::path::Path::new("menu-2.png"))
    );

    let results = localize_pages(&bundle.pages, &MatcherConfig::default());
    let record = results["menu-1"].as_ref().unwrap();
    assert_eq!(record.items[0].price, Some(45.0));
    assert_eq!(record.items[0].bbox, Some(NormBox([100, 100, 120, 160])));
    assert!(results["menu-2"].as_ref().unwrap().items.is_empty());
}

#[test]
fn test_invalid_config_rejects_every_page() {
    let config = MatcherConfig {
        conjunctions: vec![String::new()],
        ..MatcherConfig::default()
    };
    let results = localize_pages(&[coffee_page("a"), coffee_page("b")], &config);
    assert!(results
        .values()
        .all(|r| matches!(r, Err(LocalizeError::Config(_)))));
}

/// Scratch directory holding a 640x480 PNG named `menu.png`.
fn image_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("menu-anchor-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    image::RgbImage::new(640, 480)
        .save(dir.join("menu.png"))
        .unwrap();
    dir
}

fn image_page(image_path: &str) -> PageInput {
    PageInput {
        id: "img".to_string(),
        image_path: Some(PathBuf::from(image_path)),
        tokens: vec![RawToken::new("KAHVE", (64.0, 48.0), (128.0, 96.0))],
        catalog: vec![entry("KAHVE", None)],
        ..Default::default()
    }
}

#[test]
fn test_size_read_from_relative_image_path() {
    let dir = image_dir("relative");
    let mut input = image_page("menu.png");
    input.resolve_true_size(&dir).unwrap();
    assert_eq!(input.true_size(), Ok(Some(PageSize::new(640.0, 480.0))));

    let result = input.localize(&MatcherConfig::default()).unwrap();
    assert_eq!(result.items()[0].bbox, Some(NormBox([100, 100, 200, 200])));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_size_read_from_absolute_image_path() {
    let dir = image_dir("absolute");
    let absolute = dir.join("menu.png");
    let mut input = image_page(absolute.to_str().unwrap());
    input.resolve_true_size(Path::new("/nonexistent")).unwrap();
    assert_eq!(input.true_size(), Ok(Some(PageSize::new(640.0, 480.0))));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_explicit_size_wins_over_image() {
    let dir = image_dir("explicit");
    let mut input = image_page("menu.png");
    input.width = Some(1280.0);
    input.height = Some(960.0);
    input.resolve_true_size(&dir).unwrap();
    assert_eq!(input.true_size(), Ok(Some(PageSize::new(1280.0, 960.0))));

    // the image is never opened when both dimensions are given
    let mut unreadable = image_page("missing.png");
    unreadable.width = Some(1280.0);
    unreadable.height = Some(960.0);
    unreadable.resolve_true_size(&dir).unwrap();
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_image_size_failures() {
    let dir = image_dir("failures");

    let mut missing = image_page("missing.png");
    assert!(matches!(
        missing.resolve_true_size(&dir),
        Err(LocalizeError::Image { .. })
    ));

    let mut partial = image_page("menu.png");
    partial.width = Some(640.0);
    assert!(matches!(
        partial.resolve_true_size(&dir),
        Err(LocalizeError::Validation(ValidationError::PartialPageSize { .. }))
    ));

    // no image and no size: left to the token extent
    let mut neither = image_page("menu.png");
    neither.image_path = None;
    neither.resolve_true_size(&dir).unwrap();
    assert_eq!(neither.true_size(), Ok(None));
    std::fs::remove_dir_all(dir).ok();
}
