// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for discovery, caching and rendering.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pageset::{
    path_to_string, MarkerMatch, MemoryCache, MemorySource, PageError, PageResponse,
    RenderConfig, Renderer,
};
use serde_json::json;
use tempfile::TempDir;

const LAYOUT: &str =
    "<html><body>{% block content %}{% endblock %}{% include \"footer.partial.tmpl\" %}</body></html>";
const FOOTER: &str = "<footer>(c) {{ Data.year }}</footer>";
const HOME: &str =
    "{% extends \"base.layout.tmpl\" %}{% block content %}<h1>Hello {{ Data.payload }}</h1>{% endblock %}";

fn memory_renderer() -> Renderer<MemorySource> {
    let source = MemorySource::new()
        .with_file("templates/base.layout.tmpl", LAYOUT)
        .with_file("templates/footer.partial.tmpl", FOOTER)
        .with_file("templates/home.page.tmpl", HOME);
    let mut renderer = Renderer::with_source(source, RenderConfig::new("templates"));
    renderer
        .load_layouts_and_partials([".layout", ".partial"])
        .unwrap();
    renderer
}

/// Create a template directory on disk
fn setup_templates(dir: &Path) {
    fs::create_dir_all(dir.join("templates/partials")).unwrap();
    fs::write(dir.join("templates/base.layout.tmpl"), LAYOUT).unwrap();
    fs::write(dir.join("templates/partials/footer.partial.tmpl"), FOOTER).unwrap();
    fs::write(dir.join("templates/home.page.tmpl"), HOME).unwrap();
    fs::write(dir.join("templates/plain.page.tmpl"), "Hello {{ Data.payload }}").unwrap();
    fs::write(dir.join("templates/README.md"), "not a template").unwrap();
}

fn page_data() -> serde_json::Value {
    json!({ "Data": { "payload": "X", "year": 2026 } })
}

#[test]
fn test_discovery_selects_marked_files_only() {
    let source = MemorySource::new()
        .with_file("templates/a.layout.tmpl", "a")
        .with_file("templates/b.partial.tmpl", "b")
        .with_file("templates/c.page.tmpl", "c");
    let mut renderer = Renderer::with_source(source, RenderConfig::new("templates"));

    renderer
        .load_layouts_and_partials([".layout", ".partial"])
        .unwrap();

    assert_eq!(
        renderer.partials(),
        &[
            "templates/a.layout.tmpl".to_string(),
            "templates/b.partial.tmpl".to_string(),
        ]
    );
}

#[test]
fn test_segment_rule_ignores_directory_names() {
    let source = MemorySource::new()
        .with_file("templates/layouts/nav.tmpl", "nav")
        .with_file("templates/site.layout.tmpl", "site");

    let mut segment = Renderer::with_source(source, RenderConfig::new("templates"));
    segment.load_layouts_and_partials(["layout"]).unwrap();
    assert_eq!(segment.partials(), &["templates/site.layout.tmpl".to_string()]);

    let source = MemorySource::new()
        .with_file("templates/layouts/nav.tmpl", "nav")
        .with_file("templates/site.layout.tmpl", "site");
    let config = RenderConfig::new("templates").with_marker_match(MarkerMatch::Contains);
    let mut contains = Renderer::with_source(source, config);
    contains.load_layouts_and_partials(["layout"]).unwrap();
    assert_eq!(contains.partials().len(), 2);
}

#[test]
fn test_plain_page_renders_payload() {
    let source =
        MemorySource::new().with_file("templates/plain.page.tmpl", "Hello {{ Data.payload }}");
    let renderer = Renderer::with_source(source, RenderConfig::new("templates"));

    let html = renderer
        .render_to_string("plain.page.tmpl", &json!({ "Data": { "payload": "X" } }))
        .unwrap();
    assert_eq!(html, "Hello X");
}

#[test]
fn test_cache_hit_does_not_touch_source() {
    let renderer = memory_renderer();

    let first = renderer.get_compiled("home.page.tmpl").unwrap();
    let reads_after_build = renderer.source().reads();
    assert_eq!(reads_after_build, 3);

    let second = renderer.get_compiled("home.page.tmpl").unwrap();
    renderer
        .render_to_string("home.page.tmpl", &page_data())
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(renderer.source().reads(), reads_after_build);
    assert_eq!(renderer.build_count(), 1);
}

#[test]
fn test_disabled_cache_rebuilds_every_time() {
    let mut renderer = memory_renderer();
    renderer.set_use_cache(false);

    for _ in 0..3 {
        renderer
            .render_to_string("home.page.tmpl", &page_data())
            .unwrap();
    }

    assert_eq!(renderer.build_count(), 3);
    assert_eq!(renderer.source().reads(), 9);
    assert_eq!(renderer.cached_len(), 0);
}

#[test]
fn test_disabling_cache_bypasses_existing_entry() {
    let mut renderer = memory_renderer();
    let cached = renderer.get_compiled("home.page.tmpl").unwrap();

    renderer.set_use_cache(false);
    let fresh = renderer.get_compiled("home.page.tmpl").unwrap();

    assert!(!Arc::ptr_eq(&cached, &fresh));
    assert_eq!(renderer.build_count(), 2);
    assert_eq!(renderer.cached_len(), 1);

    renderer.set_use_cache(true);
    let again = renderer.get_compiled("home.page.tmpl").unwrap();
    assert!(Arc::ptr_eq(&cached, &again));
}

#[test]
fn test_disabled_cache_sees_template_edits() {
    let mut renderer = memory_renderer();
    renderer.set_use_cache(false);

    let before = renderer
        .render_to_string("home.page.tmpl", &page_data())
        .unwrap();
    renderer
        .source()
        .add_file("templates/footer.partial.tmpl", "<footer>edited</footer>");
    let after = renderer
        .render_to_string("home.page.tmpl", &page_data())
        .unwrap();

    assert!(before.contains("(c) 2026"));
    assert!(after.contains("<footer>edited</footer>"));
}

#[test]
fn test_missing_partial_keeps_previous_cache_entry() {
    let renderer = memory_renderer();
    let cached = renderer.get_compiled("home.page.tmpl").unwrap();

    renderer
        .source()
        .remove_file("templates/footer.partial.tmpl");
    let err = renderer.build_from_disk("home.page.tmpl").unwrap_err();

    assert!(matches!(err, PageError::Compile { .. }));
    let still_cached = renderer.get_compiled("home.page.tmpl").unwrap();
    assert!(Arc::ptr_eq(&cached, &still_cached));
}

#[test]
fn test_missing_page_is_not_cached() {
    let renderer = memory_renderer();

    let err = renderer
        .render_to_string("nope.page.tmpl", &page_data())
        .unwrap_err();

    assert!(err.is_compile());
    assert!(!renderer.cache_contains("nope.page.tmpl"));
    assert_eq!(renderer.cached_len(), 0);
}

#[test]
fn test_concurrent_resolution_converges_to_one_entry() {
    let renderer = memory_renderer();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let html = renderer
                    .render_to_string("home.page.tmpl", &page_data())
                    .unwrap();
                assert!(html.contains("<h1>Hello X</h1>"));
            });
        }
    });

    assert_eq!(renderer.cached_len(), 1);
    assert!(renderer.build_count() >= 1);
    assert!(renderer.build_count() <= 8);
}

#[test]
fn test_shared_cache_between_renderers() {
    let shared = MemoryCache::new();
    let source = MemorySource::new().with_file("templates/plain.page.tmpl", "one");
    let first = Renderer::with_source(source, RenderConfig::new("templates"))
        .with_cache(Box::new(shared.clone()));
    let source = MemorySource::new().with_file("templates/plain.page.tmpl", "two");
    let second = Renderer::with_source(source, RenderConfig::new("templates"))
        .with_cache(Box::new(shared));

    assert_eq!(first.render_to_string("plain.page.tmpl", &json!({})).unwrap(), "one");
    assert_eq!(second.render_to_string("plain.page.tmpl", &json!({})).unwrap(), "one");
    assert_eq!(second.build_count(), 0);
}

#[test]
fn test_filesystem_render_to_stream() {
    let temp_dir = TempDir::new().unwrap();
    setup_templates(temp_dir.path());

    let template_dir = path_to_string(temp_dir.path().join("templates"));
    let mut renderer = Renderer::new(RenderConfig::new(template_dir));
    renderer
        .load_layouts_and_partials([".layout", ".partial"])
        .unwrap();
    assert_eq!(renderer.partials().len(), 2);

    let mut response = PageResponse::new();
    renderer
        .render_to_stream(&mut response, "home.page.tmpl", &page_data())
        .unwrap();

    assert!(response.is_success());
    assert_eq!(
        response.body_string(),
        "<html><body><h1>Hello X</h1><footer>(c) 2026</footer></body></html>"
    );
}

#[test]
fn test_filesystem_execution_error_becomes_500() {
    let temp_dir = TempDir::new().unwrap();
    setup_templates(temp_dir.path());

    let template_dir = path_to_string(temp_dir.path().join("templates"));
    let mut renderer = Renderer::new(RenderConfig::new(template_dir));
    renderer
        .load_layouts_and_partials([".layout", ".partial"])
        .unwrap();

    let mut response = PageResponse::new();
    let err = renderer
        .render_to_stream(&mut response, "home.page.tmpl", &json!({ "Data": {} }))
        .unwrap_err();

    assert!(err.is_execution());
    assert_eq!(response.status(), 500);
    assert!(!response.body_string().contains("<html>"));
}

#[test]
fn test_filesystem_missing_directory_fails_discovery() {
    let temp_dir = TempDir::new().unwrap();
    let missing = path_to_string(temp_dir.path().join("does-not-exist"));
    let mut renderer = Renderer::new(RenderConfig::new(missing));

    let err = renderer.load_layouts_and_partials([".layout"]).unwrap_err();
    assert!(matches!(err, PageError::Filesystem { .. }));
}
