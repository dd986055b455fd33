// Tests for report file naming

use lightbatch_core::naming::{
    MAX_NAME_LEN, SiteOutputs, build_sites, derive_name, has_scheme, sanitize_name,
};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Sanitizing Tests
// ============================================================================

#[test]
fn test_sanitize_strips_scheme() {
    assert_eq!(sanitize_name("https://example.com"), "example_com");
    assert_eq!(sanitize_name("http://example.com"), "example_com");
}

#[test]
fn test_sanitize_replaces_punctuation() {
    assert_eq!(
        sanitize_name("https://user@example.com:8080/a/b?q=1#top!*$"),
        "user_example_com_8080_a_b_q=1_top___"
    );
}

#[test]
fn test_has_scheme_only_at_start() {
    assert!(has_scheme("https://example.com"));
    assert!(has_scheme("chrome-extension://abc"));
    assert!(!has_scheme("example.com"));
    assert!(!has_scheme("example.com/login?next=https://example.com/home"));
    assert!(!has_scheme("://example.com"));
}

#[test]
fn test_sanitize_keeps_nested_url_scheme() {
    assert_eq!(
        sanitize_name("example.com/?u=http://x.io"),
        "example_com__u=http___x_io"
    );
}

#[test]
fn test_sanitize_without_scheme() {
    assert_eq!(sanitize_name("example.com/about"), "example_com_about");
}

// ============================================================================
// Name Derivation Tests
// ============================================================================

#[test]
fn test_derive_name_records_in_seen() {
    let mut seen = HashSet::new();
    let name = derive_name("https://example.com", &mut seen);
    assert_eq!(name, "example_com");
    assert!(seen.contains("example_com"));
}

#[test]
fn test_derive_name_collisions_get_numeric_suffix() {
    let mut seen = HashSet::new();
    let names: Vec<String> = (0..4)
        .map(|_| derive_name("https://example.com", &mut seen))
        .collect();

    assert_eq!(
        names,
        vec!["example_com", "example_com_1", "example_com_2", "example_com_3"]
    );
}

#[test]
fn test_derive_name_scheme_variants_collide() {
    let mut seen = HashSet::new();
    let first = derive_name("http://example.com", &mut seen);
    let second = derive_name("https://example.com", &mut seen);
    assert_eq!(first, "example_com");
    assert_eq!(second, "example_com_1");
}

#[test]
fn test_derive_name_is_case_sensitive() {
    let mut seen = HashSet::new();
    let lower = derive_name("https://example.com/Page", &mut seen);
    let upper = derive_name("https://example.com/page", &mut seen);
    assert_eq!(lower, "example_com_Page");
    assert_eq!(upper, "example_com_page");
}

#[test]
fn test_derive_name_suffix_skips_taken_names() {
    let mut seen = HashSet::new();
    seen.insert("example_com".to_string());
    seen.insert("example_com_1".to_string());
    assert_eq!(derive_name("https://example.com", &mut seen), "example_com_2");
}

#[test]
fn test_long_name_truncated_with_hash() {
    let long_path = "a".repeat(150);
    let url = format!("https://example.com/{}", long_path);
    let mut seen = HashSet::new();
    let name = derive_name(&url, &mut seen);

    assert_eq!(name.len(), MAX_NAME_LEN + 8);
    let (stem, hash) = name.split_at(MAX_NAME_LEN);
    assert!(stem.starts_with("example_com_aaaa"));
    assert!(hash.starts_with('_'));
    assert!(hash[1..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_long_name_trailing_underscores_trimmed() {
    // Character 100 falls inside a run of separators
    let url = format!("https://{}{}", "b".repeat(95), "/".repeat(20));
    let mut seen = HashSet::new();
    let name = derive_name(&url, &mut seen);

    assert!(name.starts_with(&format!("{}_", "b".repeat(95))));
    assert_eq!(name.len(), 95 + 8);
}

#[test]
fn test_long_names_differing_after_cutoff_stay_distinct() {
    let prefix = "c".repeat(120);
    let mut seen = HashSet::new();
    let a = derive_name(&format!("https://{}/one", prefix), &mut seen);
    let b = derive_name(&format!("https://{}/two", prefix), &mut seen);

    assert_ne!(a, b);
    assert_eq!(a[..MAX_NAME_LEN], b[..MAX_NAME_LEN]);
}

#[test]
fn test_long_name_hash_is_stable() {
    let url = format!("https://example.com/{}", "d".repeat(200));
    let a = derive_name(&url, &mut HashSet::new());
    let b = derive_name(&url, &mut HashSet::new());
    assert_eq!(a, b);
}

#[test]
fn test_names_never_exceed_limit_before_suffix() {
    let urls = [
        "https://example.com".to_string(),
        format!("https://example.com/{}", "x".repeat(99)),
        format!("https://example.com/{}", "y".repeat(500)),
        format!("https://{}.example.com/{}", "z".repeat(63), "p/".repeat(80)),
    ];
    for url in &urls {
        let name = derive_name(url, &mut HashSet::new());
        assert!(name.len() <= MAX_NAME_LEN + 8, "{} is too long", name);
    }
}

// ============================================================================
// Site Construction Tests
// ============================================================================

#[test]
fn test_build_sites_json_only() {
    let urls = vec!["https://example.com".to_string(), "https://example.com".to_string()];
    let sites = build_sites(&urls, SiteOutputs::default());

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].name, "example_com");
    assert_eq!(sites[0].output_file, "example_com.report.json");
    assert_eq!(sites[1].output_file, "example_com_1.report.json");
    assert!(sites[0].html_file.is_none());
    assert!(sites[0].csv_file.is_none());

    let out = Path::new("/tmp/out");
    assert_eq!(
        sites[0].engine_output_path(out),
        out.join("example_com.report.json")
    );
}

#[test]
fn test_build_sites_with_html_and_csv() {
    let urls = vec!["https://web.dev/learn".to_string()];
    let sites = build_sites(&urls, SiteOutputs { html: true, csv: true });
    let site = &sites[0];

    assert_eq!(site.html_file.as_deref(), Some("web_dev_learn.report.html"));
    assert_eq!(site.csv_file.as_deref(), Some("web_dev_learn.report.csv"));

    let out = Path::new("/tmp/out");
    assert_eq!(site.engine_output_path(out), out.join("web_dev_learn"));
    assert_eq!(site.report_path(out), out.join("web_dev_learn.report.json"));
    assert_eq!(site.formats().len(), 3);
}
