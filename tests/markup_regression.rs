//! Markup regression tests over the demo descriptions
//!
//! These tests render every description in `demos/` and verify the output is
//! a well-formed standalone document. Byte-for-byte baselines are avoided on
//! purpose: the stylesheet carries many numbers that may legitimately shift,
//! so the checks are structural.

use std::fs;
use std::path::Path;

use chatshot::input::Syntax;
use chatshot::{render_description, GenerateOptions};

fn is_description(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

/// Every container tag opened must be closed again; void tags like img and
/// meta are not checked.
fn assert_balanced(html: &str, tag: &str, path: &Path) {
    let opened = html.matches(&format!("<{}", tag)).count();
    let closed = html.matches(&format!("</{}>", tag)).count();
    assert_eq!(
        opened, closed,
        "Unbalanced <{}> in rendering of {}",
        tag,
        path.display()
    );
}

#[test]
fn test_all_demos_render_to_wellformed_documents() {
    let demos_dir = Path::new("demos");

    if !demos_dir.exists() {
        panic!("Demos directory not found at {:?}", demos_dir);
    }

    let mut tested = 0;
    let mut failures = Vec::new();

    for entry in fs::read_dir(demos_dir).expect("Failed to read demos directory") {
        let path = entry.expect("Failed to read entry").path();
        if !is_description(&path) {
            continue;
        }

        let source = fs::read_to_string(&path).expect(&format!("Failed to read {:?}", path));
        let syntax = Syntax::from_path(&path);

        match render_description(&source, syntax, &GenerateOptions::default()) {
            Ok(document) => {
                let html = document.html();
                if !html.starts_with("<!DOCTYPE html>") {
                    failures.push(format!("{}: missing doctype", path.display()));
                }
                if !html.ends_with("</html>\n") {
                    failures.push(format!("{}: missing closing html tag", path.display()));
                }
                for section in ["status-bar", "header", "chat-area", "input-bar"] {
                    if !html.contains(section) {
                        failures.push(format!("{}: missing {} section", path.display(), section));
                    }
                }
                assert_balanced(html, "div", &path);
                assert_balanced(html, "span", &path);
                tested += 1;
            }
            Err(e) => {
                failures.push(format!("Failed to render {}: {:?}", path.display(), e));
            }
        }
    }

    println!("Markup rendering: {} tested, {} failures", tested, failures.len());

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  - {}", failure);
        }
        panic!(
            "{} rendering test(s) failed. See output above.",
            failures.len()
        );
    }

    assert!(tested > 0, "No description files found in demos directory");
}

#[test]
fn test_sales_chat_demo_substitutes_its_defaults() {
    let source = fs::read_to_string("demos/sales-chat.yaml").expect("Should read demo");
    let document = render_description(&source, Syntax::Yaml, &GenerateOptions::default())
        .expect("Should render");

    assert!(document.html().contains("María García"));
    assert!(document.html().contains("¡Hola María García!"));
    assert!(!document.html().contains("{{contact_name}}"));
}

#[test]
fn test_dark_android_demo_uses_android_metrics() {
    let source = fs::read_to_string("demos/dark-android.yaml").expect("Should read demo");
    let document = render_description(&source, Syntax::Yaml, &GenerateOptions::default())
        .expect("Should render");

    // Android renders at 3x and dark mode tints the chat pattern
    assert_eq!(document.scale(), 3.0);
    assert!(document.html().contains("linear-gradient"));
    assert!(document.html().contains("escribiendo..."));
}

#[test]
fn test_markup_text_demo_is_escaped() {
    let source = fs::read_to_string("demos/markup-text.yaml").expect("Should read demo");
    let document = render_description(&source, Syntax::Yaml, &GenerateOptions::default())
        .expect("Should render");
    let html = document.html();

    assert!(html.contains("&lt;fix&gt;"));
    assert!(html.contains("&quot;todo&quot;"));
    assert!(html.contains("revierto &amp; abro un ticket"));
    assert!(html.contains("ya lo vi...<br>revierto"));
    assert!(!html.contains("<fix>"));
}

#[test]
fn test_minimal_json_demo_keeps_its_width() {
    let source = fs::read_to_string("demos/minimal.json").expect("Should read demo");
    let document = render_description(&source, Syntax::Json, &GenerateOptions::default())
        .expect("Should render");

    assert_eq!(document.width(), 420);
    assert!(document.html().contains("width: 420px;"));
}
