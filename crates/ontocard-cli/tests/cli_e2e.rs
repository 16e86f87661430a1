use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

fn ontocard_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ontocard"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new(ontocard_bin())
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("ONTOCARD_CONFIG")
        .args(args)
        .output()
        .expect("spawn ontocard");
    assert!(
        output.status.success(),
        "ontocard {args:?} failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read output")).expect("parse output")
}

const CHUNKS: &str = r#"{"chunk_id":"c1","proposedAdditions":{"classes":[{"name":"Order","description":"A purchase."}],"objectProperties":[{"domain":"Order","name":"hasItem","range":"LineItem"}]}}
{"chunk_id":"c2","proposedAdditions":{"classes":[{"name":"order","description":"A customer purchase order."}],"datatypeProperties":[{"domain":"Order","name":"total","range":"Decimal"}]}}
"#;

const FOAF: &str = r#"@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
foaf:Person a owl:Class ; rdfs:comment "A person." .
foaf:knows a owl:ObjectProperty ; rdfs:domain foaf:Person ; rdfs:range foaf:Person .
"#;

#[test]
fn aggregate_then_build_card_then_export() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("chunks.jsonl"), CHUNKS).unwrap();

    run(root, &["aggregate", "chunks.jsonl", "-o", "agg.json"]);
    let agg = read_json(&root.join("agg.json"));
    assert_eq!(agg["classes"].as_array().unwrap().len(), 1);
    assert_eq!(agg["classes"][0]["name"], "Order");
    assert_eq!(agg["classes"][0]["description"], "A customer purchase order.");

    run(
        root,
        &[
            "build-card",
            "--proposal",
            "agg.json",
            "--previous",
            "missing-card.json",
            "--namespace",
            "http://shop.example/",
            "-o",
            "card.json",
        ],
    );
    let card = read_json(&root.join("card.json"));
    assert_eq!(card["namespace"], "http://shop.example/");
    assert_eq!(card["classes"][0]["origin"], "induced");
    assert_eq!(card["datatypeProperties"][0]["range"], "any");
    let warnings = card["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w.as_str().unwrap().contains("LineItem")));

    run(root, &["export-schema", "--card", "card.json", "--format", "nt", "-o", "card.nt"]);
    let nt = fs::read_to_string(root.join("card.nt")).unwrap();
    assert!(nt.contains("<http://shop.example/Order>"));
    assert!(nt.contains("<http://www.w3.org/2002/07/owl#Class>"));

    run(root, &["extract-card", "card.nt", "--origin", "roundtrip", "-o", "back.json"]);
    let back = read_json(&root.join("back.json"));
    assert_eq!(back["namespace"], "http://shop.example/");
    assert_eq!(back["classes"][0]["origin"], "roundtrip");
}

#[test]
fn catalog_register_and_compose() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("foaf.ttl"), FOAF).unwrap();

    run(
        root,
        &["catalog", "--dir", "onto", "register", "foaf.ttl", "--slug", "foaf", "--tag", "people"],
    );
    let manifest = read_json(&root.join("onto").join("catalog.json"));
    assert_eq!(manifest["ontologies"][0]["namespace"], "http://xmlns.com/foaf/0.1/");
    assert_eq!(manifest["ontologies"][0]["tags"][0], "people");

    let out = run(root, &["catalog", "--dir", "onto", "search-classes", "person"]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("Person"));

    let out = run(
        root,
        &["catalog", "--dir", "onto", "compose", "foaf", "unknown_slug", "-o", "seed.json"],
    );
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown_slug"));
    let seed = read_json(&root.join("seed.json"));
    assert_eq!(seed["classes"][0]["origin"], "foaf");
    assert_eq!(seed["warnings"][0], "Baseline 'unknown_slug' not found in catalog.");
}

#[test]
fn export_instances_uses_chunk_provenance() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("instances.json"),
        r#"[{"chunk_id":"doc1#c3","instances":[{"class":"Invoice","label":"INV-001",
            "mentions":[{"quote":"Invoice INV-001"}]}]}]"#,
    )
    .unwrap();
    fs::write(
        root.join("chunks.jsonl"),
        "{\"chunk_id\":\"doc1#c3\",\"provenance\":{\"source_path\":\"inv.pdf\",\"page\":2}}\n",
    )
    .unwrap();

    run(
        root,
        &[
            "export-instances",
            "instances.json",
            "--chunks",
            "chunks.jsonl",
            "--namespace",
            "http://ex.org/biz/",
            "--format",
            "ntriples",
            "-o",
            "inst.nt",
        ],
    );
    let nt = fs::read_to_string(root.join("inst.nt")).unwrap();
    assert!(nt.contains("<http://ex.org/biz/Invoice>"));
    assert!(nt.contains("\"inv.pdf\""));
    assert!(nt.contains("<http://ex.org/biz/mcp/Mention>"));
}

#[test]
fn configured_default_namespace_applies_without_flags() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("chunks.jsonl"), CHUNKS).unwrap();
    fs::write(root.join("foaf.ttl"), FOAF).unwrap();
    fs::write(
        root.join("ontocard.json"),
        r#"{"defaultNamespace":"http://configured.example/"}"#,
    )
    .unwrap();

    run(root, &["aggregate", "chunks.jsonl", "-o", "agg.json"]);
    run(
        root,
        &["--config", "ontocard.json", "build-card", "--proposal", "agg.json", "-o", "card.json"],
    );
    assert_eq!(read_json(&root.join("card.json"))["namespace"], "http://configured.example/");

    run(root, &["catalog", "--dir", "onto", "register", "foaf.ttl", "--slug", "foaf"]);
    run(
        root,
        &["--config", "ontocard.json", "catalog", "--dir", "onto", "compose", "foaf", "-o", "seed.json"],
    );
    assert_eq!(read_json(&root.join("seed.json"))["namespace"], "http://configured.example/");
}
