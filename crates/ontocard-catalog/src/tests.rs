//! Catalog tests against a real directory.

use super::*;
use chrono::TimeZone;
use ontocard_schema::CanonicalRange;
use proptest::prelude::*;
use tempfile::tempdir;

const FOAF: &str = r#"
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

foaf:Person a owl:Class ; rdfs:comment "A person." .
foaf:Agent a owl:Class ; rdfs:comment "An agent (eg. person, group, software or physical artifact)." .
foaf:name a owl:DatatypeProperty ; rdfs:domain foaf:Person ; rdfs:range xsd:string .
foaf:age a owl:DatatypeProperty ; rdfs:domain foaf:Agent ; rdfs:range xsd:nonNegativeInteger .
foaf:knows a owl:ObjectProperty ; rdfs:domain foaf:Person ; rdfs:range foaf:Person ;
    rdfs:comment "A person known by this person." .
"#;

const SCHEMA_ORG: &str = r#"
@prefix schema: <https://schema.org/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

schema:Person a rdfs:Class ; rdfs:comment "A person (alive, dead, undead, or fictional)." .
schema:Organization a rdfs:Class ; rdfs:comment "An organization such as a school or corporation." .
schema:name a owl:DatatypeProperty ; rdfs:domain schema:Person ; rdfs:range xsd:string .
schema:worksFor a owl:ObjectProperty ; rdfs:domain schema:Person ; rdfs:range schema:Organization .
"#;

/// Helper to create a catalog in a fresh directory
fn test_catalog() -> (OntologyCatalog, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let catalog = OntologyCatalog::new(CatalogConfig::at(dir.path()));
    (catalog, dir)
}

fn seeded() -> (OntologyCatalog, tempfile::TempDir) {
    let (catalog, dir) = test_catalog();
    catalog
        .register(RegisterRequest::new("foaf", FOAF).label("FOAF").tags(["people"]))
        .unwrap();
    catalog
        .register(RegisterRequest::new("schema", SCHEMA_ORG))
        .unwrap();
    (catalog, dir)
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn register_writes_file_and_manifest() {
    let (catalog, dir) = test_catalog();
    let entry = catalog.register(RegisterRequest::new("foaf", FOAF)).unwrap();

    assert_eq!(entry.slug, "foaf");
    assert_eq!(entry.label, "foaf");
    assert_eq!(entry.path, "foaf.ttl");
    assert_eq!(entry.namespace, "http://xmlns.com/foaf/0.1/");
    assert!(entry.tags.is_empty());

    let stored = std::fs::read_to_string(dir.path().join("foaf.ttl")).unwrap();
    assert_eq!(stored, FOAF);
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("catalog.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["ontologies"][0]["slug"], "foaf");
}

#[test]
fn explicit_namespace_is_kept() {
    let (catalog, _dir) = test_catalog();
    let entry = catalog
        .register(RegisterRequest::new("foaf", FOAF).namespace("http://custom.org/"))
        .unwrap();
    assert_eq!(entry.namespace, "http://custom.org/");
    let inspected = catalog.inspect("foaf").unwrap();
    assert_eq!(inspected.card.namespace, "http://custom.org/");
}

#[test]
fn re_registering_replaces_entry_and_keeps_slug_order() {
    let (catalog, _dir) = test_catalog();
    catalog.register(RegisterRequest::new("zeta", FOAF)).unwrap();
    catalog.register(RegisterRequest::new("alpha", SCHEMA_ORG)).unwrap();
    catalog
        .register(RegisterRequest::new("zeta", SCHEMA_ORG).label("Zeta v2"))
        .unwrap();

    let list = catalog.list().unwrap();
    let slugs: Vec<_> = list.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "zeta"]);
    assert_eq!(list[1].label, "Zeta v2");
    assert_eq!(list[1].namespace, "https://schema.org/");
}

#[test]
fn validation_happens_before_any_write() {
    let (catalog, dir) = test_catalog();

    assert!(matches!(
        catalog.register(RegisterRequest::new("  ", FOAF)),
        Err(CatalogError::EmptySlug)
    ));
    assert!(matches!(
        catalog.register(RegisterRequest::new("foaf", " \n")),
        Err(CatalogError::EmptyContent(_))
    ));
    assert!(matches!(
        catalog.register(RegisterRequest::new("../escape", FOAF)),
        Err(CatalogError::InvalidSlug(_))
    ));
    assert!(matches!(
        catalog.register(RegisterRequest::new("Induced", FOAF)),
        Err(CatalogError::ReservedSlug(_))
    ));
    assert!(matches!(
        catalog.register(RegisterRequest::new("broken", "@prefix nope")),
        Err(CatalogError::Rdf { .. })
    ));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn non_turtle_content_is_stored_as_turtle() {
    let (catalog, dir) = test_catalog();
    let nt = "<http://ex.org/voc/Thing> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n";
    let entry = catalog
        .register(RegisterRequest::new("nt", nt).format(RdfFormat::NTriples))
        .unwrap();
    assert_eq!(entry.path, "nt.ttl");
    assert!(dir.path().join("nt.ttl").exists());

    let inspected = catalog.inspect("nt").unwrap();
    assert_eq!(inspected.counts.classes, 1);
    assert_eq!(inspected.card.classes[0].name, "Thing");
}

#[test]
fn concurrent_registrations_through_one_handle_lose_nothing() {
    let (catalog, dir) = test_catalog();
    let slugs: Vec<String> = (0..12).rev().map(|i| format!("onto{i:02}")).collect();

    std::thread::scope(|scope| {
        for slug in &slugs {
            let catalog = &catalog;
            scope.spawn(move || {
                catalog
                    .register(RegisterRequest::new(slug.as_str(), FOAF).label(slug.to_uppercase()))
                    .unwrap();
            });
        }
    });

    let listed: Vec<_> = catalog.list().unwrap().into_iter().map(|e| e.slug).collect();
    let mut expected = slugs.clone();
    expected.sort();
    assert_eq!(listed, expected);
    for slug in &slugs {
        assert!(dir.path().join(format!("{slug}.ttl")).exists());
    }
    assert_eq!(catalog.entry("onto07").unwrap().unwrap().label, "ONTO07");
}

// ============================================================================
// Browsing
// ============================================================================

#[test]
fn inspect_reports_counts_and_origins() {
    let (catalog, _dir) = seeded();
    let report = catalog.inspect("foaf").unwrap();

    assert_eq!(report.label, "FOAF");
    assert_eq!(
        report.counts,
        CardCounts {
            classes: 2,
            datatype_properties: 2,
            object_properties: 1
        }
    );
    assert!(report
        .card
        .classes
        .iter()
        .all(|c| c.origin == Origin::baseline("foaf")));
    let age = report
        .card
        .datatype_properties
        .iter()
        .find(|p| p.name == "age")
        .unwrap();
    assert_eq!(age.range, CanonicalRange::Integer);

    assert!(matches!(
        catalog.inspect("missing"),
        Err(CatalogError::UnknownSlug(s)) if s == "missing"
    ));
}

#[test]
fn class_search_matches_name_or_description() {
    let (catalog, _dir) = seeded();

    let hits = catalog.search_classes("  PERSON ").unwrap();
    let found: Vec<_> = hits.iter().map(|h| (h.ontology.as_str(), h.class.as_str())).collect();
    assert_eq!(
        found,
        vec![("foaf", "Agent"), ("foaf", "Person"), ("schema", "Person")]
    );

    let hits = catalog.search_classes("corporation").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].class, "Organization");

    assert!(matches!(catalog.search_classes("   "), Err(CatalogError::EmptyQuery)));
}

#[test]
fn property_search_covers_both_kinds() {
    let (catalog, _dir) = seeded();

    let hits = catalog.search_properties("organization").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].property, "worksFor");
    assert_eq!(hits[0].kind, PropertyKind::Object);

    let hits = catalog.search_properties("string").unwrap();
    let names: Vec<_> = hits.iter().map(|h| (h.ontology.as_str(), h.property.as_str())).collect();
    assert_eq!(names, vec![("foaf", "name"), ("schema", "name")]);
    assert!(hits.iter().all(|h| h.kind == PropertyKind::Datatype));

    assert!(matches!(catalog.search_properties(""), Err(CatalogError::EmptyQuery)));
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn compose_with_unknown_slug_warns_and_continues() {
    let (catalog, _dir) = seeded();
    let card = catalog
        .compose_at(&["foaf", "unknown_slug"], None, now())
        .unwrap();

    let names: Vec<_> = card.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Agent", "Person"]);
    assert!(card.classes.iter().all(|c| c.origin == Origin::baseline("foaf")));
    assert_eq!(
        card.warnings,
        vec!["Baseline 'unknown_slug' not found in catalog.".to_string()]
    );
    assert_eq!(card.version, "2024-06-01T00:00:00Z");
}

#[test]
fn compose_precedence_follows_slug_order() {
    let (catalog, _dir) = seeded();

    let ab = catalog.compose_at(&["foaf", "schema"], Some("http://t.org/"), now()).unwrap();
    let ba = catalog.compose_at(&["schema", "foaf"], Some("http://t.org/"), now()).unwrap();

    let person = |card: &SchemaCard| card.classes.iter().find(|c| c.name == "Person").cloned().unwrap();
    assert_eq!(person(&ab).origin, Origin::baseline("foaf"));
    assert_eq!(person(&ab).description, "A person.");
    assert_eq!(person(&ba).origin, Origin::baseline("schema"));
    assert_eq!(ab.namespace, "http://t.org/");

    let names = |card: &SchemaCard| card.classes.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&ab), names(&ba));
}

#[test]
fn compose_fails_when_a_registered_file_is_gone() {
    let (catalog, dir) = seeded();
    std::fs::remove_file(dir.path().join("schema.ttl")).unwrap();
    assert!(matches!(
        catalog.compose_at(&["schema"], None, now()),
        Err(CatalogError::Io { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn composed_name_set_is_order_independent(order in Just(vec!["foaf", "schema", "nope"]).prop_shuffle()) {
        let (catalog, _dir) = seeded();
        let card = catalog.compose_at(&order[..], None, now()).unwrap();
        let reference = catalog.compose_at(&["foaf", "schema", "nope"], None, now()).unwrap();

        let classes = |c: &SchemaCard| c.classes.iter().map(|e| e.name.to_lowercase()).collect::<Vec<_>>();
        prop_assert_eq!(classes(&card), classes(&reference));
        prop_assert_eq!(card.datatype_properties.len(), reference.datatype_properties.len());
        prop_assert_eq!(card.object_properties.len(), reference.object_properties.len());
        prop_assert_eq!(card.warnings.len(), 1);
    }
}
