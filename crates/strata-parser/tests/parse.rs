use strata_core::identifier::Id;
use strata_core::vocabulary::Vocabulary;
use strata_parser::{ConflictPolicy, Document, ErrorCode, ResolveConfig, Severity, parse};

fn ids(names: &[&str]) -> Vec<Id> {
    names.iter().map(|name| Id::new(name)).collect()
}

#[test]
fn test_patient_with_inline_contact() {
    let documents = [Document::new(
        "patient.graphql",
        r#"
        """
        Demographics and other administrative information about an individual.
        """
        type Patient implements IDomainResource & IResource {
          id: ID
          name: [HumanName]
          contact: [Patient_Contact]
        }

        type Patient_Contact {
          name: HumanName
          organization: Reference
        }
        "#,
    )];

    let corpus = parse(&documents, &ResolveConfig::default()).expect("Failed to parse");

    let patient = corpus.resource(Id::new("Patient")).expect("Patient resource");
    assert_eq!(patient.document(), "patient.graphql");
    assert_eq!(
        patient.references().iter().copied().collect::<Vec<_>>(),
        ids(&["HumanName", "ID", "Patient_Contact", "Reference"])
    );

    let ownership = corpus.ownership();
    assert_eq!(ownership.owner(Id::new("Patient_Contact")), Some(Id::new("Patient")));
    assert_eq!(ownership.len(), 2);
}

#[test]
fn test_every_document_yields_one_resource() {
    let documents = [
        Document::new("observation.graphql", "# generated file, intentionally empty\n"),
        Document::new("garbage.graphql", "}}} type { :: [[ \"unterminated"),
        Document::new(
            "bundle.graphql",
            "type Bundle_Entry { resource: Resource }\ntype Bundle implements IResource { entry: [Bundle_Entry] }",
        ),
    ];

    let corpus = parse(&documents, &ResolveConfig::default()).expect("Failed to parse");
    let resources: Vec<Id> = corpus.resources().map(|entry| entry.resource()).collect();

    assert_eq!(resources, ids(&["Bundle", "Garbage", "Observation"]));
    assert!(corpus.resource(Id::new("Garbage")).unwrap().references().is_empty());
}

#[test]
fn test_custom_vocabulary_markers() {
    let vocabulary = Vocabulary::new(["String"], ["Node"]).expect("valid vocabulary");
    let config = ResolveConfig::new(vocabulary, ConflictPolicy::default());
    let documents = [Document::new(
        "user.graphql",
        "type UserEdge { node: User }\ntype User implements Node { name: String }",
    )];

    let corpus = parse(&documents, &config).expect("Failed to parse");
    assert!(corpus.resource(Id::new("User")).is_some());
    assert_eq!(corpus.ownership().owner(Id::new("UserEdge")), Some(Id::new("User")));
}

#[test]
fn test_conflicts_follow_policy() {
    let documents = [
        Document::new(
            "practitioner.graphql",
            "type Practitioner implements IDomainResource { name: [HumanName] }\ntype HumanName { text: String }",
        ),
        Document::new("humanname.graphql", "type HumanName { family: String }"),
    ];

    let rejected = parse(
        &documents,
        &ResolveConfig::new(Vocabulary::default(), ConflictPolicy::Reject),
    )
    .expect_err("conflict should be rejected");
    let diagnostic = &rejected.diagnostics()[0];
    assert_eq!(diagnostic.severity(), Severity::Error);
    assert_eq!(diagnostic.code(), Some(ErrorCode::E100));
    assert_eq!(diagnostic.document(), Some("practitioner.graphql"));
    assert!(rejected.to_string().contains("HumanName"));

    let last = parse(&documents, &ResolveConfig::default()).expect("Failed to parse");
    assert_eq!(
        last.ownership().owner(Id::new("HumanName")),
        Some(Id::new("Practitioner"))
    );
    assert_eq!(last.warnings().len(), 1);

    let first = parse(
        &documents,
        &ResolveConfig::new(Vocabulary::default(), ConflictPolicy::FirstDocument),
    )
    .expect("Failed to parse");
    assert_eq!(
        first.ownership().owner(Id::new("HumanName")),
        Some(Id::new("HumanName"))
    );
}

#[test]
fn test_warning_labels_point_into_document() {
    let practitioner = "type Practitioner { name: [HumanName] }\ntype HumanName { text: String }";
    let documents = [
        Document::new("practitioner.graphql", practitioner),
        Document::new("humanname.graphql", "type HumanName { family: String }"),
    ];

    let config = ResolveConfig::new(Vocabulary::default(), ConflictPolicy::FirstDocument);
    let corpus = parse(&documents, &config).expect("Failed to parse");

    let warning = &corpus.warnings()[0];
    assert_eq!(warning.document(), Some("practitioner.graphql"));
    let span = warning.labels()[0].span();
    assert_eq!(span.slice(practitioner), Some("HumanName"));
    assert!(warning.help().unwrap().contains("humanname.graphql"));
}
