//! Example: Leveling an in-memory set of documents
//!
//! This example runs the analysis pipeline over documents built in code,
//! without touching the file system, and prints both outputs.

use strata::{Analyzer, Document, StrataError, config::AppConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let documents = vec![
        Document::new(
            "patient.graphql",
            r#"
            type Patient implements IDomainResource {
              name: [HumanName]
              contact: [Patient_Contact]
              managingOrganization: Organization
            }

            type Patient_Contact {
              organization: Organization
            }
            "#,
        ),
        Document::new(
            "organization.graphql",
            "type Organization implements IDomainResource { name: String partOf: Organization }",
        ),
        Document::new("humanname.graphql", "type HumanName { family: String given: [String] }"),
    ];

    let analyzer = Analyzer::new(AppConfig::default());

    let analysis = match analyzer.analyze(&documents) {
        Ok(analysis) => analysis,
        Err(StrataError::Cycle(cycle)) => {
            eprintln!("{cycle}");
            print!("{}", analyzer.render_csv(cycle.resolved())?);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Levels:\n");
    print!("{}", analyzer.render_csv(analysis.levels())?);

    println!("\nTrees:\n");
    println!("{}", analyzer.render_json(analysis.trees())?);

    Ok(())
}
