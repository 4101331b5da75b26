use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::{
    config::{
        knowledge_base_path_from_env_value, top_n_from_env_value,
        unknown_tag_policy_from_env_value,
    },
    constants::{ENV_KB_PATH, ENV_TOP_N, ENV_UNKNOWN_TAGS},
    CoreConfig, DiseaseRecord, SelectionSet, TagId, TriageService, UnknownTagPolicy,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom triage advisor (educational, non-diagnostic)")]
struct Cli {
    /// Knowledge base YAML file replacing the built-in one
    #[arg(long, global = true)]
    kb: Option<PathBuf>,

    /// How to treat tags outside the vocabulary: reject or ignore
    #[arg(long, global = true)]
    unknown_tags: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List diseases in the knowledge base
    Diseases,
    /// Show one disease by name or alias
    Show {
        /// Disease name or alias
        name: String,
    },
    /// List the tag vocabulary, red flags and safety notice
    Vocabulary,
    /// Score diseases and classify urgency from selected tags
    Assess {
        /// Symptom tag (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<TagId>,
        /// Exposure tag (repeatable)
        #[arg(long = "exposure")]
        exposures: Vec<TagId>,
        /// Severity flag that is set, e.g. moderate_dehydration (repeatable)
        #[arg(long = "flag")]
        flags: Vec<TagId>,
        /// Comorbidity tag (repeatable)
        #[arg(long = "comorbidity")]
        comorbidities: Vec<TagId>,
        /// Days unwell
        #[arg(long, default_value_t = 0)]
        days_sick: u32,
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Match a free-text description against the knowledge base
    Match {
        /// Description of symptoms
        text: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage=warn".parse()?)
                .add_directive("knowledge=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'triage --help' for commands");
        return Ok(());
    };

    let kb_path = cli
        .kb
        .or_else(|| knowledge_base_path_from_env_value(std::env::var(ENV_KB_PATH).ok()));
    let unknown_tags = match cli.unknown_tags {
        Some(value) => value.parse::<UnknownTagPolicy>()?,
        None => unknown_tag_policy_from_env_value(std::env::var(ENV_UNKNOWN_TAGS).ok())?,
    };
    let top_n = top_n_from_env_value(std::env::var(ENV_TOP_N).ok())?;

    let service = TriageService::from_config(CoreConfig::new(kb_path, top_n, unknown_tags)?)?;

    match command {
        Commands::Diseases => {
            for record in service.knowledge_base().records() {
                if record.aliases.is_empty() {
                    println!("{}", record.name());
                } else {
                    let aliases: Vec<&str> = record.aliases.iter().map(|a| a.as_str()).collect();
                    println!("{} (also: {})", record.name(), aliases.join(", "));
                }
            }
        }
        Commands::Show { name } => match service.lookup(&name) {
            Some(record) => print_disease(record),
            None => anyhow::bail!("No disease named '{}'", name),
        },
        Commands::Vocabulary => print_vocabulary(&service),
        Commands::Assess {
            symptoms,
            exposures,
            flags,
            comorbidities,
            days_sick,
            age,
            json,
        } => {
            let selection = SelectionSet {
                symptoms: symptoms.into_iter().collect(),
                exposures: exposures.into_iter().collect(),
                flags: flags.into_iter().map(|flag| (flag, true)).collect(),
                age,
                days_sick,
                comorbidities: comorbidities.into_iter().collect(),
            };
            let assessment = service.assess(&selection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
                return Ok(());
            }

            println!("Urgency: {}", assessment.triage.band);
            for line in &assessment.triage.advice {
                println!("  - {}", line);
            }

            if assessment.top_conditions.is_empty() {
                println!("\nNo matching conditions.");
            }
            for condition in &assessment.top_conditions {
                println!("\n{} ({}% match)", condition.name, condition.percentage);
                print_list("Prevention", &condition.prevention);
                print_list("Home care", &condition.home_care);
                if let Some(notes) = &condition.clinician_notes {
                    print_list("For clinicians", notes);
                }
                if !condition.red_flags_present.is_empty() {
                    let flags: Vec<&str> =
                        condition.red_flags_present.iter().map(TagId::as_str).collect();
                    println!("  Red flags present: {}", flags.join(", "));
                }
            }

            for ignored in &assessment.ignored {
                eprintln!("Ignored unknown tag {}", ignored);
            }
        }
        Commands::Match { text, top_k } => {
            let matches = service.match_text(&text, top_k);
            if matches.is_empty() {
                println!("No matching conditions.");
            }
            for m in matches {
                println!("{}: score {}", m.disease.name(), m.score);
            }
        }
    }

    Ok(())
}

fn print_list(title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("  {}:", title);
    for line in lines {
        println!("    - {}", line);
    }
}

fn print_disease(record: &DiseaseRecord) {
    println!("{}", record.name());
    if let Some(incubation) = &record.incubation {
        println!("  Incubation: {}", incubation);
    }
    if let Some(transmission) = &record.transmission {
        println!("  Transmission: {}", transmission);
    }
    if let Some(course) = &record.typical_course {
        println!("  Typical course: {}", course);
    }
    let symptoms: Vec<&str> = record.symptoms.iter().map(TagId::as_str).collect();
    println!("  Symptoms: {}", symptoms.join(", "));
    print_list("Key tests", &record.key_tests);
    print_list("Prevention", &record.prevention);
    print_list("Home care", &record.home_care);
    print_list("Avoid", &record.avoid);
    if let Some(notes) = &record.clinician_notes {
        print_list("For clinicians", notes);
    }
}

fn print_vocabulary(service: &TriageService) {
    let vocabulary = service.knowledge_base().vocabulary();
    let sections = [
        ("Symptoms", &vocabulary.symptoms),
        ("Exposures", &vocabulary.exposures),
        ("Flags", &vocabulary.flags),
        ("Comorbidities", &vocabulary.comorbidities),
    ];
    for (title, entries) in sections {
        println!("{}:", title);
        for (tag, label) in entries {
            println!("  {:<24} {}", tag, label);
        }
    }

    print_list_top("Red flags", service.knowledge_base().general_red_flags());
    print_list_top("Notice", service.knowledge_base().disclaimer());
}

fn print_list_top(title: &str, lines: &[String]) {
    println!("{}:", title);
    for line in lines {
        println!("  - {}", line);
    }
}
