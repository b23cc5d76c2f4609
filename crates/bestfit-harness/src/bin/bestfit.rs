//! CLI entrypoint for the best-fit simulator.

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bestfit_core::run_memory_manager_traced;
use bestfit_harness::report::ConformanceReport;
use bestfit_harness::{FixtureSet, TestRunner, format_responses, parse_simulation, trace};

/// Best-fit memory manager simulator.
#[derive(Debug, Parser)]
#[command(name = "bestfit")]
#[command(about = "Simulate best-fit allocation over a linear address space")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a simulation from text input and print the responses.
    Run {
        /// Input file; reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write a JSONL lifecycle trace to this file.
        #[arg(long)]
        trace: Option<PathBuf>,
    },
    /// Verify the simulator against fixture files.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown).
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { input, trace } => {
            let text = match input {
                Some(path) => std::fs::read_to_string(&path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let simulation = parse_simulation(&text)?;
            let (responses, events) =
                run_memory_manager_traced(simulation.memory_size, &simulation.queries);
            print!("{}", format_responses(&responses));
            if let Some(path) = trace {
                let mut file = File::create(&path)?;
                trace::write_jsonl(&events, &mut file)?;
                eprintln!("Wrote {} trace records to {}", events.len(), path.display());
            }
        }
        Command::Verify { fixture, report } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let mut fixture_sets = Vec::new();
            if fixture.is_dir() {
                let mut fixture_paths: Vec<PathBuf> = std::fs::read_dir(&fixture)?
                    .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                    .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
                    .collect();
                fixture_paths.sort();
                for path in fixture_paths {
                    match FixtureSet::from_file(&path) {
                        Ok(set) => fixture_sets.push(set),
                        Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                    }
                }
            } else {
                fixture_sets.push(FixtureSet::from_file(&fixture)?);
            }
            if fixture_sets.is_empty() {
                return Err(
                    format!("No fixture JSON files found in {}", fixture.display()).into(),
                );
            }

            let runner = TestRunner::new("conformance");
            let mut results = Vec::new();
            for set in &fixture_sets {
                results.extend(runner.run(set));
            }
            let conformance = ConformanceReport {
                campaign: runner.campaign.clone(),
                results,
            };
            eprintln!(
                "{}/{} cases passed",
                conformance.passed(),
                conformance.results.len()
            );
            if let Some(path) = report {
                let mut file = File::create(&path)?;
                file.write_all(conformance.to_markdown().as_bytes())?;
                eprintln!("Wrote report to {}", path.display());
            }
            if !conformance.all_passed() {
                for result in conformance.results.iter().filter(|r| !r.passed) {
                    eprintln!("FAIL {}", result.case_name);
                    if let Some(diff) = &result.diff {
                        eprintln!("{diff}");
                    }
                }
                return Err("verification failed".into());
            }
        }
    }

    Ok(())
}
