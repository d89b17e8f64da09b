use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zkp_graph_coloring::utils::serialization::{
    load_graph_instance, load_proof, save_graph_instance, save_proof, GraphInstance,
    ProofTranscript,
};
use zkp_graph_coloring::{
    run_parallel, ColoredGraph, CommitmentScheme, HashAlgorithm, ProtocolRunner, Prover,
    SimulationConfig, Statistics, Verifier,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Zero-knowledge proof of graph 3-colouring", long_about = None)]
struct Cli {
    /// Log every round (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a graph, run the protocol and print the accept/reject summary
    Simulate {
        #[arg(long)]
        nodes: Option<u32>,
        #[arg(long)]
        rounds: Option<u32>,
        /// Use a stored graph instance instead of generating one
        #[arg(short, long, value_name = "FILE")]
        instance: Option<PathBuf>,
        /// TOML file with simulation settings
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long)]
        hash: Option<HashAlgorithm>,
        /// Run rounds concurrently
        #[arg(long)]
        parallel: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a random 3-colourable graph instance and write it to disk
    Generate {
        #[arg(long, default_value_t = 20)]
        nodes: u32,
        #[arg(long, default_value_t = zkp_graph_coloring::DEFAULT_EDGE_PROBABILITY)]
        edge_probability: f64,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Run the protocol against a stored instance and record a transcript
    Prove {
        #[arg(short, long, value_name = "FILE")]
        instance: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        transcript: PathBuf,
        #[arg(long, default_value_t = 400)]
        rounds: u32,
        #[arg(long, default_value_t = HashAlgorithm::default())]
        hash: HashAlgorithm,
    },
    /// Replay a stored transcript with a fresh verifier
    Verify {
        #[arg(short, long, value_name = "FILE")]
        instance: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        transcript: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "zkp_graph_coloring=debug"
    } else {
        "zkp_graph_coloring=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Simulate {
            nodes,
            rounds,
            instance,
            config,
            hash,
            parallel,
            json,
        } => {
            let mut settings = match config {
                Some(path) => SimulationConfig::load(path)?,
                None => SimulationConfig::default(),
            };
            settings.nodes = nodes.unwrap_or(settings.nodes);
            settings.rounds = rounds.unwrap_or(settings.rounds);
            settings.hash = hash.unwrap_or(settings.hash);
            settings.parallel |= parallel;
            settings.validate()?;
            run_simulate(&settings, instance, json)?
        }
        Commands::Generate {
            nodes,
            edge_probability,
            output,
        } => run_generate(nodes, edge_probability, output)?,
        Commands::Prove {
            instance,
            transcript,
            rounds,
            hash,
        } => run_prove(instance, transcript, rounds, hash)?,
        Commands::Verify {
            instance,
            transcript,
        } => run_verify(instance, transcript)?,
    }
    Ok(())
}

fn run_simulate(
    settings: &SimulationConfig,
    instance: Option<PathBuf>,
    json: bool,
) -> CliResult<()> {
    let graph = match instance {
        Some(path) => load_graph_instance(path)?.graph,
        None => ColoredGraph::generate_with_probability(
            settings.nodes,
            settings.edge_probability,
            &mut rand::rng(),
        )?,
    };
    println!("{graph}");
    if graph.edge_count() == 0 {
        return Err("generated graph has no edges to challenge; regenerate or raise --nodes".into());
    }

    let prover_cfg = settings.prover_config();
    let statistics = if settings.parallel {
        run_parallel(&graph, settings.rounds, prover_cfg)?
    } else {
        let bar = progress_bar(settings.rounds)?;
        let prover = Prover::new(&graph, prover_cfg);
        let verifier = Verifier::new(&graph, prover_cfg.scheme);
        let statistics =
            ProtocolRunner::new(prover, verifier, settings.rounds).run_with(|_| bar.inc(1))?;
        bar.finish_and_clear();
        statistics
    };

    print_statistics(&statistics, json)
}

fn run_generate(nodes: u32, edge_probability: f64, output: PathBuf) -> CliResult<()> {
    println!("Generating 3-colourable graph (p = {edge_probability:.2})...");
    let graph = ColoredGraph::generate_with_probability(nodes, edge_probability, &mut rand::rng())?;
    println!("  n = {}, edges = {}", graph.size(), graph.edge_count());
    let instance = GraphInstance::with_metadata(graph, edge_probability);
    save_graph_instance(&output, &instance)?;
    println!("Instance saved to {}", output.display());
    Ok(())
}

fn run_prove(
    instance_path: PathBuf,
    transcript_path: PathBuf,
    rounds: u32,
    hash: HashAlgorithm,
) -> CliResult<()> {
    if rounds == 0 {
        return Err("rounds must be greater than zero".into());
    }
    let instance = load_graph_instance(&instance_path)?;
    let scheme = CommitmentScheme::new(hash);
    let prover_cfg = zkp_graph_coloring::ProverConfig {
        scheme,
        ..Default::default()
    };
    let prover = Prover::new(&instance.graph, prover_cfg);
    let verifier = Verifier::new(&instance.graph, scheme);

    let bar = progress_bar(rounds)?;
    let mut records = Vec::with_capacity(rounds as usize);
    let statistics = ProtocolRunner::new(prover, verifier, rounds).run_with(|record| {
        records.push(record.clone());
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    let transcript = ProofTranscript {
        hash,
        rounds: records,
    };
    save_proof(&transcript_path, &transcript)?;
    println!(
        "Proof transcript with {} rounds saved to {} {statistics}",
        transcript.rounds.len(),
        transcript_path.display()
    );
    Ok(())
}

fn run_verify(instance_path: PathBuf, transcript_path: PathBuf) -> CliResult<()> {
    let instance = load_graph_instance(&instance_path)?;
    let transcript = load_proof(&transcript_path)?;
    let mut verifier = Verifier::new(&instance.graph, CommitmentScheme::new(transcript.hash));

    for record in &transcript.rounds {
        let verdict = verifier.replay_round(&record.table, &record.challenge, &record.opening)?;
        if verdict != record.verdict {
            return Err(format!(
                "round {} recorded as {:?} but replays as {:?}",
                record.round, record.verdict, verdict
            )
            .into());
        }
    }

    let statistics = verifier.statistics();
    println!("Replayed {} rounds: {statistics}", transcript.rounds.len());
    if statistics.rejected > 0 {
        return Err(format!("{} round(s) rejected", statistics.rejected).into());
    }
    println!(
        "Transcript verified successfully against {}",
        instance_path.display()
    );
    Ok(())
}

fn progress_bar(rounds: u32) -> CliResult<ProgressBar> {
    let bar = ProgressBar::new(u64::from(rounds));
    bar.set_style(
        ProgressStyle::with_template("{spinner} rounds {pos}/{len} [{bar:40}] {elapsed}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

fn print_statistics(statistics: &Statistics, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string(statistics)?);
    } else {
        println!("{statistics}");
    }
    Ok(())
}
