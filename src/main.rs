use clap::Parser;
use log::{error, info};
use nalgebra::Vector3;
use rand_distr::{Distribution, Normal};

use std::error::Error;

use vmc_local_energy::{read_config, KineticConfig, LocalEnergy, LocalEnergyTerms, RngKey, RunConfig, SlaterJastrow};

#[derive(Parser, Debug)]
#[command(version, about = "Local energy statistics of a Slater-Jastrow wavefunction", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Seed of the top-level PRNG key
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of configurations to evaluate
    #[arg(short = 'n', long, default_value_t = 1000)]
    samples: usize,

    /// Width of the Gaussian cloud electrons are drawn from around each nucleus
    #[arg(long, default_value_t = 1.0)]
    spread: f64,

    /// Override the kinetic energy algorithm (exact_loop, stochastic, forward_laplacian)
    #[arg(short, long)]
    algorithm: Option<KineticConfig>,
}

const HA_TO_EV: f64 = 27.21138602;

/// Electrons are placed round-robin on the nuclei and displaced by `N(0, spread²)`.
fn draw_configurations(
    config: &RunConfig,
    key: RngKey,
    samples: usize,
    spread: f64,
) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let normal = Normal::new(0.0, spread)?;
    let atoms = config.system.atoms();
    let n = config.spins.num_particles();
    Ok(key
        .split_n(samples)
        .into_iter()
        .map(|k| {
            let mut rng = k.rng();
            (0..n)
                .flat_map(|i| {
                    let center = atoms.get(i % atoms.len().max(1)).copied().unwrap_or_else(Vector3::zeros);
                    let r = center + Vector3::<f64>::from_distribution(&normal, &mut rng);
                    [r.x, r.y, r.z]
                })
                .collect()
        })
        .collect())
}

fn mean_and_error(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
    (mean, (var / n).sqrt())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = read_config(&args.config)?;
    if let Some(algorithm) = args.algorithm {
        config.kinetic = algorithm;
    }
    let (walker_key, energy_key) = RngKey::new(args.seed).split();
    let configurations = draw_configurations(&config, walker_key, args.samples, args.spread)?;

    let wavefunction = SlaterJastrow::new(&config.system);
    let local_energy = LocalEnergy::new(wavefunction, config.system.clone(), config.spins.clone(), config.kinetic)?;
    info!("evaluating {} configurations with {}", configurations.len(), config.kinetic);
    let terms = local_energy.evaluate_batch(&config.wavefunction, energy_key, &configurations)?;

    let finite: Vec<&LocalEnergyTerms> = terms.iter().filter(|t| t.total().is_finite()).collect();
    let totals: Vec<f64> = finite.iter().map(|t| t.total()).collect();
    let potentials: Vec<f64> = finite.iter().map(|t| t.potential).collect();
    let kinetics: Vec<f64> = finite.iter().map(|t| t.kinetic).collect();
    let (energy, error) = mean_and_error(&totals);
    let (potential, potential_error) = mean_and_error(&potentials);
    let (kinetic, kinetic_error) = mean_and_error(&kinetics);

    println!("Local Energy Results");
    println!("----------------------------------------");
    println!("Algorithm: {}", config.kinetic);
    println!("Electrons: {} (spins {:?})", config.spins.num_particles(), config.spins.counts());
    println!("Configurations: {} ({} finite)", terms.len(), finite.len());
    println!("Local energy: {:.6} ± {:.6} Ha", energy, error);
    println!("Local energy: {:.6} ± {:.6} eV", HA_TO_EV * energy, HA_TO_EV * error);
    println!("Potential energy: {:.6} ± {:.6} Ha", potential, potential_error);
    println!("Kinetic energy: {:.6} ± {:.6} Ha", kinetic, kinetic_error);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
