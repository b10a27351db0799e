//! Compare the three kinetic energy algorithms on H2.
//!
//! Run with `cargo run --release --example compare_estimators`.

use std::time::Instant;

use nalgebra::Vector3;
use vmc_local_energy::{
    AtomicSystem, DimensionSampler, KineticConfig, LocalEnergy, LoopStrategy, ProbeMethod, RngKey, SlaterJastrow,
    SlaterJastrowParams, SpinPartition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let system = AtomicSystem::new(
        vec![Vector3::new(0.0, 0.0, 0.7), Vector3::new(0.0, 0.0, -0.7)],
        vec![1.0, 1.0],
    )?;
    let spins = SpinPartition::new(vec![1, 1]);
    let params = SlaterJastrowParams::default();
    let x = vec![0.3, -0.2, 0.9, -0.1, 0.4, -0.5];
    let batch = vec![x.clone(); 2000];

    let algorithms = [
        KineticConfig::ForwardLaplacian,
        KineticConfig::ExactLoop { strategy: LoopStrategy::Fold },
        KineticConfig::ExactLoop { strategy: LoopStrategy::Scan },
        KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: 2, method: ProbeMethod::Sdgd, n_hte_vec: 0 }),
        KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: 0, method: ProbeMethod::Normal, n_hte_vec: 4 }),
        KineticConfig::Stochastic(DimensionSampler { n_sdgd_dim: 4, method: ProbeMethod::Unit, n_hte_vec: 4 }),
    ];

    println!("{:<20} {:>12} {:>12} {:>10}", "algorithm", "E_L (Ha)", "std err", "time (ms)");
    for config in algorithms {
        let wf = SlaterJastrow::new(&system);
        let le = LocalEnergy::new(wf, system.clone(), spins.clone(), config)?;
        let start = Instant::now();
        let terms = le.evaluate_batch(&params, RngKey::new(7), &batch)?;
        let elapsed = start.elapsed().as_secs_f64() * 1e3;
        let n = terms.len() as f64;
        let mean = terms.iter().map(|t| t.total()).sum::<f64>() / n;
        let var = terms.iter().map(|t| (t.total() - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let label = match config {
            KineticConfig::ExactLoop { strategy } => format!("exact_loop/{:?}", strategy),
            KineticConfig::Stochastic(s) => format!("stochastic/{}/{}", s.method, s.n_sdgd_dim),
            other => other.to_string(),
        };
        println!("{:<20} {:>12.6} {:>12.6} {:>10.2}", label, mean, (var / n).sqrt(), elapsed);
    }
    Ok(())
}
