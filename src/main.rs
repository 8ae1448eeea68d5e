//! Derive the gradient and Laplacian of the 2-D Wendland C2 kernel and print
//! the closed forms with their values at a sample point.
use sph_kernels::derivation::KernelDerivation;
use sph_kernels::types::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let derivation = KernelDerivation::default();
    tracing::info!("Deriving {}", derivation.definition().name());

    let report = derivation.report(&derivation.default_point())?;
    print!("{report}");
    Ok(())
}
