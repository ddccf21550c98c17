use largepos_rs::{AU_DISTANCE, Double3, Float3, LargePosError, LargePosition};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), LargePosError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let world = Double3::new(29.0 * AU_DISTANCE, -3.5 * AU_DISTANCE, 1234.5678);
    let mut pos = LargePosition::try_from_double3(world)?;

    println!("World:    {}", world);
    println!("Position: {}", pos);
    println!("Key:      {}", pos.to_key());

    // Step 1.7 km along x relative to the current cell
    let origin = pos.global;
    let step = pos.try_to_float3(origin)? + Float3::new(1700.0, 0.0, 0.0);
    pos.try_set_from_float3(origin, step)?;

    println!("Moved:    {}", pos);
    println!("World:    {}", pos.to_double3());
    println!("Relative to previous cell: {}", pos.try_to_float3(origin)?);
    println!("Key:      {}", pos.to_key());

    Ok(())
}
