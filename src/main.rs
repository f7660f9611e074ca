use tracing::info;

use spacebook::clock::SystemClock;
use spacebook::config::Config;
use spacebook::engine::Engine;
use spacebook::model::Amenity;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    spacebook::observability::init(config.metrics_port)?;

    std::fs::create_dir_all(&config.data_dir)?;

    let engine = Engine::open(config.snapshot_path(), SystemClock, config.engine_options())?;
    info!("spacebook data_dir: {}", config.data_dir.display());
    info!("  cancel_policy: {:?}", config.cancel_policy);
    info!("  horizon: {}h", engine.options().horizon_hours);
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    for (id, space) in engine.spaces() {
        let calendar = space.calendar();
        let reviews = space.reviews();
        let amenities: Vec<_> = space.amenities().iter().map(Amenity::label).collect();
        info!(
            "space {id} {:?}: {:.1} m², {} seats, [{}], {}h reserved at {:.2}/h, {} reviews (score {:.1})",
            space.name(),
            space.dimensions.area(),
            space.seating.seats,
            amenities.join(", "),
            calendar.reserved_hours(),
            calendar.rate(),
            reviews.count(),
            reviews.score(),
        );
    }

    if let Some(path) = &config.export_json {
        engine.export_json(path)?;
    }

    Ok(())
}
