/// Native entry point: mount one visualization, optionally seed it from a
/// share link and render it against a local data file.
///
/// Usage: `agrimap-native [kind] [share-url] [data.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use agrimap::{logging, DashboardConfig};

    let config = DashboardConfig::load();
    logging::init(config.preferences.log_level);

    let mut args = std::env::args().skip(1);
    let kind = args
        .next()
        .unwrap_or_else(|| "crop-distribution".to_string());
    let url = args.next();
    let data_path = args.next();

    if let Err(e) = run(config, &kind, url.as_deref(), data_path.as_deref()) {
        log::error!("{}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(
    config: agrimap::DashboardConfig,
    kind: &str,
    url: Option<&str>,
    data_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    use agrimap::{Dashboard, MapInstance};

    let dashboard = Dashboard::new(config);
    log::debug!(
        "Session authenticated: {}",
        dashboard.session().current().is_authenticated()
    );
    let map = dashboard.mount(kind, url)?;
    log::info!("Mounted {} map {}", map.kind(), map.id());

    if let Some(endpoint) = dashboard.data_url(map.as_ref()) {
        log::info!("Data endpoint: {}", endpoint);
    }

    let data: Option<serde_json::Value> = match data_path {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let mut binding = dashboard
        .bind(map.id())
        .ok_or("mounted map is not in the dashboard")?;
    let output = binding.render(data.as_ref());
    println!("{}", serde_json::to_string_pretty(&output)?);

    let base = url.unwrap_or("http://localhost/");
    if let Some(link) = dashboard.share_link(base)? {
        println!("{}", link);
    }
    Ok(())
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
