use clap::Parser;
use rsvp_geo::config::ResolverConfig;
use rsvp_geo::geocode::{
    compose_address, extract_fields, AddressDisplay, AddressInput, AddressResolver, GeoCoordinate, GeocodingProvider,
    MissPolicy, NominatimProvider, PostalLookup,
};
use std::path::PathBuf;

/// rsvp-geo — event address geocoder
///
/// Resolves the composed address of an event to a map coordinate, trying the
/// full street address, then the CEP, then the city, before settling on a
/// fallback point.
///
/// Examples:
///   rsvp-geo "Rua das Flores, 123, Centro, Rio de Janeiro - RJ, CEP 20000-000"
///   rsvp-geo --address "Centro, Niterói - RJ" --explain
///   rsvp-geo --lat -22.9068 --lon -43.1729 --label "Festa"
///   rsvp-geo --extract-only "Av. Paulista, 1578, Bela Vista, São Paulo - SP"
///   rsvp-geo --cep 01001-000 --number 10 --complement "Sala 2"
///   rsvp-geo --serve --port 8080
#[derive(Parser)]
#[command(name = "rsvp-geo", version, about, long_about = None)]
struct Cli {
    /// Address (positional).
    #[arg(index = 1)]
    address_positional: Option<String>,

    /// Address (named).
    #[arg(long)]
    address: Option<String>,

    /// CEP to look up; the address is composed from the result.
    #[arg(long, conflicts_with = "address", requires = "number")]
    cep: Option<String>,

    /// House number used with --cep.
    #[arg(long, requires = "cep")]
    number: Option<String>,

    /// Complement used with --cep (e.g. "Apto 4").
    #[arg(long, requires = "cep")]
    complement: Option<String>,

    /// Latitude (-90 to 90). Skips geocoding when given with --lon.
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Marker label. Defaults to the address.
    #[arg(long)]
    label: Option<String>,

    /// Country code restriction (ISO 3166-1 alpha-2, e.g. br).
    #[arg(long)]
    country: Option<String>,

    /// What to show when nothing matches: "fallback" or "no-map".
    #[arg(long, value_parser = parse_policy)]
    policy: Option<MissPolicy>,

    /// Config file. Defaults to ~/.rsvp-geo/config.json.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Offline mode: never query the provider.
    #[arg(long)]
    offline: bool,

    /// Print extracted address fields and stop.
    #[arg(long)]
    extract_only: bool,

    /// Show every strategy attempted.
    #[arg(long)]
    explain: bool,

    /// Debug: send a raw query straight to the provider.
    #[arg(long)]
    raw_query: Option<String>,

    /// Run the HTTP service instead of resolving once.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn parse_policy(s: &str) -> Result<MissPolicy, String> {
    match s.to_lowercase().as_str() {
        "fallback" => Ok(MissPolicy::Fallback),
        "no-map" | "nomap" | "none" => Ok(MissPolicy::NoMap),
        _ => Err(format!("Unknown policy '{}'. Use 'fallback' or 'no-map'.", s)),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    // ── Raw provider query ──────────────────────────────────────

    if let Some(ref query) = cli.raw_query {
        let provider = NominatimProvider::new(config.endpoint.clone(), config.user_agent.clone(), config.timeout());
        let candidates = provider.lookup(query, &config.country_code);
        eprintln!("  {} candidate(s) for '{}'", candidates.len(), query);
        print_json(&candidates);
        return;
    }

    let composed = cli.cep.as_deref().map(|cep| compose_from_cep(&cli, &config, cep));
    let address = composed
        .as_deref()
        .or(cli.address.as_deref())
        .or(cli.address_positional.as_deref());

    if cli.extract_only {
        print_json(&extract_fields(address.unwrap_or("")));
        return;
    }

    let resolver = AddressResolver::from_config(config, cli.offline);

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(rsvp_geo::server::start(resolver, &cli.host, cli.port));
        return;
    }

    // ── Resolve once ────────────────────────────────────────────

    let coordinate = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => Some(GeoCoordinate::new(lat, lon)),
        _ => None,
    };
    let input = AddressInput::from_parts(address, coordinate);

    let resolution = resolver.resolve_explained(&input);
    if cli.explain {
        for (i, attempt) in resolution.attempts.iter().enumerate() {
            eprintln!("  {}. [{}] '{}' -> {:?}", i + 1, attempt.strategy, attempt.query, attempt.outcome);
        }
        if resolution.attempts.is_empty() {
            eprintln!("  (no strategy attempted)");
        }
    }

    let label = cli.label.as_deref().or(address).unwrap_or_default();
    let mut display = AddressDisplay::new(label).with_zoom(resolver.config().zoom);
    let ticket = display.begin(input);
    display.commit(ticket, resolution.result.clone());

    eprintln!("  {}", resolution.result.display_line());

    print_json(&serde_json::json!({
        "result": resolution.result,
        "fields": resolution.fields,
        "map": display.map_view(),
    }));
}

/// Fill street, neighborhood, city and state from the CEP, then compose.
fn compose_from_cep(cli: &Cli, config: &ResolverConfig, cep: &str) -> String {
    if cli.offline {
        eprintln!("Error: CEP lookup needs network access (remove --offline)");
        std::process::exit(1);
    }
    let postal = PostalLookup::new(config.postal_endpoint.clone(), config.user_agent.clone(), config.timeout());
    let mut fields = postal.lookup(cep).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    fields.number = cli.number.clone();

    match compose_address(&fields, cli.complement.as_deref()) {
        Some(address) => {
            eprintln!("  {}", address);
            address
        }
        None => {
            eprintln!("Error: CEP {} has no street; pass the full address instead", cep);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> ResolverConfig {
    let loaded = match &cli.config {
        Some(path) => ResolverConfig::load_from(path).map(ResolverConfig::with_env),
        None => ResolverConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if let Some(ref cc) = cli.country {
        config.country_code = cc.to_lowercase();
    }
    if let Some(policy) = cli.policy {
        config.miss_policy = policy;
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
