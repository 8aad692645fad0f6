use crate::infra::InMemoryDonationRepository;
use clap::{Args, ValueEnum};
use food_share::config::AppConfig;
use food_share::error::AppError;
use food_share::workflows::donations::{
    DonationItem, DonationKind, DonationService, DonationSubmission, DonorRegistration,
    NearbyQuery, OrganizationRegistration,
};
use food_share::workflows::matching::{
    score_organizations, Address, Donor, GeoPoint, MatchingDataImporter, ScoredOrganization,
    ScoringStrategy,
};
use food_share::workflows::quality::{
    ConfiguredClassifier, HeuristicClassifier, ImageAnalysisResult, ImageClassifier,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    #[default]
    Proximity,
    Locality,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Organization CSV (id,name,email,phone,street,city,district,state,pincode,lat,lng)
    #[arg(long)]
    pub(crate) organizations: PathBuf,
    /// Donation history CSV (organization,date,status)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
    /// Donor city used by the locality strategy
    #[arg(long, default_value = "")]
    pub(crate) donor_city: String,
    /// Donor district used by the locality strategy
    #[arg(long, default_value = "")]
    pub(crate) donor_district: String,
    /// Donor latitude in decimal degrees
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub(crate) lat: Option<f64>,
    /// Donor longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub(crate) lng: Option<f64>,
    /// Declared donation type (any non-empty value earns the type bonus)
    #[arg(long)]
    pub(crate) donation_type: Option<String>,
    /// Scoring strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Proximity)]
    pub(crate) strategy: StrategyArg,
    /// Number of organizations to print
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to the food photo
    pub(crate) image: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Use the configured classifier instead of the local heuristic for the quality step.
    #[arg(long)]
    pub(crate) configured_classifier: bool,
    /// Skip the food photo assessment portion of the demo.
    #[arg(long)]
    pub(crate) skip_quality: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let organizations = std::fs::File::open(&args.organizations)?;
    let history = match &args.history {
        Some(path) => Some(std::fs::File::open(path)?),
        None => None,
    };

    let ranked = rank_from_readers(organizations, history, &args)?;
    println!(
        "Recommendations ({} strategy, {} organizations)",
        strategy_for(&args).label(),
        ranked.len()
    );
    render_ranking(&ranked, args.limit);
    Ok(())
}

pub(crate) fn rank_from_readers<O: Read, H: Read>(
    organizations: O,
    history: Option<H>,
    args: &RecommendArgs,
) -> Result<Vec<ScoredOrganization>, AppError> {
    let organizations = MatchingDataImporter::organizations_from_reader(organizations)?;
    let history = match history {
        Some(reader) => MatchingDataImporter::history_from_reader(reader)?,
        None => Vec::new(),
    };

    let donor = Donor {
        city: args.donor_city.clone(),
        district: args.donor_district.clone(),
        history,
        ..Donor::default()
    };

    Ok(score_organizations(
        &donor,
        &organizations,
        &strategy_for(args),
    ))
}

fn strategy_for(args: &RecommendArgs) -> ScoringStrategy {
    match args.strategy {
        StrategyArg::Proximity => {
            let location = args.lat.zip(args.lng).map(|(lat, lng)| GeoPoint::new(lat, lng));
            ScoringStrategy::proximity(location, args.donation_type.clone())
        }
        StrategyArg::Locality => ScoringStrategy::Locality,
    }
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let classifier = ConfiguredClassifier::from_config(&config.classifier)?;
    let image = std::fs::read(&args.image)?;
    let filename = args
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = classifier.classify(&image, &filename).await;
    let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        configured_classifier,
        skip_quality,
    } = args;

    let repository = Arc::new(InMemoryDonationRepository::default());
    let service = DonationService::new(repository);

    println!("Food share demo");
    let donor = service.register_donor(DonorRegistration {
        name: "Priya Raman".to_string(),
        email: "priya@example.org".to_string(),
        password: "demo-password".to_string(),
        confirm_password: "demo-password".to_string(),
        phone: "9840012345".to_string(),
        address: address("Chennai", "Chennai Central", "Tamil Nadu", "600002"),
        location: Some(GeoPoint::new(13.0827, 80.2707)),
    })?;
    println!("- registered donor {} ({})", donor.name, donor.id.0);

    for (name, city, district, state, location) in demo_organizations() {
        let organization = service.register_organization(OrganizationRegistration {
            organization_name: name.to_string(),
            organization_code: format!("{}-01", &name[..3].to_ascii_uppercase()),
            owner_name: "Coordinator".to_string(),
            email: format!(
                "{}@example.org",
                name.to_ascii_lowercase().replace(' ', ".")
            ),
            password: "demo-password".to_string(),
            confirm_password: "demo-password".to_string(),
            phone: "04400000000".to_string(),
            address: address(city, district, state, ""),
            location: Some(location),
        })?;
        println!(
            "- registered organization {} ({})",
            organization.name, organization.id.0
        );
    }

    let quality = if skip_quality {
        None
    } else {
        let image = synthetic_photo();
        let classifier = if configured_classifier {
            ConfiguredClassifier::from_config(&AppConfig::load()?.classifier)?
        } else {
            ConfiguredClassifier::Heuristic(HeuristicClassifier)
        };
        let result = classifier.classify(&image, "vegetable-biryani.jpg").await;
        render_quality(&result);
        Some(result)
    };

    let offer = service.submit_donation(DonationSubmission {
        donor_id: donor.id.clone(),
        organization: "Hope Shelter".to_string(),
        kind: DonationKind::Food,
        description: "Wedding reception surplus".to_string(),
        items: vec![DonationItem {
            name: "Vegetable biryani".to_string(),
            quantity: "40 plates".to_string(),
        }],
        quality,
    })?;
    println!(
        "\nOffer {} submitted to {} [{}]",
        offer.order_id.0,
        offer.organization_name,
        offer.status.label()
    );

    let accepted =
        service.accept_donation(&offer.organization_id, &offer.order_id, "18:30".to_string())?;
    println!(
        "- accepted, pickup at {}",
        accepted.pickup_time.as_deref().unwrap_or("unscheduled")
    );
    let collected = service.collect_donation(&offer.organization_id, &offer.order_id)?;
    println!("- {}", collected.status.label());

    println!("\nLocality recommendations");
    render_ranking(&service.recommend_for_donor(&donor.id)?, 5);

    println!("\nNearby recommendations");
    render_ranking(
        &service.recommend_nearby(NearbyQuery {
            donor_id: Some(donor.id.clone()),
            location: None,
            donation_type: Some("Food".to_string()),
        })?,
        5,
    );

    Ok(())
}

fn address(city: &str, district: &str, state: &str, pincode: &str) -> Address {
    Address {
        street: String::new(),
        city: city.to_string(),
        district: district.to_string(),
        state: state.to_string(),
        pincode: pincode.to_string(),
    }
}

fn demo_organizations() -> [(&'static str, &'static str, &'static str, &'static str, GeoPoint); 3]
{
    [
        (
            "Hope Shelter",
            "Chennai",
            "Chennai Central",
            "Tamil Nadu",
            GeoPoint::new(13.0900, 80.2800),
        ),
        (
            "Tambaram Food Bank",
            "Tambaram",
            "Chengalpattu",
            "Tamil Nadu",
            GeoPoint::new(12.9249, 80.1000),
        ),
        (
            "Akshaya Kitchen",
            "Bengaluru",
            "Bengaluru Urban",
            "Karnataka",
            GeoPoint::new(12.9716, 77.5946),
        ),
    ]
}

fn synthetic_photo() -> Vec<u8> {
    let mut bytes = vec![0xff, 0xd8, 0xff, 0xe0];
    bytes.extend((0u16..2048).map(|i| (i.wrapping_mul(31) % 251) as u8));
    bytes
}

fn render_quality(result: &ImageAnalysisResult) {
    println!("\nFood photo assessment");
    println!(
        "- {}: {} freshness, {} quality, {:.0}% confidence",
        result.food_type,
        result.freshness.label(),
        result.quality.label(),
        result.confidence * 100.0
    );
    println!(
        "- edible: {}{}",
        if result.is_edible { "yes" } else { "no" },
        result
            .warning
            .as_deref()
            .map(|warning| format!(" ({warning})"))
            .unwrap_or_default()
    );
}

fn render_ranking(ranked: &[ScoredOrganization], limit: usize) {
    if ranked.is_empty() {
        println!("  (no organizations)");
        return;
    }
    for (position, entry) in ranked.iter().take(limit).enumerate() {
        println!(
            "  {}. {} [{}] score {:.1} (proximity {:.1}, history {:.0}, type {:.0}, locality {:.0})",
            position + 1,
            entry.organization.name,
            entry.organization.address.city,
            entry.score,
            entry.factors.proximity,
            entry.factors.history,
            entry.factors.type_match,
            entry.factors.locality,
        );
    }
}
