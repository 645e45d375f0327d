// src/models/listing.rs

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A carbon-credit offer in the marketplace catalog.
///
/// `verified` is only ever set together with `approved`: admin approval
/// flips both in one persisted write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,

    pub title: String,

    /// Tons of CO₂ on offer. Strictly positive.
    pub quantity: f64,

    /// Price per ton, in rupees. Strictly positive.
    pub price: f64,

    pub description: String,

    /// Owner reference into the user directory.
    pub farmer_id: String,

    /// Denormalized owner name, stamped at creation time.
    pub farmer_name: String,

    pub state: String,
    pub district: String,

    /// Derived "State - District".
    pub location: String,

    pub created_at: DateTime<Utc>,

    pub verified: bool,
    pub approved: bool,
}

impl Listing {
    /// Creates an unapproved listing owned by the given farmer.
    pub fn new(req: CreateListingRequest, farmer_id: &str, farmer_name: &str) -> Self {
        let location = format!("{} - {}", req.state, req.district);
        Self {
            id: format!("listing-{}", Uuid::new_v4()),
            title: req.title,
            quantity: req.quantity,
            price: req.price,
            description: req.description,
            farmer_id: farmer_id.to_string(),
            farmer_name: farmer_name.to_string(),
            state: req.state,
            district: req.district,
            location,
            created_at: Utc::now(),
            verified: false,
            approved: false,
        }
    }
}

/// DTO for creating a new listing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be greater than zero"))]
    pub quantity: f64,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: f64,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 100))]
    pub district: String,
}

/// Marketplace view filters. Absent values match everything; the price
/// ceiling defaults to +infinity.
#[derive(Debug, Default, Deserialize)]
pub struct ListingFilter {
    pub state: Option<String>,
    pub district: Option<String>,
    pub max_price: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let matches_state = match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(wanted) => listing.state.to_lowercase().contains(&wanted.to_lowercase()),
            None => true,
        };
        let matches_district = match self.district.as_deref().filter(|s| !s.is_empty()) {
            Some(wanted) => listing
                .district
                .to_lowercase()
                .contains(&wanted.to_lowercase()),
            None => true,
        };
        let matches_price = listing.price <= self.max_price.unwrap_or(f64::INFINITY);

        matches_state && matches_district && matches_price
    }
}

/// Recomputes a filtered view of the catalog. Never mutates the input.
pub fn filter_listings(listings: Vec<Listing>, filter: &ListingFilter) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| filter.matches(l))
        .collect()
}

/// Pre-approved demo catalog, seeded on first run when the listing
/// collection is absent.
pub fn demo_listings() -> Vec<Listing> {
    let demo = |id: &str,
                title: &str,
                quantity: f64,
                price: f64,
                description: &str,
                farmer_id: &str,
                farmer_name: &str,
                state: &str,
                district: &str,
                created_at: DateTime<Utc>| Listing {
        id: id.to_string(),
        title: title.to_string(),
        quantity,
        price,
        description: description.to_string(),
        farmer_id: farmer_id.to_string(),
        farmer_name: farmer_name.to_string(),
        state: state.to_string(),
        district: district.to_string(),
        location: format!("{state} - {district}"),
        created_at,
        verified: true,
        approved: true,
    };

    vec![
        demo(
            "verified-1",
            "Organic Farm Carbon Credits - Maharashtra",
            50.0,
            800.0,
            "Premium carbon credits from certified organic farming operations in Maharashtra. \
             Zero-tillage, crop rotation, and bio-fertilizers enhance soil carbon sequestration.",
            "verified-farmer-1",
            "Maharashtra Organic Collective",
            "Maharashtra",
            "Pune",
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
        ),
        demo(
            "verified-2",
            "Community Forest Carbon Credits - Karnataka",
            100.0,
            600.0,
            "High-quality carbon credits from community-managed forest regeneration project. \
             500 acres of degraded land restored over 3 years.",
            "verified-farmer-2",
            "Karnataka Forest Collective",
            "Karnataka",
            "Mysuru",
            Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap(),
        ),
        demo(
            "verified-3",
            "Sustainable Agro Project - Uttar Pradesh",
            70.0,
            750.0,
            "Integrated farming system combining organic farming with solar irrigation and \
             biomass management to maximize carbon capture.",
            "verified-farmer-3",
            "UP Sustainable Farmers Union",
            "Uttar Pradesh",
            "Lucknow",
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        ),
    ]
}
