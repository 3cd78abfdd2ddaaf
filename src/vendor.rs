//! Vendor directory: the external source of lead times.
//!
//! The calculator only sees the [`VendorLookup`] capability; [`VendorDirectory`]
//! is the JSON-backed implementation used by the binaries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

/// Lead time used when a material has no vendor, or its vendor quotes none.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VendorQuote {
    pub lead_time_days: u32,
    pub rating: f64,
}

pub trait VendorLookup: Sync {
    /// Quote from the highest-rated vendor for `material_name`, if any.
    fn best_rated(&self, material_name: &str) -> Option<VendorQuote>;
}

impl VendorLookup for HashMap<String, VendorQuote> {
    fn best_rated(&self, material_name: &str) -> Option<VendorQuote> {
        self.get(material_name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
}

impl Vendor {
    pub fn new(name: impl Into<String>, location: impl Into<String>, rating: f64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            contact: String::new(),
            email: None,
            services: Vec::new(),
            rating,
            years_experience: None,
            website: None,
            lead_time_days: None,
            price_per_unit: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    pub fn with_price(mut self, price_per_unit: f64) -> Self {
        self.price_per_unit = Some(price_per_unit);
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.years_experience = Some(years);
        self
    }

    pub fn quote(&self) -> VendorQuote {
        VendorQuote {
            lead_time_days: self.lead_time_days.unwrap_or(DEFAULT_LEAD_TIME_DAYS),
            rating: self.rating,
        }
    }
}

/// Vendors keyed by material name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorDirectory {
    vendors: BTreeMap<String, Vec<Vendor>>,
}

impl VendorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: impl Into<String>, vendor: Vendor) {
        self.vendors.entry(material.into()).or_default().push(vendor);
    }

    pub fn with_vendor(mut self, material: impl Into<String>, vendor: Vendor) -> Self {
        self.insert(material, vendor);
        self
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.vendors.keys().map(String::as_str)
    }

    /// Vendors for `material` in insertion order.
    pub fn listed(&self, material: &str) -> &[Vendor] {
        self.vendors.get(material).map(Vec::as_slice).unwrap_or_default()
    }

    /// Vendors for `material`, best rated first. Equal ratings keep insertion order.
    pub fn vendors_for(&self, material: &str) -> Vec<&Vendor> {
        let mut vendors: Vec<&Vendor> = self.listed(material).iter().collect();
        vendors.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        vendors
    }

    pub fn best_vendor(&self, material: &str) -> Option<&Vendor> {
        self.vendors_for(material).into_iter().next()
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, crate::ExportError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::ExportError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Sample directory for the Maharashtra data center project.
    pub fn sample() -> Self {
        Self::new()
            .with_vendor(
                "Steel Reinforcement Bars",
                Vendor::new("Mumbai Steel Works Pvt Ltd", "Mumbai, Maharashtra", 4.5)
                    .with_contact("+91-22-2345-6789")
                    .with_experience(15)
                    .with_lead_time(14)
                    .with_price(15000.0),
            )
            .with_vendor(
                "Steel Reinforcement Bars",
                Vendor::new("Pune Iron & Steel Co.", "Pune, Maharashtra", 4.2)
                    .with_contact("+91-20-3456-7890")
                    .with_experience(12)
                    .with_lead_time(18),
            )
            .with_vendor(
                "Steel Reinforcement Bars",
                Vendor::new("Nashik Steel Industries", "Nashik, Maharashtra", 4.0)
                    .with_contact("+91-253-456-7891")
                    .with_experience(10)
                    .with_lead_time(21),
            )
            .with_vendor(
                "Steel Reinforcement Bars",
                Vendor::new("Shree Steel Trading Co.", "Thane, Maharashtra", 3.8)
                    .with_contact("+91-22-9012-3456")
                    .with_experience(8),
            )
            .with_vendor(
                "Concrete Mix",
                Vendor::new("Maharashtra Concrete Solutions", "Mumbai, Maharashtra", 4.6)
                    .with_contact("+91-22-4567-8901")
                    .with_experience(20)
                    .with_lead_time(7)
                    .with_price(5000.0),
            )
            .with_vendor(
                "Concrete Mix",
                Vendor::new("Pune Ready Mix Ltd", "Pune, Maharashtra", 4.3)
                    .with_contact("+91-20-5678-9012")
                    .with_experience(18)
                    .with_lead_time(5),
            )
            .with_vendor(
                "Concrete Mix",
                Vendor::new("Reliable Concrete Works", "Nagpur, Maharashtra", 4.0)
                    .with_contact("+91-712-345-6789")
                    .with_experience(12),
            )
            .with_vendor(
                "Electrical Cables",
                Vendor::new("Maharashtra Cables & Wires", "Aurangabad, Maharashtra", 4.4)
                    .with_contact("+91-240-234-5678")
                    .with_experience(14)
                    .with_lead_time(21)
                    .with_price(8000.0),
            )
            .with_vendor(
                "Electrical Cables",
                Vendor::new("Western India Electricals", "Mumbai, Maharashtra", 4.1)
                    .with_contact("+91-22-6789-0123")
                    .with_experience(16)
                    .with_lead_time(25),
            )
            .with_vendor(
                "HVAC Equipment",
                Vendor::new("Cool Air Systems Maharashtra", "Pune, Maharashtra", 4.5)
                    .with_contact("+91-20-7890-1234")
                    .with_experience(22)
                    .with_lead_time(35)
                    .with_price(150000.0),
            )
            .with_vendor(
                "HVAC Equipment",
                Vendor::new("Mumbai Climate Control", "Mumbai, Maharashtra", 4.2)
                    .with_contact("+91-22-8901-2345")
                    .with_experience(19)
                    .with_lead_time(42),
            )
    }
}

impl VendorLookup for VendorDirectory {
    fn best_rated(&self, material_name: &str) -> Option<VendorQuote> {
        self.best_vendor(material_name).map(Vendor::quote)
    }
}
