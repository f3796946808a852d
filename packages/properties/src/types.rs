// ABOUTME: Type definitions for properties, images, tenants, leases, and documents
// ABOUTME: Row structures and the inputs accepted by property creation

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub property_type: String,
    pub monthly_rent: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyImage {
    pub id: String,
    pub property_id: String,
    pub owner_id: String,
    pub file_name: String,
    pub file_url: String,
    /// Size in bytes
    pub file_size: i64,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: String,
    pub owner_id: String,
    pub property_id: Option<String>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    Ended,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lease {
    pub id: String,
    pub owner_id: String,
    pub property_id: String,
    pub tenant_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: f64,
    pub rent_due_day: i64,
    pub status: LeaseStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub property_id: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPropertyImage {
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLease {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: f64,
    #[serde(default = "default_rent_due_day")]
    pub rent_due_day: i64,
}

fn default_rent_due_day() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub property_id: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    #[serde(default = "default_document_type")]
    pub document_type: String,
}

fn default_document_type() -> String {
    "other".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyInput {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default = "default_property_type")]
    pub property_type: String,
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub images: Vec<NewPropertyImage>,
    pub tenant: Option<NewTenant>,
    pub lease: Option<NewLease>,
}

fn default_property_type() -> String {
    "apartment".to_string()
}

/// Everything written by a successful property creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedProperty {
    pub property: Property,
    pub images: Vec<PropertyImage>,
    pub tenant: Option<Tenant>,
    pub lease: Option<Lease>,
}
