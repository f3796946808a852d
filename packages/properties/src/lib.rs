// ABOUTME: Property records and their attachments for Rentwise
// ABOUTME: Creation and uploads are gated by the owner's plan limits

pub mod error;
pub mod service;
pub mod types;

pub use error::{PropertyError, PropertyResult};
pub use service::PropertyService;
pub use types::{
    CreatePropertyInput, CreatedProperty, Document, Lease, LeaseStatus, NewDocument, NewLease,
    NewPropertyImage, NewTenant, Property, PropertyImage, Tenant,
};
