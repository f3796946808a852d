// ABOUTME: Plan-gated property, image, tenant, lease, and document writes
// ABOUTME: Checks usage limits before writing and resyncs cached usage afterwards

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::error::{PropertyError, PropertyResult};
use crate::types::{
    CreatePropertyInput, CreatedProperty, Document, Lease, LeaseStatus, NewDocument, NewLease,
    NewPropertyImage, NewTenant, Property, PropertyImage, Tenant,
};
use rentwise_billing::{SubscriptionStorage, UsageLimiter, UsageStorage};
use rentwise_core::constants::MAX_UPLOAD_SIZE_BYTES;
use rentwise_core::{
    format_file_size, generate_id, is_valid_email, is_valid_phone, validate_lease_dates,
};
use rentwise_settings::SettingsStorage;
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct PropertyService {
    pool: SqlitePool,
    limiter: UsageLimiter,
    usage: UsageStorage,
    subscriptions: SubscriptionStorage,
    settings: SettingsStorage,
}

impl PropertyService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            limiter: UsageLimiter::new(pool.clone()),
            usage: UsageStorage::new(pool.clone()),
            subscriptions: SubscriptionStorage::new(pool.clone()),
            settings: SettingsStorage::new(pool.clone()),
            pool,
        }
    }

    /// Create a property with its images and an optional tenant and lease.
    ///
    /// The property limit is checked before anything is written. Steps after
    /// the property insert are not compensated: if an image, tenant, or lease
    /// write fails, the property stays and the error is returned.
    pub async fn create_property(
        &self,
        owner_id: &str,
        input: CreatePropertyInput,
    ) -> PropertyResult<CreatedProperty> {
        validate_property_input(&input)?;

        let check = self.limiter.check_property_limit(owner_id).await;
        if !check.allowed {
            info!("Property creation blocked for user {}", owner_id);
            return Err(PropertyError::LimitExceeded(check.reason.unwrap_or_else(|| {
                "Property limit reached for your current plan".to_string()
            })));
        }

        let property = self.insert_property(owner_id, &input).await?;
        info!("Created property {} for user {}", property.id, owner_id);

        let result = self.attach_details(owner_id, &property, input).await;
        if let Err(e) = &result {
            error!(
                "Property {} created but follow-up writes failed: {}",
                property.id, e
            );
        }

        self.sync_usage(owner_id).await;

        let (images, tenant, lease) = result?;
        Ok(CreatedProperty {
            property,
            images,
            tenant,
            lease,
        })
    }

    async fn attach_details(
        &self,
        owner_id: &str,
        property: &Property,
        input: CreatePropertyInput,
    ) -> PropertyResult<(Vec<PropertyImage>, Option<Tenant>, Option<Lease>)> {
        let mut images = Vec::with_capacity(input.images.len());
        for (index, image) in input.images.into_iter().enumerate() {
            images.push(
                self.add_property_image(owner_id, &property.id, image, index == 0)
                    .await?,
            );
        }

        let tenant = match input.tenant {
            Some(tenant) => Some(self.insert_tenant(owner_id, &property.id, tenant).await?),
            None => None,
        };

        let lease = match input.lease {
            Some(lease) => Some(
                self.insert_lease(
                    owner_id,
                    &property.id,
                    tenant.as_ref().map(|t| t.id.as_str()),
                    lease,
                )
                .await?,
            ),
            None => None,
        };

        Ok((images, tenant, lease))
    }

    /// Delete a property; images, leases, and documents cascade
    pub async fn delete_property(&self, owner_id: &str, property_id: &str) -> PropertyResult<()> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ? AND owner_id = ?")
            .bind(property_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PropertyError::NotFound(property_id.to_string()));
        }

        info!("Deleted property {} for user {}", property_id, owner_id);
        self.sync_usage(owner_id).await;
        Ok(())
    }

    pub async fn list_properties(&self, owner_id: &str) -> Result<Vec<Property>, StorageError> {
        debug!("Listing properties for user: {}", owner_id);

        sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE owner_id = ? AND is_active = 1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    pub async fn get_property(
        &self,
        owner_id: &str,
        property_id: &str,
    ) -> Result<Option<Property>, StorageError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ? AND owner_id = ?")
            .bind(property_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    pub async fn list_property_images(
        &self,
        owner_id: &str,
        property_id: &str,
    ) -> Result<Vec<PropertyImage>, StorageError> {
        sqlx::query_as::<_, PropertyImage>(
            r#"
            SELECT * FROM property_images
            WHERE property_id = ? AND owner_id = ?
            ORDER BY is_primary DESC, created_at ASC
            "#,
        )
        .bind(property_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    /// Storage-gated document upload record
    pub async fn add_document(
        &self,
        owner_id: &str,
        document: NewDocument,
    ) -> PropertyResult<Document> {
        validate_file_size(document.file_size)?;

        let check = self
            .limiter
            .check_storage_limit(owner_id, document.file_size)
            .await;
        if !check.allowed {
            return Err(PropertyError::StorageLimitExceeded(
                check
                    .reason
                    .unwrap_or_else(|| "Storage limit reached".to_string()),
            ));
        }

        if let Some(property_id) = &document.property_id {
            if self.get_property(owner_id, property_id).await?.is_none() {
                return Err(PropertyError::NotFound(property_id.clone()));
            }
        }

        let document = Document {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            property_id: document.property_id,
            file_name: document.file_name,
            file_url: document.file_url,
            file_size: document.file_size,
            document_type: document.document_type,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents (id, owner_id, property_id, file_name, file_url, file_size, document_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(&document.owner_id)
        .bind(&document.property_id)
        .bind(&document.file_name)
        .bind(&document.file_url)
        .bind(document.file_size)
        .bind(&document.document_type)
        .bind(document.created_at)
        .execute(&self.pool)
        .await?;

        self.sync_usage(owner_id).await;
        Ok(document)
    }

    pub async fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>, StorageError> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    async fn insert_property(
        &self,
        owner_id: &str,
        input: &CreatePropertyInput,
    ) -> PropertyResult<Property> {
        let now = Utc::now();
        let property = Property {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            city: input.city.clone(),
            state: input.state.clone(),
            postal_code: input.postal_code.clone(),
            property_type: input.property_type.clone(),
            monthly_rent: input.monthly_rent,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO properties (
                id, owner_id, name, address, city, state, postal_code,
                property_type, monthly_rent, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&property.id)
        .bind(&property.owner_id)
        .bind(&property.name)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.postal_code)
        .bind(&property.property_type)
        .bind(property.monthly_rent)
        .bind(property.is_active)
        .bind(property.created_at)
        .bind(property.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(property)
    }

    async fn add_property_image(
        &self,
        owner_id: &str,
        property_id: &str,
        image: NewPropertyImage,
        is_primary: bool,
    ) -> PropertyResult<PropertyImage> {
        let check = self
            .limiter
            .check_storage_limit(owner_id, image.file_size)
            .await;
        if !check.allowed {
            return Err(PropertyError::StorageLimitExceeded(
                check
                    .reason
                    .unwrap_or_else(|| "Storage limit reached".to_string()),
            ));
        }

        let image = PropertyImage {
            id: generate_id(),
            property_id: property_id.to_string(),
            owner_id: owner_id.to_string(),
            file_name: image.file_name,
            file_url: image.file_url,
            file_size: image.file_size,
            is_primary,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO property_images (id, property_id, owner_id, file_name, file_url, file_size, is_primary, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.id)
        .bind(&image.property_id)
        .bind(&image.owner_id)
        .bind(&image.file_name)
        .bind(&image.file_url)
        .bind(image.file_size)
        .bind(image.is_primary)
        .bind(image.created_at)
        .execute(&self.pool)
        .await?;

        Ok(image)
    }

    async fn insert_tenant(
        &self,
        owner_id: &str,
        property_id: &str,
        tenant: NewTenant,
    ) -> PropertyResult<Tenant> {
        let tenant = Tenant {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            property_id: Some(property_id.to_string()),
            full_name: tenant.full_name.trim().to_string(),
            email: tenant.email,
            phone: tenant.phone,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO tenants (id, owner_id, property_id, full_name, email, phone, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.owner_id)
        .bind(&tenant.property_id)
        .bind(&tenant.full_name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(tenant.created_at)
        .execute(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn insert_lease(
        &self,
        owner_id: &str,
        property_id: &str,
        tenant_id: Option<&str>,
        lease: NewLease,
    ) -> PropertyResult<Lease> {
        let lease = Lease {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            property_id: property_id.to_string(),
            tenant_id: tenant_id.map(str::to_string),
            start_date: lease.start_date,
            end_date: lease.end_date,
            monthly_rent: lease.monthly_rent,
            rent_due_day: lease.rent_due_day,
            status: LeaseStatus::Active,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO leases (
                id, owner_id, property_id, tenant_id, start_date, end_date,
                monthly_rent, rent_due_day, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lease.id)
        .bind(&lease.owner_id)
        .bind(&lease.property_id)
        .bind(&lease.tenant_id)
        .bind(lease.start_date)
        .bind(lease.end_date)
        .bind(lease.monthly_rent)
        .bind(lease.rent_due_day)
        .bind(lease.status)
        .bind(lease.created_at)
        .execute(&self.pool)
        .await?;

        Ok(lease)
    }

    /// Recompute usage and write it to the cached counters. The caches are
    /// never read for gating, so a failure here is logged and swallowed.
    async fn sync_usage(&self, owner_id: &str) {
        let stats = match self.usage.get_usage_stats(owner_id).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Failed to recompute usage for user {}: {}", owner_id, e);
                return;
            }
        };

        if let Err(e) = self
            .settings
            .update_property_count_in_settings(owner_id)
            .await
        {
            warn!("Failed to sync property count for user {}: {}", owner_id, e);
        }

        if let Err(e) = self
            .subscriptions
            .update_usage_snapshot(owner_id, stats.property_count, stats.storage_used_mb)
            .await
        {
            warn!("Failed to update usage snapshot for user {}: {}", owner_id, e);
        }
    }
}

fn validate_file_size(file_size: i64) -> PropertyResult<()> {
    if file_size < 0 {
        return Err(PropertyError::Validation(
            "File size cannot be negative".to_string(),
        ));
    }
    if file_size > MAX_UPLOAD_SIZE_BYTES {
        return Err(PropertyError::Validation(format!(
            "File is too large. The maximum upload size is {}",
            format_file_size(MAX_UPLOAD_SIZE_BYTES as u64)
        )));
    }
    Ok(())
}

/// Reject malformed input before anything is written
fn validate_property_input(input: &CreatePropertyInput) -> PropertyResult<()> {
    if input.name.trim().is_empty() {
        return Err(PropertyError::Validation(
            "Property name is required".to_string(),
        ));
    }
    if input.address.trim().is_empty() {
        return Err(PropertyError::Validation("Address is required".to_string()));
    }
    if input.monthly_rent.is_some_and(|rent| rent < 0.0) {
        return Err(PropertyError::Validation(
            "Monthly rent cannot be negative".to_string(),
        ));
    }
    for image in &input.images {
        validate_file_size(image.file_size)?;
    }

    if let Some(tenant) = &input.tenant {
        if tenant.full_name.trim().is_empty() {
            return Err(PropertyError::Validation(
                "Tenant name is required".to_string(),
            ));
        }
        if let Some(email) = &tenant.email {
            if !is_valid_email(email) {
                return Err(PropertyError::Validation(format!(
                    "Invalid tenant email: {}",
                    email
                )));
            }
        }
        if let Some(phone) = &tenant.phone {
            if !is_valid_phone(phone) {
                return Err(PropertyError::Validation(format!(
                    "Invalid tenant phone number: {}",
                    phone
                )));
            }
        }
    }

    if let Some(lease) = &input.lease {
        validate_lease_dates(lease.start_date, lease.end_date)?;
        if !(1..=31).contains(&lease.rent_due_day) {
            return Err(PropertyError::Validation(
                "Rent due day must be between 1 and 31".to_string(),
            ));
        }
        if lease.monthly_rent < 0.0 {
            return Err(PropertyError::Validation(
                "Lease rent cannot be negative".to_string(),
            ));
        }
    }

    Ok(())
}
