//! Plant catalogue service
//!
//! Authoring, lookup, gallery search and the public display view. Role
//! checks for edits and deletes happen here, whatever the entry point.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use super::demo::{demo_plants, DEMO_AUTHOR_ID, DEMO_AUTHOR_NAME};
use crate::application::activity::ActivityLogger;
use crate::domain::{
    actions, Author, DomainError, DomainResult, LogRepositoryInterface, NewLogEntry, PlantBio,
    PlantDetails, PlantQuery, PlantRepositoryInterface, PlantView, SaveOutcome, SessionUser,
};
use crate::infrastructure::qr::{plant_display_url, render_qr_data_uri, render_qr_png, QrStyle};

const FORM_PAGE: &str = "plant_form";
const DISPLAY_PAGE: &str = "plant_display";

/// A rendered QR code and the name to save it under.
#[derive(Debug, Clone)]
pub struct QrImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// `<common name with underscores>_QRCode.png`, falling back to the id.
///
/// The result goes into a quoted `Content-Disposition` filename, so quotes,
/// backslashes and slashes are dropped and control characters split words.
fn qr_file_name(plant: &PlantBio) -> String {
    fn stem(raw: &str) -> String {
        let cleaned: String = raw
            .chars()
            .filter(|&c| !matches!(c, '"' | '\\' | '/'))
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join("_")
    }

    let mut name = stem(&plant.details.common_name);
    if name.is_empty() {
        name = stem(&plant.id);
    }
    format!("{}_QRCode.png", name)
}

pub struct PlantService<P: PlantRepositoryInterface, L: LogRepositoryInterface> {
    repo: Arc<P>,
    logger: Arc<ActivityLogger<L>>,
    public_base_url: String,
    qr_style: QrStyle,
}

impl<P: PlantRepositoryInterface, L: LogRepositoryInterface> PlantService<P, L> {
    pub fn new(repo: Arc<P>, logger: Arc<ActivityLogger<L>>, public_base_url: impl Into<String>) -> Self {
        Self {
            repo,
            logger,
            public_base_url: public_base_url.into(),
            qr_style: QrStyle::default(),
        }
    }

    pub fn display_url(&self, plant_id: &str) -> String {
        plant_display_url(&self.public_base_url, plant_id)
    }

    fn qr_for(&self, plant_id: &str) -> DomainResult<String> {
        render_qr_data_uri(&self.display_url(plant_id), self.qr_style)
            .map_err(|e| DomainError::Storage(e.to_string()))
    }

    /// Create or update a biography.
    ///
    /// Without an id a new `plant-<uuid>` record is created. With an id the
    /// stored record is replaced in place; only an admin or the authoring
    /// student may do that, and the original author and `createdAt` stay.
    #[instrument(skip(self, actor, details), fields(user_id = %actor.id))]
    pub async fn save(
        &self,
        actor: &SessionUser,
        id: Option<&str>,
        details: PlantDetails,
    ) -> DomainResult<PlantBio> {
        let now = Utc::now();
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("plant-{}", uuid::Uuid::new_v4()));
        let qr_code = self.qr_for(&id)?;

        // Ownership and the preserved fields come from the record as stored
        // at write time.
        let (plant, outcome) = self
            .repo
            .save_plant(&id, |existing| {
                let author = match existing {
                    Some(p) if !actor.can_manage(&p.student_id) => {
                        return Err(DomainError::Forbidden(
                            "only the author or an admin can edit this plant".into(),
                        ));
                    }
                    Some(p) => Author {
                        id: p.student_id.clone(),
                        name: p.student_name.clone(),
                    },
                    None => Author::from(actor),
                };

                Ok(PlantBio {
                    id: id.clone(),
                    qr_code: qr_code.clone(),
                    details: details.clone(),
                    student_id: author.id,
                    student_name: author.name,
                    created_at: existing.map_or(now, |p| p.created_at),
                    updated_at: now,
                })
            })
            .await?;

        let action = match outcome {
            SaveOutcome::Inserted => actions::PLANT_CREATED,
            SaveOutcome::Replaced => actions::PLANT_UPDATED,
        };
        info!(plant_id = %plant.id, action, "Plant saved");

        self.logger
            .record_quietly(
                NewLogEntry::new(action, FORM_PAGE)
                    .by(actor)
                    .plant(&plant.id, &plant.details.common_name),
            )
            .await;

        Ok(plant)
    }

    pub async fn get(&self, id: &str) -> DomainResult<PlantBio> {
        self.repo
            .get_plant(id)
            .await?
            .ok_or_else(|| DomainError::plant_not_found(id))
    }

    /// Display shape for the public page. Counts as a plant view.
    pub async fn display(
        &self,
        id: &str,
        viewer: Option<&SessionUser>,
        ip_address: Option<String>,
    ) -> DomainResult<PlantView> {
        let plant = self.get(id).await?;

        self.logger
            .record_quietly(
                NewLogEntry::new(actions::PLANT_VIEW, DISPLAY_PAGE)
                    .by_opt(viewer)
                    .plant(&plant.id, &plant.details.common_name)
                    .from_ip(ip_address),
            )
            .await;

        Ok(PlantView::from(&plant))
    }

    /// The record's QR code as a PNG download.
    pub async fn qr_png(&self, id: &str, actor: Option<&SessionUser>) -> DomainResult<QrImage> {
        let plant = self.get(id).await?;
        let png = render_qr_png(&self.display_url(&plant.id), self.qr_style)
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        self.logger
            .record_quietly(
                NewLogEntry::new(actions::QR_DOWNLOADED, FORM_PAGE)
                    .by_opt(actor)
                    .plant(&plant.id, &plant.details.common_name),
            )
            .await;

        Ok(QrImage {
            file_name: qr_file_name(&plant),
            png,
        })
    }

    pub async fn search(&self, query: &PlantQuery) -> DomainResult<Vec<PlantBio>> {
        let plants = self.repo.list_plants().await?;
        Ok(plants.into_iter().filter(|p| query.matches(p)).collect())
    }

    /// Admins see every record, students only their own.
    pub async fn dashboard(&self, actor: &SessionUser) -> DomainResult<Vec<PlantBio>> {
        let plants = self.repo.list_plants().await?;
        if actor.is_admin() {
            return Ok(plants);
        }
        Ok(plants
            .into_iter()
            .filter(|p| p.is_authored_by(&actor.id))
            .collect())
    }

    /// Remove a record. A missing id is a no-op returning `false`.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &SessionUser, id: &str) -> DomainResult<bool> {
        let removed = self
            .repo
            .delete_plant(id, |plant| {
                if actor.can_manage(&plant.student_id) {
                    Ok(())
                } else {
                    Err(DomainError::Forbidden(
                        "only the author or an admin can delete this plant".into(),
                    ))
                }
            })
            .await?;
        let Some(plant) = removed else {
            return Ok(false);
        };

        info!(plant_id = id, "Plant deleted");
        self.logger
            .record_quietly(
                NewLogEntry::new(actions::PLANT_DELETED, "dashboard")
                    .by(actor)
                    .plant(id, &plant.details.common_name),
            )
            .await;
        Ok(true)
    }

    /// Load the demo catalogue into an empty collection.
    pub async fn seed_demo_plants(&self) -> DomainResult<bool> {
        let now = Utc::now();
        let mut plants = Vec::new();
        for (id, details) in demo_plants() {
            plants.push(PlantBio {
                id: id.to_string(),
                qr_code: self.qr_for(id)?,
                details,
                student_id: DEMO_AUTHOR_ID.to_string(),
                student_name: DEMO_AUTHOR_NAME.to_string(),
                created_at: now,
                updated_at: now,
            });
        }

        let seeded = self.repo.seed_if_empty(plants).await?;
        if seeded {
            info!("Seeded demo plants");
        }
        Ok(seeded)
    }
}
