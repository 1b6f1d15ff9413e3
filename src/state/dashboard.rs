//! Admin dashboard counters.

use crate::http::{ApiClient, ApiError};
use crate::services::appointments::{self, Appointment};
use crate::services::doctors::{self, Doctor};
use crate::services::schedules::{self, Schedule};
use crate::services::specialties::{self, Specialty};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub doctors: usize,
    pub specialties: usize,
    pub schedules: usize,
    pub available_schedules: usize,
    pub appointments: usize,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_lists(
        doctors: &[Doctor],
        specialties: &[Specialty],
        schedules: &[Schedule],
        appointments: &[Appointment],
    ) -> Self {
        Self {
            doctors: doctors.len(),
            specialties: specialties.len(),
            schedules: schedules.len(),
            available_schedules: schedules.iter().filter(|s| s.disponible).count(),
            appointments: appointments.len(),
        }
    }

    /// Fetch the four lists concurrently and count them.
    ///
    /// # Errors
    ///
    /// Returns the first API error; no partial summary is produced.
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let (d, s, h, c) = tokio::try_join!(
            doctors::list(api),
            specialties::list(api),
            schedules::list(api),
            appointments::list(api),
        )?;
        tracing::debug!(doctors = d.len(), specialties = s.len(), schedules = h.len(), "dashboard loaded");
        Ok(Self::from_lists(&d, &s, &h, &c))
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
