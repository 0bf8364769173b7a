//! Treatment record models.

use serde::{Deserialize, Serialize};

use super::{lenient, present};
use crate::{ClinicError, ClinicResult};

/// Number of positional treatment columns on a treatment record.
pub const TREATMENT_SLOTS: usize = 7;

/// Ordered, bounded list of treatment names mapped onto the seven slot columns.
///
/// Slot *i* holds element *i* of the caller's list, or `None` when the list
/// is shorter or the entry is blank. Entries past the seventh are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreatmentSlots([Option<String>; TREATMENT_SLOTS]);

impl TreatmentSlots {
    /// Map a caller-ordered list onto the slots.
    pub fn from_list<S: AsRef<str>>(items: &[S]) -> Self {
        let mut slots: [Option<String>; TREATMENT_SLOTS] = Default::default();
        for (slot, item) in slots.iter_mut().zip(items) {
            let item = item.as_ref();
            if !item.trim().is_empty() {
                *slot = Some(item.to_string());
            }
        }
        Self(slots)
    }

    /// How many entries of `items` do not fit in the slots.
    pub fn overflow<S>(items: &[S]) -> usize {
        items.len().saturating_sub(TREATMENT_SLOTS)
    }

    /// The raw slot values, in column order.
    pub fn as_array(&self) -> &[Option<String>; TREATMENT_SLOTS] {
        &self.0
    }

    /// Reconstruct the list from the occupied slots.
    pub fn to_list(&self) -> Vec<String> {
        self.0.iter().flatten().cloned().collect()
    }
}

/// A treatment record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: i64,
    pub patient_id: String,
    /// Snapshot of the patient's name when the record was written
    pub patient_name: Option<String>,
    pub date: String,
    pub treatment1: Option<String>,
    pub treatment2: Option<String>,
    pub treatment3: Option<String>,
    pub treatment4: Option<String>,
    pub treatment5: Option<String>,
    pub treatment6: Option<String>,
    pub treatment7: Option<String>,
    pub extra_oral: Option<String>,
    pub intra_oral: Option<String>,
    pub treatment_plan: Option<String>,
    pub next_treatment_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Treatment {
    /// Slot columns gathered back into a bounded list.
    pub fn slots(&self) -> TreatmentSlots {
        TreatmentSlots([
            self.treatment1.clone(),
            self.treatment2.clone(),
            self.treatment3.clone(),
            self.treatment4.clone(),
            self.treatment5.clone(),
            self.treatment6.clone(),
            self.treatment7.clone(),
        ])
    }

    /// Treatment names in slot order.
    pub fn treatments(&self) -> Vec<String> {
        self.slots().to_list()
    }
}

/// Caller-supplied treatment fields for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreatmentInput {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub date: Option<String>,
    /// Ordered treatment names, mapped positionally onto the slot columns
    #[serde(deserialize_with = "lenient::string_list")]
    pub treatments: Vec<String>,
    pub extra_oral: Option<String>,
    pub intra_oral: Option<String>,
    pub treatment_plan: Option<String>,
    pub next_treatment_date: Option<String>,
}

impl TreatmentInput {
    /// Create an input with the required fields set.
    pub fn new(patient_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    /// Replace the treatment list.
    pub fn with_treatments<I, S>(mut self, treatments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.treatments = treatments.into_iter().map(Into::into).collect();
        self
    }

    /// Check the fields required to write a treatment.
    ///
    /// Both columns are NOT NULL, so create and update share this check.
    pub fn validate(&self) -> ClinicResult<()> {
        if !present(&self.patient_id) || !present(&self.date) {
            return Err(ClinicError::Validation(
                "Patient ID and date are required".into(),
            ));
        }
        Ok(())
    }

    /// Slot mapping for the supplied list.
    pub fn slots(&self) -> TreatmentSlots {
        TreatmentSlots::from_list(&self.treatments)
    }
}
